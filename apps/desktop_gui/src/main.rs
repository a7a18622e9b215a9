use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use client_core::{dispatcher_from_settings, load_settings};
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::PageVariant;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{AppPaths, CipherKitApp, StartupConfig};

#[derive(Debug, Clone, Copy)]
struct StartPage(Option<PageVariant>);

fn parse_start_page(raw: &str) -> Result<StartPage, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "home" | "index" => Ok(StartPage(None)),
        other => other.parse().map(|variant| StartPage(Some(variant))),
    }
}

#[derive(Debug, Parser)]
#[command(name = "cipherkit", about = "Caesar, binary and Morse text tools")]
struct Args {
    /// Page to open: cipher, binary, morse or home.
    #[arg(long, default_value = "home", value_parser = parse_start_page)]
    page: StartPage,
    /// Config file; defaults to ./cipherkit.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Preference file holding the theme.
    #[arg(long)]
    preferences: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let startup = StartupConfig {
        page: args.page.0,
        preferences_path: args.preferences.or_else(|| settings.preferences_path.clone()),
    };
    let paths = AppPaths::from_startup(&startup);
    tracing::info!(
        page = ?startup.page,
        preferences = ?paths.preferences,
        "starting desktop gui"
    );

    // Every page except home runs transforms; bootstrap still waits for the first run.
    let dispatcher =
        dispatcher_from_settings(&settings, true).context("failed to configure transforms")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(dispatcher, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CipherKit")
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CipherKit",
        options,
        Box::new(move |_cc| Ok(Box::new(CipherKitApp::new(cmd_tx, ui_rx, startup, &paths)))),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}
