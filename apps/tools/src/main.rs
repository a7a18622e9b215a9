use std::{
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{dispatcher_from_settings, load_settings, Settings};
use shared::{
    domain::{Mode, PageVariant},
    error::{ErrorReport, RunError},
    protocol::RunRequest,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tools", about = "Run the CipherKit transforms from a shell")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print `{"output": ...}` or an error report as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Log with the configured filter instead of warnings only.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shift ASCII letters through the alphabet.
    Caesar {
        #[arg(long)]
        decode: bool,
        #[arg(long, default_value = "3", allow_hyphen_values = true)]
        shift: String,
        /// Read from stdin when omitted.
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
    },
    /// Text to space-separated 8-bit groups and back.
    Binary {
        #[arg(long)]
        decode: bool,
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
    },
    /// Text to International Morse and back.
    Morse {
        #[arg(long)]
        decode: bool,
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
    },
}

fn mode(decode: bool) -> Mode {
    if decode {
        Mode::Decode
    } else {
        Mode::Encode
    }
}

impl Command {
    fn into_request(self, stdin: impl Read) -> Result<RunRequest> {
        let (variant, decode, shift, text) = match self {
            Command::Caesar {
                decode,
                shift,
                text,
            } => (PageVariant::Cipher, decode, shift, text),
            Command::Binary { decode, text } => (PageVariant::Binary, decode, String::new(), text),
            Command::Morse { decode, text } => (PageVariant::Morse, decode, String::new(), text),
        };
        let text = match text {
            Some(text) => text,
            None => read_text(stdin)?,
        };
        Ok(RunRequest::new(variant, mode(decode), text).with_shift(shift))
    }
}

/// Whole stdin, minus the line ending a shell pipe usually adds.
fn read_text(mut stdin: impl Read) -> Result<String> {
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

/// The line to print and whether the run failed.
fn render(outcome: &Result<Option<String>, RunError>, json: bool) -> Result<(String, bool)> {
    match (outcome, json) {
        (Ok(output), false) => Ok((output.clone().unwrap_or_default(), false)),
        (Ok(output), true) => {
            let body = serde_json::json!({ "output": output.as_deref().unwrap_or_default() });
            Ok((serde_json::to_string(&body)?, false))
        }
        (Err(err), false) => Ok((err.to_string(), true)),
        (Err(err), true) => Ok((serde_json::to_string(&ErrorReport::from(err))?, true)),
    }
}

fn init_tracing(settings: &Settings, verbose: bool) {
    let fallback = if verbose {
        settings.log_filter.as_str()
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref());
    init_tracing(&settings, cli.verbose);

    let request = cli.command.into_request(io::stdin().lock())?;
    let dispatcher =
        dispatcher_from_settings(&settings, true).context("failed to configure transforms")?;
    let outcome = dispatcher
        .execute(&request, |progress| {
            tracing::debug!(?progress, "transform runtime progress")
        })
        .await;

    let (line, failed) = render(&outcome, cli.json)?;
    if failed && !cli.json {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
