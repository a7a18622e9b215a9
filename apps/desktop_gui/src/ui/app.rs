use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use client_core::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Session, ThemeController,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{Mode, PageVariant, Theme},
    error::RunError,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::clipboard::{copy_to_clipboard, CopyFeedback};
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::theme::apply_theme;

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub page: Option<PageVariant>,
    pub preferences_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub preferences: Option<PathBuf>,
}

impl AppPaths {
    pub fn from_startup(startup: &StartupConfig) -> Self {
        let preferences = startup.preferences_path.clone().or_else(|| {
            dirs::config_dir().map(|base| base.join("cipherkit").join(PREFERENCES_FILE))
        });
        Self { preferences }
    }

    /// File-backed when a path is known; otherwise preferences last for this
    /// window only.
    pub fn preference_store(&self) -> Box<dyn PreferenceStore> {
        match &self.preferences {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using preference file");
                Box::new(FilePreferenceStore::new(path))
            }
            None => {
                tracing::warn!("no config directory; theme preference will not persist");
                Box::new(MemoryPreferenceStore::new())
            }
        }
    }
}

pub struct CipherKitApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: Session,
    theme: ThemeController,
    applied_theme: Option<Theme>,
    banner: Option<UiError>,
    copy_feedback: CopyFeedback,
    next_run_id: u64,
    active_run: Option<u64>,
}

impl CipherKitApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
        paths: &AppPaths,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            session: Session::new(startup.page),
            theme: ThemeController::init(paths.preference_store()),
            applied_theme: None,
            banner: None,
            copy_feedback: CopyFeedback::default(),
            next_run_id: 0,
            active_run: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Progress { run_id, progress } => {
                    if self.active_run == Some(run_id) {
                        self.session.show_progress(progress);
                    }
                }
                UiEvent::RunFinished { run_id, outcome } => {
                    if self.active_run != Some(run_id) {
                        tracing::debug!(run_id, "ignoring result of a run from another page");
                        continue;
                    }
                    self.active_run = None;
                    self.banner = outcome
                        .as_ref()
                        .err()
                        .map(UiError::from_run_error)
                        .filter(|err| !err.is_inline());
                    self.session.finish_run(outcome);
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.banner = Some(err);
                }
            }
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        let theme = self.theme.current();
        if self.applied_theme == Some(theme) {
            return;
        }
        apply_theme(ctx, theme);
        self.applied_theme = Some(theme);
    }

    fn start_run(&mut self) {
        if !self.session.run_enabled() {
            return;
        }
        let request = self.session.begin_run();
        self.next_run_id += 1;
        let run_id = self.next_run_id;
        self.banner = None;

        match dispatch_backend_command(&self.cmd_tx, BackendCommand::Run { run_id, request }) {
            Ok(()) => self.active_run = Some(run_id),
            Err(message) => {
                self.banner = Some(UiError::from_message(UiErrorContext::General, &message));
                self.session
                    .finish_run(Err(RunError::Unexpected(Some(message))));
            }
        }
    }

    fn switch_page(&mut self, variant: Option<PageVariant>) {
        if self.session.variant() == variant {
            return;
        }
        tracing::debug!(page = ?variant, "switching page");
        self.session.switch_page(variant);
        self.active_run = None;
        self.banner = None;
        self.copy_feedback = CopyFeedback::default();
    }

    fn copy_output(&mut self, ctx: &egui::Context) {
        let Some(text) = self.session.copy_text() else {
            return;
        };
        let path = copy_to_clipboard(ctx, text);
        tracing::debug!(?path, "copied output");
        self.copy_feedback.record(path, Instant::now());
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("CipherKit");
                ui.separator();

                let mut target = None;
                if ui
                    .selectable_label(self.session.variant().is_none(), "Home")
                    .clicked()
                {
                    target = Some(None);
                }
                for variant in PageVariant::ALL {
                    let selected = self.session.variant() == Some(variant);
                    if ui.selectable_label(selected, variant.label()).clicked() {
                        target = Some(Some(variant));
                    }
                }
                if let Some(variant) = target {
                    self.switch_page(variant);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(self.theme.toggle_label()).clicked() {
                        let theme = self.theme.toggle();
                        tracing::info!(theme = theme.as_str(), "theme toggled");
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(err) = &self.banner else {
            return;
        };
        let mut dismissed = false;
        egui::Frame::NONE
            .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        egui::RichText::new(err_label(err.category())).strong(),
                    );
                    ui.label(err.message());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        dismissed = ui.small_button("Dismiss").clicked();
                    });
                });
            });
        if dismissed {
            self.banner = None;
        }
        ui.add_space(8.0);
    }

    fn show_landing(&mut self, ui: &mut egui::Ui) {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.heading("Pick a tool");
            ui.weak("Encode or decode text with one of these tools.");
            ui.add_space(16.0);
            for variant in PageVariant::ALL {
                if ui
                    .add_sized([220.0, 32.0], egui::Button::new(variant.label()))
                    .clicked()
                {
                    self.switch_page(Some(variant));
                }
            }
        });
    }

    fn show_tool(&mut self, ui: &mut egui::Ui, variant: PageVariant) {
        ui.heading(variant.label());
        ui.add_space(6.0);

        let affordances = self.session.affordances();
        ui.horizontal(|ui| {
            if ui
                .selectable_label(affordances.encode_active, "Encode")
                .clicked()
            {
                self.session.set_mode(Mode::Encode);
            }
            if ui
                .selectable_label(affordances.decode_active, "Decode")
                .clicked()
            {
                self.session.set_mode(Mode::Decode);
            }
        });
        ui.add_space(6.0);

        let placeholder = self.session.placeholder();
        ui.add(
            egui::TextEdit::multiline(&mut self.session.input)
                .hint_text(placeholder)
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );

        if variant == PageVariant::Cipher {
            ui.horizontal(|ui| {
                ui.label("Shift");
                ui.add(egui::TextEdit::singleline(&mut self.session.shift).desired_width(48.0));
            });
        }

        let run_shortcut = ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));
        let now = Instant::now();
        ui.horizontal(|ui| {
            let run = ui.add_enabled(self.session.run_enabled(), egui::Button::new("Run"));
            if run.clicked() || run_shortcut {
                self.start_run();
            }
            if ui.button("Clear").clicked() {
                self.session.clear();
                self.banner = None;
            }
            if ui.button(self.copy_feedback.label(now)).clicked() {
                self.copy_output(ui.ctx());
            }
            if let Some(status) = self.session.status() {
                ui.spinner();
                ui.weak(status);
            }
        });

        if self.banner.is_none() {
            if let Some(error) = self.session.error() {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
        }

        ui.add_space(8.0);
        ui.label(egui::RichText::new("Output").strong());
        let mut output = self.session.output();
        ui.add(
            egui::TextEdit::multiline(&mut output)
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
    }

    fn repaint_interval(&self) -> Duration {
        if self.session.is_busy() {
            return Duration::from_millis(16);
        }
        self.copy_feedback
            .remaining(Instant::now())
            .map_or(Duration::from_millis(100), |left| {
                left.min(Duration::from_millis(100))
            })
    }
}

impl eframe::App for CipherKitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        self.show_top_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            match self.session.variant() {
                None => self.show_landing(ui),
                Some(variant) => self.show_tool(ui, variant),
            }
        });

        ctx.request_repaint_after(self.repaint_interval());
    }
}
