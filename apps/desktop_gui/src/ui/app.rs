use std::time::Duration;

use client_core::render_state;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{reduce, UiModel};
use crate::ui::panels;

/// Extensions the analysis service accepts.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv"];

pub struct AnalyzerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    model: UiModel,
    api_base_url: String,
}

impl AnalyzerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        api_base_url: String,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            model: UiModel::default(),
            api_base_url,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            reduce(&mut self.model, event);
        }
    }

    fn show_upload_section(&mut self, ui: &mut egui::Ui) {
        let view = render_state(&self.model.workflow);

        ui.heading("Upload a video");
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let pick = ui.add_enabled(!view.is_analyzing, egui::Button::new("Choose video…"));
            if pick.clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Video", VIDEO_EXTENSIONS)
                    .pick_file()
                {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::SelectFile { path },
                        &mut self.model.status,
                    );
                }
            }
            match &view.selected_file {
                Some(name) => ui.label(format!("Selected file: {name}")),
                None => ui.weak("No file selected"),
            };
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let label = if view.is_analyzing {
                "Analyzing..."
            } else {
                "Analyze"
            };
            if ui
                .add_enabled(view.can_analyze, egui::Button::new(label))
                .clicked()
            {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::Analyze,
                    &mut self.model.status,
                );
            }
            if view.is_analyzing {
                ui.spinner();
            }
        });
    }
}

impl eframe::App for AnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("app_header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Running video analysis");
            ui.label("Upload a video to measure step count and forward-lean angle.");
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.model.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("API: {}", self.api_base_url));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_upload_section(ui);

                if let Some(banner) = &self.model.banner {
                    ui.add_space(10.0);
                    panels::error_banner(ui, banner);
                }

                ui.add_space(10.0);
                let view = render_state(&self.model.workflow);
                panels::result_panel(ui, &view.result);
            });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
