use client_core::{render::STEPS_LABEL, render::LEAN_ANGLE_LABEL, ResultBody, ResultView};
use eframe::egui;

use crate::controller::events::UiError;

pub fn error_banner(ui: &mut egui::Ui, error: &UiError) {
    let color = ui.visuals().error_fg_color;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.colored_label(color, egui::RichText::new(error.title()).strong());
        ui.label(error.message());
    });
}

pub fn result_panel(ui: &mut egui::Ui, view: &ResultView) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.heading(view.title);
        ui.add_space(4.0);

        match &view.body {
            ResultBody::Placeholder(message) => {
                ui.label(*message);
            }
            ResultBody::Report {
                steps,
                lean_angle,
                explanation,
            } => {
                egui::Grid::new("result_measurements")
                    .num_columns(2)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong(format!("{STEPS_LABEL}:"));
                        ui.label(steps);
                        ui.end_row();
                        ui.strong(format!("{LEAN_ANGLE_LABEL}:"));
                        ui.label(lean_angle);
                        ui.end_row();
                    });

                if let Some(explanation) = explanation {
                    ui.add_space(8.0);
                    ui.strong("Analysis method");
                    if let Some(note) = &explanation.note {
                        ui.label(note);
                    }
                    if let Some(label) = &explanation.method_label {
                        ui.label(format!("Method used: {label}"));
                    }
                }
            }
        }

        ui.add_space(8.0);
        ui.separator();
        ui.strong("How to read the result");
        for entry in view.legend {
            ui.label(format!("• {}: {}", entry.term, entry.description));
        }
    });
}
