// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell hosting the document editor.
//! Handles layout, the action toolbar, and wiring to the document actions.

pub mod components;

use eframe::egui;
use egui_phosphor::regular;

use crate::config::DocPackConfig;
use crate::mvu::{self, Actions, AppModel, Msg};
use crate::ui::components::editor::{self, EditorMsg};
use crate::ui::components::toggle_switch;
use crate::ui::components::toolbar::{ComponentRegistry, ControlSpec};

/// Stateful egui application for editing and exporting a document.
pub struct DocPackApp {
    model: AppModel,
    actions: Actions,
    toolbar: ComponentRegistry<Msg>,
    inbox: Vec<Msg>,
}

impl DocPackApp {
    pub fn new(config: &DocPackConfig) -> Self {
        let model = AppModel::new(config.enable.require_content);
        let actions = Actions::from_config(config);
        let toolbar = build_toolbar(&model);

        Self {
            model,
            actions,
            toolbar,
            inbox: Vec::new(),
        }
    }
}

/// Register the two document actions in toolbar order.
fn build_toolbar(model: &AppModel) -> ComponentRegistry<Msg> {
    let mut toolbar = ComponentRegistry::default();
    let registrations = [
        (
            "newDocument",
            ControlSpec {
                label: "New document",
                icon: regular::FILE,
                tooltip: true,
            },
            None,
            Msg::NewClicked,
        ),
        (
            "saveDocument",
            ControlSpec {
                label: "Save document",
                icon: regular::FLOPPY_DISK,
                tooltip: true,
            },
            Some(model.save_enabled.clone()),
            Msg::SaveClicked,
        ),
    ];
    for (name, spec, gate, msg) in registrations {
        if let Err(err) = toolbar.add(name, spec, gate, msg) {
            tracing::error!("{err}");
        }
    }
    toolbar
}

impl eframe::App for DocPackApp {
    /// Drives a single UI frame: applies queued messages, runs the resulting
    /// commands synchronously, and renders the top bar, status, and editor.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Process pending messages until exhausted.
        let mut msgs = std::mem::take(&mut self.inbox);
        while let Some(msg) = msgs.pop() {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if let Some(reply) = mvu::run_command(cmd, &mut self.model, &self.actions) {
                    msgs.push(reply);
                }
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Document");
                ui.separator();
                let clicked = self.toolbar.view(ui);
                self.inbox.extend(clicked);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    ui.separator();
                    self.render_read_only_toggle(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            let msgs = editor::view(&self.model.editor, ui);
            self.inbox.extend(msgs.into_iter().map(Msg::Editor));
        });
    }

    /// Required by `eframe::App`; all rendering happens in `update`.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}
}

impl DocPackApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Switch toggling the editor's read-only state.
    fn render_read_only_toggle(&mut self, ui: &mut egui::Ui) {
        let mut read_only = self.model.editor.read_only;
        if toggle_switch(ui, &mut read_only, "Read-only")
            .on_hover_text("Lock the document against edits")
            .changed()
        {
            self.inbox
                .push(Msg::Editor(EditorMsg::SetReadOnly(read_only)));
        }
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message, with a shortcut to the last saved file.
    fn render_status(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(text) = &self.model.status {
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(68)));
            }
            if self.model.last_saved.is_some()
                && ui
                    .small_button(format!("{} Show in folder", regular::FOLDER_OPEN))
                    .clicked()
            {
                self.inbox.push(Msg::RevealLastSaved);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let target = self
                    .actions
                    .save
                    .sink_name()
                    .unwrap_or("no save mechanism");
                let target = if self.actions.save.has_interceptor() {
                    "export directory"
                } else {
                    target
                };
                ui.label(
                    egui::RichText::new(format!("Saving via {target}"))
                        .small()
                        .color(egui::Color32::from_gray(110)),
                );
            });
        });
    }
}
