// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Registry of toolbar controls that document actions plug into.

use eframe::egui;
use thiserror::Error;

use crate::logic::enabled::EnabledSignal;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a control named '{0}' is already registered")]
    Duplicate(String),
}

/// Presentation of a registered control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlSpec {
    pub label: &'static str,
    /// Phosphor glyph.
    pub icon: &'static str,
    /// Show only the icon and put the label in a hover tooltip.
    pub tooltip: bool,
}

struct Control<M> {
    name: &'static str,
    spec: ControlSpec,
    gate: Option<EnabledSignal>,
    on_activate: M,
}

/// Ordered set of named controls, each emitting a message when clicked.
pub struct ComponentRegistry<M> {
    controls: Vec<Control<M>>,
}

impl<M> Default for ComponentRegistry<M> {
    fn default() -> Self {
        Self {
            controls: Vec::new(),
        }
    }
}

impl<M: Clone> ComponentRegistry<M> {
    /// Register a control under a unique `name`.
    ///
    /// When `gate` is given the control is only clickable while the signal is on.
    pub fn add(
        &mut self,
        name: &'static str,
        spec: ControlSpec,
        gate: Option<EnabledSignal>,
        on_activate: M,
    ) -> Result<(), RegistryError> {
        if self.controls.iter().any(|c| c.name == name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        tracing::debug!(name, label = spec.label, "registered toolbar control");
        self.controls.push(Control {
            name,
            spec,
            gate,
            on_activate,
        });
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.controls.iter().map(|c| c.name)
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.controls
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.gate.as_ref().is_none_or(EnabledSignal::is_enabled))
    }

    /// Render all controls in registration order and return the messages of clicked ones.
    pub fn view(&self, ui: &mut egui::Ui) -> Vec<M> {
        let mut msgs = Vec::new();
        for control in &self.controls {
            let enabled = control.gate.as_ref().is_none_or(EnabledSignal::is_enabled);
            let spec = control.spec;
            let text = if spec.tooltip {
                spec.icon.to_string()
            } else {
                format!("{} {}", spec.icon, spec.label)
            };
            let mut response = ui.add_enabled(enabled, egui::Button::new(text));
            if spec.tooltip {
                response = response.on_hover_text(spec.label);
            }
            if response.clicked() {
                msgs.push(control.on_activate.clone());
            }
        }
        msgs
    }
}
