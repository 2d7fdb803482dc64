// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod editor;
pub mod toggle;
pub mod toolbar;

pub use toggle::toggle_switch;
