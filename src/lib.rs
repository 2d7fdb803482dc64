// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Package HTML editor content as a word-processor compatible `.docx` download.
//!
//! The core is [`logic::packager::DocumentPackager`], which wraps content in an
//! Office HTML envelope. [`logic::actions`] turns packages into the "Save
//! document" and "New document" actions, and [`logic::sink`] persists them.
//! The remaining modules make up the egui desktop host.

pub mod app;
pub mod config;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod ui;
pub mod utils;
