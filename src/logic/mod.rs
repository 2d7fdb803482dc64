// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic: packaging, download sinks, and the document actions.

pub mod actions;
pub mod enabled;
pub mod host;
pub mod interceptors;
pub mod packager;
pub mod sink;
