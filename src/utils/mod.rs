// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod logging;
pub mod path;

/// Force a file extension onto a path.
pub use path::ensure_extension;
/// Non-clobbering download path.
pub use path::unique_path;
