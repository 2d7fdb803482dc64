// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Built-in interceptors wired up from the configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::package::Package;
use crate::utils::unique_path;

/// Ask the user before the current document is discarded.
pub fn confirm_discard(_package: Package) -> Result<bool> {
    let answer = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("New document")
        .set_description("Discard the current document? Unsaved changes will be lost.")
        .set_buttons(rfd::MessageButtons::YesNo)
        .show();
    Ok(matches!(answer, rfd::MessageDialogResult::Yes))
}

/// Save interceptor writing every package into `dir` without prompting.
///
/// Existing files are kept; new exports get a numbered name.
pub fn export_to_dir(dir: PathBuf) -> impl Fn(Package) -> Result<()> + 'static {
    move |package| {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        let path = unique_path(&dir, package.filename());
        fs::write(&path, package.bytes())
            .with_context(|| format!("Failed to export document to {}", path.display()))?;
        tracing::info!("document exported to {}", path.display());
        Ok(())
    }
}
