// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Wrap editor HTML into a word-processor compatible document package.
//!
//! The output is plain HTML in the legacy Office HTML dialect, declared with the
//! `.docx` MIME type. No conversion or sanitizing happens here: content is
//! copied into the envelope byte for byte.

use std::path::Path;

use crate::models::package::{BOM, DEFAULT_FILENAME, Package};
use crate::utils::ensure_extension;

/// Envelope opening: Office namespaces, UTF-8 charset and a fixed title.
pub const HEADER: &str = concat!(
    "<html xmlns:o='urn:schemas-microsoft-com:office:office' ",
    "xmlns:w='urn:schemas-microsoft-com:office:word' ",
    "xmlns='http://www.w3.org/TR/REC-html40'>",
    "<head>",
    "<meta charset='utf-8'>",
    "<title>Export HTML to Word Document</title>",
    "</head><body>",
);

/// Envelope closing.
pub const FOOTER: &str = "</body></html>";

/// Builds [`Package`] values from raw editor content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentPackager {
    filename: String,
}

impl Default for DocumentPackager {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl DocumentPackager {
    /// Packager offering `filename` to the download path.
    ///
    /// Only the final path component is kept, like a browser does with a
    /// link's `download` attribute, so the name can never leave the target
    /// directory. The `.docx` extension is enforced; a name without a usable
    /// file component falls back to `document.docx`.
    pub fn with_filename(filename: &str) -> Self {
        let Some(name) = Path::new(filename.trim())
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            return Self::default();
        };
        let name = ensure_extension(name.into(), "docx");
        Self {
            filename: name.to_string_lossy().into_owned(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Wrap `content` into a fresh package. Total over all inputs.
    pub fn package(&self, content: &str) -> Package {
        let mut payload = String::with_capacity(
            BOM.len_utf8() + HEADER.len() + content.len() + FOOTER.len(),
        );
        payload.push(BOM);
        payload.push_str(HEADER);
        payload.push_str(content);
        payload.push_str(FOOTER);
        Package::new(payload, self.filename.clone())
    }
}
