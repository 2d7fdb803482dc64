// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Immutable document package handed to interceptors and download sinks.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// MIME type declared for every packaged document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Default filename offered by the download path.
pub const DEFAULT_FILENAME: &str = "document.docx";

/// Byte-order marker prefixed to the payload so text sniffers detect UTF-8.
pub const BOM: char = '\u{FEFF}';

/// Characters left untouched by `encodeURIComponent`; everything else is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Packaged document ready for handoff or download.
///
/// Built only through [`crate::logic::packager::DocumentPackager`]; fields are
/// private so a package cannot change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    mime: &'static str,
    payload: String,
    filename: String,
}

impl Package {
    pub(crate) fn new(payload: String, filename: String) -> Self {
        Self {
            mime: DOCX_MIME,
            payload,
            filename,
        }
    }

    /// Declared MIME type.
    pub fn mime(&self) -> &str {
        self.mime
    }

    /// Full payload including the leading byte-order marker.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Filename used by the download path.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Payload without the byte-order marker.
    pub fn html(&self) -> &str {
        self.payload.strip_prefix(BOM).unwrap_or(&self.payload)
    }

    /// UTF-8 bytes written to disk.
    pub fn bytes(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    /// `data:` URI carrying the full payload, percent-encoded like `encodeURIComponent`.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};charset=utf-8,{}",
            self.mime,
            utf8_percent_encode(&self.payload, URI_COMPONENT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        Package::new(format!("{BOM}<p>a b</p>"), DEFAULT_FILENAME.into())
    }

    #[test]
    fn html_strips_only_the_marker() {
        let package = sample();

        assert_eq!(package.html(), "<p>a b</p>");
        assert_eq!(&package.bytes()[..3], &[0xEF, 0xBB, 0xBF]);
    }

    // Escaping must match what a browser anchor would receive.
    #[test]
    fn data_uri_escapes_like_encode_uri_component() {
        let uri = sample().data_uri();

        assert_eq!(
            uri,
            format!("data:{DOCX_MIME};charset=utf-8,%EF%BB%BF%3Cp%3Ea%20b%3C%2Fp%3E")
        );
    }

    #[test]
    fn data_uri_keeps_unreserved_marks() {
        let package = Package::new("it's (ok)!~*-_.".into(), DEFAULT_FILENAME.into());

        assert!(package.data_uri().ends_with(",it's%20(ok)!~*-_."));
    }
}
