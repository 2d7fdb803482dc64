// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Path helpers shared by the packager and the save sinks.

use std::path::{Path, PathBuf};

/// Extensions of document formats that are swapped out rather than kept.
const DOCUMENT_EXTENSIONS: &[&str] = &["doc", "docx", "htm", "html", "odt", "rtf", "txt"];

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps existing matching extension (case-insensitive). A known document
/// extension is replaced; any other dotted suffix (`report v1.2`) belongs to
/// the name and the extension is appended.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let Some(current) = path.extension().and_then(|e| e.to_str()) else {
        path.set_extension(extension);
        return path;
    };
    if current.eq_ignore_ascii_case(extension) {
        return path;
    }
    if DOCUMENT_EXTENSIONS
        .iter()
        .any(|known| current.eq_ignore_ascii_case(known))
    {
        path.set_extension(extension);
    } else {
        path.as_mut_os_string().push(format!(".{extension}"));
    }
    path
}

/// Pick a path in `dir` for `filename` that does not overwrite an existing file.
///
/// `document.docx` becomes `document (1).docx`, `document (2).docx`, and so on,
/// the way browsers name repeated downloads.
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(filename);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Should leave an existing matching extension untouched, ignoring case.
    #[test]
    fn ensure_extension_preserves_matching_extension_case_insensitive() {
        let path = PathBuf::from("/tmp/report.DOCX");
        let result = ensure_extension(path.clone(), "docx");

        assert_eq!(result, path);
    }

    // Should replace an unmatched extension with the requested one.
    #[test]
    fn ensure_extension_replaces_when_different() {
        let path = PathBuf::from("report.txt");
        let result = ensure_extension(path, "docx");

        assert_eq!(result.extension().and_then(|e| e.to_str()), Some("docx"));
    }

    #[test]
    fn ensure_extension_appends_after_unknown_suffix() {
        let result = ensure_extension(PathBuf::from("/tmp/report v1.2"), "docx");

        assert_eq!(result, PathBuf::from("/tmp/report v1.2.docx"));
    }

    #[test]
    fn ensure_extension_adds_missing_extension() {
        let result = ensure_extension(PathBuf::from("/tmp/report"), "docx");

        assert_eq!(result, PathBuf::from("/tmp/report.docx"));
    }

    #[test]
    fn unique_path_returns_plain_name_when_free() {
        let tmp = TempDir::new().unwrap();

        assert_eq!(
            unique_path(tmp.path(), "document.docx"),
            tmp.path().join("document.docx")
        );
    }

    #[test]
    fn unique_path_numbers_repeated_downloads() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("document.docx"), b"x").unwrap();
        std::fs::write(tmp.path().join("document (1).docx"), b"x").unwrap();

        assert_eq!(
            unique_path(tmp.path(), "document.docx"),
            tmp.path().join("document (2).docx")
        );
    }
}
