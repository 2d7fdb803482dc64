// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Download sinks that persist a [`Package`] on the user's filesystem.
//!
//! Two mechanisms exist:
//! - [`NativeSaveSink`] asks for a target through a native "save as" dialog.
//! - [`LinkSaveSink`] attaches a transient download link pointing at a `data:`
//!   URI, activates it and detaches it again.
//!
//! Both write the same bytes. The mechanism is picked once at startup by
//! [`select_sink`] from a [`Capabilities`] probe.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::config::SaveMechanism;
use crate::models::package::Package;
use crate::utils::{ensure_extension, unique_path};

/// Failures while persisting a package.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no supported save mechanism is available in this environment")]
    NoSaveMechanism,
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("download link does not carry a valid data URI")]
    InvalidDataUri,
    #[error("download link could not be activated: {0}")]
    Activation(String),
}

/// Result of a save attempt that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// File written at the given path.
    Saved(PathBuf),
    /// The user dismissed the save prompt.
    Cancelled,
}

/// Strategy for persisting packages.
pub trait DownloadSink {
    /// Short name for logs and the status bar.
    fn name(&self) -> &'static str;

    fn save(&self, package: &Package) -> Result<SaveOutcome, SinkError>;
}

fn write_package(path: &Path, package: &Package) -> Result<(), SinkError> {
    fs::write(path, package.bytes()).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Native "save as"

/// Prompt returning the path chosen by the user, or `None` when dismissed.
pub trait SaveDialog {
    fn prompt(&self, filename: &str) -> Option<PathBuf>;
}

/// Native file dialog provided by `rfd`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RfdDialog;

impl SaveDialog for RfdDialog {
    fn prompt(&self, filename: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save document")
            .add_filter("Word document", &["docx"])
            .set_file_name(filename)
            .save_file()
    }
}

/// Saves through a native "save as" prompt pre-filled with the package filename.
#[derive(Debug, Default)]
pub struct NativeSaveSink<D = RfdDialog> {
    dialog: D,
}

impl<D: SaveDialog> NativeSaveSink<D> {
    pub fn new(dialog: D) -> Self {
        Self { dialog }
    }
}

impl<D: SaveDialog> DownloadSink for NativeSaveSink<D> {
    fn name(&self) -> &'static str {
        "native dialog"
    }

    fn save(&self, package: &Package) -> Result<SaveOutcome, SinkError> {
        let Some(path) = self.dialog.prompt(package.filename()) else {
            tracing::debug!("save dialog dismissed");
            return Ok(SaveOutcome::Cancelled);
        };
        let path = ensure_extension(path, "docx");
        write_package(&path, package)?;
        Ok(SaveOutcome::Saved(path))
    }
}

// ---------------------------------------------------------------------------
// Synthetic download link

/// Handle of an attached link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkId(u64);

/// Download link: target URI plus the filename to store it under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub download: String,
}

/// Surface that can hold and activate download links.
pub trait LinkHost {
    fn attach(&self, anchor: Anchor) -> LinkId;
    fn activate(&self, id: LinkId) -> Result<SaveOutcome, SinkError>;
    fn detach(&self, id: LinkId);
}

/// Attached link that is detached when dropped, on success and on error alike.
struct TransientLink<'a, H: LinkHost + ?Sized> {
    host: &'a H,
    id: LinkId,
}

impl<'a, H: LinkHost + ?Sized> TransientLink<'a, H> {
    fn attach(host: &'a H, anchor: Anchor) -> Self {
        let id = host.attach(anchor);
        Self { host, id }
    }

    fn activate(&self) -> Result<SaveOutcome, SinkError> {
        self.host.activate(self.id)
    }
}

impl<H: LinkHost + ?Sized> Drop for TransientLink<'_, H> {
    fn drop(&mut self) {
        self.host.detach(self.id);
    }
}

/// Saves by activating a transient `data:` URI link on a [`LinkHost`].
#[derive(Debug)]
pub struct LinkSaveSink<H> {
    host: H,
}

impl<H: LinkHost> LinkSaveSink<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: LinkHost> DownloadSink for LinkSaveSink<H> {
    fn name(&self) -> &'static str {
        "download link"
    }

    fn save(&self, package: &Package) -> Result<SaveOutcome, SinkError> {
        let link = TransientLink::attach(
            &self.host,
            Anchor {
                href: package.data_uri(),
                download: package.filename().to_string(),
            },
        );
        link.activate()
    }
}

/// Split a `data:` URI into its media type and decoded bytes.
///
/// Only the percent-encoded form produced by [`Package::data_uri`] is accepted.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), SinkError> {
    let rest = uri.strip_prefix("data:").ok_or(SinkError::InvalidDataUri)?;
    let (meta, data) = rest.split_once(',').ok_or(SinkError::InvalidDataUri)?;
    if meta.split(';').any(|param| param.eq_ignore_ascii_case("base64")) {
        return Err(SinkError::InvalidDataUri);
    }
    let mime = meta.split(';').next().unwrap_or_default().to_string();
    Ok((mime, percent_decode_str(data).collect()))
}

/// Link host that resolves activated links into a download directory.
///
/// Repeated downloads of the same name are numbered instead of overwritten.
#[derive(Debug)]
pub struct DirectoryLinkHost {
    dir: PathBuf,
    next_id: Cell<u64>,
    links: RefCell<HashMap<LinkId, Anchor>>,
}

impl DirectoryLinkHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_id: Cell::new(0),
            links: RefCell::new(HashMap::new()),
        }
    }

    /// Number of links currently attached.
    pub fn attached(&self) -> usize {
        self.links.borrow().len()
    }
}

impl LinkHost for DirectoryLinkHost {
    fn attach(&self, anchor: Anchor) -> LinkId {
        let id = LinkId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.links.borrow_mut().insert(id, anchor);
        id
    }

    fn activate(&self, id: LinkId) -> Result<SaveOutcome, SinkError> {
        let anchor = self
            .links
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| SinkError::Activation(format!("link {} is not attached", id.0)))?;
        let (_, bytes) = decode_data_uri(&anchor.href)?;

        fs::create_dir_all(&self.dir).map_err(|source| SinkError::Io {
            path: self.dir.clone(),
            source,
        })?;
        // A download name never carries directories.
        let name = Path::new(&anchor.download)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                SinkError::Activation(format!("invalid download name {:?}", anchor.download))
            })?;
        let path = unique_path(&self.dir, name);
        fs::write(&path, bytes).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(SaveOutcome::Saved(path))
    }

    fn detach(&self, id: LinkId) {
        self.links.borrow_mut().remove(&id);
    }
}

// ---------------------------------------------------------------------------
// Selection

/// What the running environment offers for saving files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// A native save dialog can be shown.
    pub native_dialog: bool,
    /// Existing directory the download link can write into.
    pub download_dir: Option<PathBuf>,
}

impl Capabilities {
    /// Probe the current environment. `download_dir` overrides the user's download directory.
    pub fn probe(download_dir: Option<&Path>) -> Self {
        let download_dir = download_dir
            .map(Path::to_path_buf)
            .or_else(dirs::download_dir)
            .filter(|dir| dir.is_dir());
        let caps = Self {
            native_dialog: native_dialog_available(),
            download_dir,
        };
        tracing::debug!(?caps, "probed save capabilities");
        caps
    }
}

#[cfg(any(target_os = "windows", target_os = "macos"))]
fn native_dialog_available() -> bool {
    true
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn native_dialog_available() -> bool {
    std::env::var_os("WAYLAND_DISPLAY").is_some() || std::env::var_os("DISPLAY").is_some()
}

/// Pick the sink for `mechanism` given the probed capabilities.
pub fn select_sink(
    mechanism: SaveMechanism,
    caps: &Capabilities,
) -> Result<Box<dyn DownloadSink>, SinkError> {
    let native = || Box::new(NativeSaveSink::new(RfdDialog)) as Box<dyn DownloadSink>;
    let link = |dir: &PathBuf| {
        Box::new(LinkSaveSink::new(DirectoryLinkHost::new(dir.clone()))) as Box<dyn DownloadSink>
    };

    let sink = match (mechanism, caps.native_dialog, &caps.download_dir) {
        (SaveMechanism::Auto | SaveMechanism::Native, true, _) => native(),
        (SaveMechanism::Auto | SaveMechanism::Link, _, Some(dir)) => link(dir),
        _ => return Err(SinkError::NoSaveMechanism),
    };
    tracing::info!(mechanism = ?mechanism, sink = sink.name(), "selected download sink");
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::packager::DocumentPackager;
    use tempfile::TempDir;

    struct FixedDialog(Option<PathBuf>);

    impl SaveDialog for FixedDialog {
        fn prompt(&self, _filename: &str) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    /// Link host whose activation always fails, recording detaches.
    #[derive(Default)]
    struct BrokenLinkHost {
        attached: RefCell<Vec<LinkId>>,
        detached: RefCell<Vec<LinkId>>,
    }

    impl LinkHost for BrokenLinkHost {
        fn attach(&self, _anchor: Anchor) -> LinkId {
            let id = LinkId(self.attached.borrow().len() as u64);
            self.attached.borrow_mut().push(id);
            id
        }

        fn activate(&self, _id: LinkId) -> Result<SaveOutcome, SinkError> {
            Err(SinkError::Activation("blocked".into()))
        }

        fn detach(&self, id: LinkId) {
            self.detached.borrow_mut().push(id);
        }
    }

    fn hello() -> Package {
        DocumentPackager::default().package("<p>Hello</p>")
    }

    #[test]
    fn native_sink_writes_payload_to_chosen_path() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out");
        let sink = NativeSaveSink::new(FixedDialog(Some(target)));

        let outcome = sink.save(&hello()).unwrap();

        let expected = tmp.path().join("out.docx");
        assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));
        assert_eq!(fs::read(expected).unwrap(), hello().bytes());
    }

    #[test]
    fn native_sink_reports_dismissed_dialog() {
        let sink = NativeSaveSink::new(FixedDialog(None));

        assert_eq!(sink.save(&hello()).unwrap(), SaveOutcome::Cancelled);
    }

    #[test]
    fn link_sink_writes_identical_bytes_under_package_filename() {
        let tmp = TempDir::new().unwrap();
        let sink = LinkSaveSink::new(DirectoryLinkHost::new(tmp.path()));

        let outcome = sink.save(&hello()).unwrap();

        let expected = tmp.path().join("document.docx");
        assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));
        assert_eq!(fs::read(expected).unwrap(), hello().bytes());
        assert_eq!(sink.host().attached(), 0, "link must be detached after use");
    }

    #[test]
    fn link_sink_numbers_repeated_downloads() {
        let tmp = TempDir::new().unwrap();
        let sink = LinkSaveSink::new(DirectoryLinkHost::new(tmp.path()));

        sink.save(&hello()).unwrap();
        let second = sink.save(&hello()).unwrap();

        assert_eq!(
            second,
            SaveOutcome::Saved(tmp.path().join("document (1).docx"))
        );
    }

    #[test]
    fn link_host_strips_directories_from_download_name() {
        let tmp = TempDir::new().unwrap();
        let downloads = tmp.path().join("downloads");
        let host = DirectoryLinkHost::new(&downloads);
        let href = hello().data_uri();

        for download in ["../escaped.docx", "/abs/escaped.docx"] {
            let id = host.attach(Anchor {
                href: href.clone(),
                download: download.to_string(),
            });
            let outcome = host.activate(id).unwrap();
            host.detach(id);

            let SaveOutcome::Saved(path) = outcome else {
                panic!("expected a saved file for {download}");
            };
            assert_eq!(path.parent(), Some(downloads.as_path()));
        }
        assert!(!tmp.path().join("escaped.docx").exists());
    }

    #[test]
    fn link_host_rejects_download_name_without_file_component() {
        let tmp = TempDir::new().unwrap();
        let host = DirectoryLinkHost::new(tmp.path());
        let id = host.attach(Anchor {
            href: hello().data_uri(),
            download: "..".to_string(),
        });

        assert!(matches!(host.activate(id), Err(SinkError::Activation(_))));
    }

    #[test]
    fn configured_filename_stays_inside_download_dir() {
        let tmp = TempDir::new().unwrap();
        let downloads = tmp.path().join("downloads");
        let sink = LinkSaveSink::new(DirectoryLinkHost::new(&downloads));
        let package = DocumentPackager::with_filename("../escaped").package("<p>x</p>");

        let outcome = sink.save(&package).unwrap();

        assert_eq!(outcome, SaveOutcome::Saved(downloads.join("escaped.docx")));
        assert!(!tmp.path().join("escaped.docx").exists());
    }

    #[test]
    fn link_is_detached_when_activation_fails() {
        let sink = LinkSaveSink::new(BrokenLinkHost::default());

        let err = sink.save(&hello()).unwrap_err();

        assert!(matches!(err, SinkError::Activation(_)));
        assert_eq!(*sink.host().attached.borrow(), vec![LinkId(0)]);
        assert_eq!(*sink.host().detached.borrow(), vec![LinkId(0)]);
    }

    #[test]
    fn data_uri_decodes_back_to_payload() {
        let package = DocumentPackager::default().package("<p>100% «sure» & done</p>");

        let (mime, bytes) = decode_data_uri(&package.data_uri()).unwrap();

        assert_eq!(mime, package.mime());
        assert_eq!(bytes, package.bytes());
    }

    #[test]
    fn decode_rejects_foreign_uris() {
        assert!(matches!(
            decode_data_uri("https://example.com"),
            Err(SinkError::InvalidDataUri)
        ));
        assert!(matches!(
            decode_data_uri("data:text/plain;base64,SGk="),
            Err(SinkError::InvalidDataUri)
        ));
        assert!(matches!(
            decode_data_uri("data:text/plain"),
            Err(SinkError::InvalidDataUri)
        ));
    }

    #[test]
    fn auto_prefers_native_dialog() {
        let caps = Capabilities {
            native_dialog: true,
            download_dir: Some(PathBuf::from("/tmp")),
        };

        let sink = select_sink(SaveMechanism::Auto, &caps).unwrap();

        assert_eq!(sink.name(), "native dialog");
    }

    #[test]
    fn auto_falls_back_to_link() {
        let caps = Capabilities {
            native_dialog: false,
            download_dir: Some(PathBuf::from("/tmp")),
        };

        let sink = select_sink(SaveMechanism::Auto, &caps).unwrap();

        assert_eq!(sink.name(), "download link");
    }

    #[test]
    fn forced_link_ignores_native_dialog() {
        let caps = Capabilities {
            native_dialog: true,
            download_dir: Some(PathBuf::from("/tmp")),
        };

        assert_eq!(
            select_sink(SaveMechanism::Link, &caps).unwrap().name(),
            "download link"
        );
    }

    #[test]
    fn missing_mechanism_is_an_error() {
        let none = Capabilities::default();
        let link_only = Capabilities {
            native_dialog: false,
            download_dir: Some(PathBuf::from("/tmp")),
        };

        assert!(matches!(
            select_sink(SaveMechanism::Auto, &none),
            Err(SinkError::NoSaveMechanism)
        ));
        assert!(matches!(
            select_sink(SaveMechanism::Native, &link_only),
            Err(SinkError::NoSaveMechanism)
        ));
    }

    #[test]
    fn probe_honors_existing_download_dir_override() {
        let tmp = TempDir::new().unwrap();

        let caps = Capabilities::probe(Some(tmp.path()));

        assert_eq!(caps.download_dir.as_deref(), Some(tmp.path()));
    }
}
