// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring the editor, the document actions, and commands.

use std::path::{Path, PathBuf};

use crate::config::DocPackConfig;
use crate::logic::actions::{ClearAction, ClearActivation, SaveAction, SaveActivation};
use crate::logic::enabled::EnabledSignal;
use crate::logic::interceptors::{confirm_discard, export_to_dir};
use crate::logic::packager::DocumentPackager;
use crate::logic::sink::{Capabilities, SaveOutcome, select_sink};
use crate::ui::components::editor::{self, EditorModel, EditorMsg};

/// Top-level application state.
#[derive(Debug)]
pub struct AppModel {
    /// Document editor acting as the host.
    pub editor: EditorModel,
    /// Gate for the save control, fed by editor events.
    pub save_enabled: EnabledSignal,
    /// File written by the most recent save.
    pub last_saved: Option<PathBuf>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
}

impl AppModel {
    pub fn new(require_content: bool) -> Self {
        let mut editor = EditorModel::default();
        let save_enabled = EnabledSignal::new(require_content);
        save_enabled.subscribe_to(&mut editor.feed);
        save_enabled.recompute(editor.read_only, &editor.text);

        Self {
            editor,
            save_enabled,
            last_saved: None,
            status: None,
            error: None,
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Document actions available to commands.
#[derive(Debug)]
pub struct Actions {
    pub save: SaveAction,
    pub clear: ClearAction,
}

impl Actions {
    /// Build the actions once at startup: probe the environment, pick a sink,
    /// and install the configured interceptors.
    pub fn from_config(config: &DocPackConfig) -> Self {
        let packager = DocumentPackager::with_filename(&config.document.filename);

        let caps = Capabilities::probe(config.save.download_dir.as_deref());
        let sink = match select_sink(config.save.mechanism, &caps) {
            Ok(sink) => Some(sink),
            Err(err) => {
                tracing::error!("{err}");
                None
            }
        };

        let save = match &config.save.export_dir {
            Some(dir) => {
                SaveAction::with_interceptor(packager.clone(), sink, export_to_dir(dir.clone()))
            }
            None => SaveAction::new(packager.clone(), sink),
        };
        let clear = if config.clear.confirm {
            ClearAction::with_interceptor(packager, confirm_discard)
        } else {
            ClearAction::new(packager)
        };

        Self { save, clear }
    }
}

/// Application messages routed through the update function.
#[derive(Clone, Debug)]
pub enum Msg {
    Editor(EditorMsg),
    SaveClicked,
    NewClicked,
    SaveCompleted(Result<SaveActivation, String>),
    ClearCompleted(Result<ClearActivation, String>),
    RevealLastSaved,
    DismissError,
}

/// Commands represent side-effects executed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SaveDocument,
    ClearDocument,
    /// Open the folder containing a file in the system file manager.
    Reveal(PathBuf),
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::Editor(m) => editor::update(&mut model.editor, m),
        Msg::DismissError => model.error = None,
        Msg::SaveClicked => {
            if model.save_enabled.is_enabled() {
                cmds.push(Command::SaveDocument);
            } else {
                tracing::warn!("save activated while disabled; ignoring");
            }
        }
        Msg::NewClicked => cmds.push(Command::ClearDocument),
        Msg::RevealLastSaved => {
            if let Some(dir) = model.last_saved.as_deref().and_then(Path::parent) {
                cmds.push(Command::Reveal(dir.to_path_buf()));
            }
        }
        Msg::SaveCompleted(result) => match result {
            Ok(SaveActivation::Saved(SaveOutcome::Saved(path))) => {
                surface_event(model, format!("Document saved: {}", path.display()), false);
                model.last_saved = Some(path);
            }
            Ok(SaveActivation::Saved(SaveOutcome::Cancelled)) => {
                surface_event(model, "Save cancelled.".to_string(), false)
            }
            Ok(SaveActivation::Intercepted) => {
                surface_event(model, "Document handed off.".to_string(), false)
            }
            Err(err) => surface_event(model, format!("Failed to save document:\n\n{err}"), true),
        },
        Msg::ClearCompleted(result) => match result {
            Ok(ClearActivation::Cleared) => {
                surface_event(model, "Started a new document.".to_string(), false)
            }
            Ok(ClearActivation::Aborted) => {
                surface_event(model, "Kept the current document.".to_string(), false)
            }
            Err(err) => surface_event(model, format!("Failed to clear document:\n\n{err}"), true),
        },
    }
}

/// Execute a command synchronously and return a resulting message.
///
/// Commands run on the UI thread inside the frame that produced them, so the
/// whole activation completes before the next event is handled.
pub fn run_command(cmd: Command, model: &mut AppModel, actions: &Actions) -> Option<Msg> {
    match cmd {
        Command::SaveDocument => Some(Msg::SaveCompleted(
            actions
                .save
                .activate(&model.editor)
                .map_err(|e| e.to_string()),
        )),
        Command::ClearDocument => Some(Msg::ClearCompleted(
            actions
                .clear
                .activate(&mut model.editor)
                .map_err(|e| e.to_string()),
        )),
        Command::Reveal(dir) => {
            if let Err(err) = open::that(&dir) {
                tracing::warn!("failed to open {}: {err}", dir.display());
                surface_event(model, format!("Could not open {}", dir.display()), false);
            }
            None
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::sink::{DirectoryLinkHost, LinkSaveSink};
    use std::fs;
    use tempfile::TempDir;

    fn link_actions(dir: &Path) -> Actions {
        let packager = DocumentPackager::default();
        Actions {
            save: SaveAction::new(
                packager.clone(),
                Some(Box::new(LinkSaveSink::new(DirectoryLinkHost::new(dir)))),
            ),
            clear: ClearAction::new(packager),
        }
    }

    fn type_text(model: &mut AppModel, text: &str) {
        let mut cmds = Vec::new();
        update(
            model,
            Msg::Editor(EditorMsg::SetText(text.into())),
            &mut cmds,
        );
        assert!(cmds.is_empty());
    }

    /// Run every queued command and feed the results back through `update`.
    fn drain(model: &mut AppModel, actions: &Actions, mut cmds: Vec<Command>) {
        while let Some(cmd) = cmds.pop() {
            if let Some(msg) = run_command(cmd, model, actions) {
                update(model, msg, &mut cmds);
            }
        }
    }

    #[test]
    fn save_disabled_for_blank_document() {
        let mut model = AppModel::default();
        type_text(&mut model, "   ");

        let mut cmds = Vec::new();
        update(&mut model, Msg::SaveClicked, &mut cmds);

        assert!(cmds.is_empty());
    }

    #[test]
    fn save_request_enqueues_and_completes() {
        let tmp = TempDir::new().unwrap();
        let actions = link_actions(tmp.path());
        let mut model = AppModel::default();
        type_text(&mut model, "<p>Hello</p>");

        let mut cmds = Vec::new();
        update(&mut model, Msg::SaveClicked, &mut cmds);
        assert_eq!(cmds, vec![Command::SaveDocument]);
        drain(&mut model, &actions, cmds);

        let saved = tmp.path().join("document.docx");
        assert!(model.error.is_none());
        assert_eq!(model.last_saved.as_deref(), Some(saved.as_path()));
        assert!(
            model
                .status
                .as_deref()
                .is_some_and(|s| s.contains("Document saved"))
        );
        let bytes = fs::read(saved).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("\u{FEFF}<html"));
        assert!(text.ends_with("<body><p>Hello</p></body></html>"));
    }

    #[test]
    fn read_only_disables_save() {
        let mut model = AppModel::default();
        type_text(&mut model, "<p>Hello</p>");
        assert!(model.save_enabled.is_enabled());

        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::Editor(EditorMsg::SetReadOnly(true)),
            &mut cmds,
        );
        update(&mut model, Msg::SaveClicked, &mut cmds);

        assert!(!model.save_enabled.is_enabled());
        assert!(cmds.is_empty());
    }

    #[test]
    fn blank_document_can_be_saved_when_content_not_required() {
        let model = AppModel::new(false);

        assert!(model.save_enabled.is_enabled());
    }

    #[test]
    fn new_document_clears_and_disables_save() {
        let tmp = TempDir::new().unwrap();
        let actions = link_actions(tmp.path());
        let mut model = AppModel::default();
        type_text(&mut model, "<p>Old</p>");

        let mut cmds = Vec::new();
        update(&mut model, Msg::NewClicked, &mut cmds);
        drain(&mut model, &actions, cmds);

        assert_eq!(model.editor.text, "");
        assert!(!model.save_enabled.is_enabled());
        assert_eq!(model.status.as_deref(), Some("Started a new document."));
    }

    #[test]
    fn refused_clear_keeps_document() {
        let tmp = TempDir::new().unwrap();
        let packager = DocumentPackager::default();
        let actions = Actions {
            save: SaveAction::new(
                packager.clone(),
                Some(Box::new(LinkSaveSink::new(DirectoryLinkHost::new(tmp.path())))),
            ),
            clear: ClearAction::with_interceptor(packager, |_| Ok(false)),
        };
        let mut model = AppModel::default();
        type_text(&mut model, "<p>Keep</p>");

        let mut cmds = Vec::new();
        update(&mut model, Msg::NewClicked, &mut cmds);
        drain(&mut model, &actions, cmds);

        assert_eq!(model.editor.text, "<p>Keep</p>");
        assert_eq!(model.status.as_deref(), Some("Kept the current document."));
    }

    #[test]
    fn missing_save_mechanism_shows_error() {
        let actions = Actions {
            save: SaveAction::new(DocumentPackager::default(), None),
            clear: ClearAction::new(DocumentPackager::default()),
        };
        let mut model = AppModel::default();
        type_text(&mut model, "<p>x</p>");

        let mut cmds = Vec::new();
        update(&mut model, Msg::SaveClicked, &mut cmds);
        drain(&mut model, &actions, cmds);

        assert!(
            model
                .error
                .as_deref()
                .is_some_and(|e| e.contains("no supported save mechanism"))
        );
    }

    #[test]
    fn save_cancelled_sets_status() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::SaveCompleted(Ok(SaveActivation::Saved(SaveOutcome::Cancelled))),
            &mut cmds,
        );

        assert!(cmds.is_empty());
        assert_eq!(model.status.as_deref(), Some("Save cancelled."));
        assert!(model.error.is_none());
    }

    #[test]
    fn reveal_targets_parent_of_last_save() {
        let mut model = AppModel {
            last_saved: Some(PathBuf::from("/tmp/out/document.docx")),
            ..AppModel::default()
        };
        let mut cmds = Vec::new();

        update(&mut model, Msg::RevealLastSaved, &mut cmds);

        assert_eq!(cmds, vec![Command::Reveal(PathBuf::from("/tmp/out"))]);
    }
}
