// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! HTML source editor acting as the document host for the toolbar actions.

use eframe::egui;
use egui::text::{CCursor, CCursorRange};
use egui::text_edit::TextEditState;
use egui_phosphor::regular;

use crate::logic::host::{DocumentHost, EventFeed, HostEvent, HostSnapshot};

/// Editor state, including cursor selection metadata and the change feed.
#[derive(Debug)]
pub struct EditorModel {
    /// Serialized HTML document body.
    pub text: String,
    /// Editing disabled.
    pub read_only: bool,
    /// Current heading level for insertions (1-6).
    pub heading_level: u8,
    /// Current cursor selection from egui.
    pub cursor: Option<CCursorRange>,
    /// Explicit cursor override applied after mutations.
    pub cursor_override: Option<CCursorRange>,
    /// Observers notified on content and read-only changes.
    pub feed: EventFeed,
}

impl Default for EditorModel {
    fn default() -> Self {
        Self {
            text: String::new(),
            read_only: false,
            heading_level: 1,
            cursor: None,
            cursor_override: None,
            feed: EventFeed::default(),
        }
    }
}

impl EditorModel {
    fn notify(&mut self, event: HostEvent) {
        self.feed.emit(
            event,
            HostSnapshot {
                content: &self.text,
                read_only: self.read_only,
            },
        );
    }
}

impl DocumentHost for EditorModel {
    fn content(&self) -> String {
        self.text.clone()
    }

    fn set_content(&mut self, content: &str) {
        self.text = content.to_string();
        let end = CCursorRange::one(CCursor::new(self.text.chars().count()));
        self.cursor = Some(end);
        self.cursor_override = Some(end);
        self.notify(HostEvent::ContentChanged);
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleKind {
    /// Wrap in `<p>`.
    Paragraph,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Insert a link template.
    Link,
    Quote,
    /// Inline `<code>`.
    Code,
    ListUnordered,
    ListOrdered,
    /// Insert a horizontal rule.
    Rule,
}

/// Messages emitted by the editor view to mutate state.
#[derive(Clone, Debug)]
pub enum EditorMsg {
    SetText(String),
    SetReadOnly(bool),
    SetCursor(Option<CCursorRange>),
    ClearCursorOverride,
    SetHeadingLevel(u8),
    InsertHeading(u8),
    ApplyStyle(StyleKind),
}

/// Update the editor model in response to a message.
///
/// Text edits are ignored while the editor is read-only.
pub fn update(model: &mut EditorModel, msg: EditorMsg) {
    match msg {
        EditorMsg::SetText(text) if !model.read_only => {
            model.text = text;
            model.notify(HostEvent::ContentChanged);
        }
        EditorMsg::SetReadOnly(read_only) => {
            if model.read_only != read_only {
                model.read_only = read_only;
                model.notify(HostEvent::ReadOnlyChanged);
            }
        }
        EditorMsg::SetCursor(cursor) => model.cursor = cursor,
        EditorMsg::ClearCursorOverride => model.cursor_override = None,
        EditorMsg::SetHeadingLevel(level) => model.heading_level = level.clamp(1, 6),
        EditorMsg::InsertHeading(level) if !model.read_only => {
            insert_heading(model, level);
            model.notify(HostEvent::ContentChanged);
        }
        EditorMsg::ApplyStyle(kind) if !model.read_only => {
            apply_style_kind(model, kind);
            model.notify(HostEvent::ContentChanged);
        }
        EditorMsg::SetText(_) | EditorMsg::InsertHeading(_) | EditorMsg::ApplyStyle(_) => {
            tracing::debug!("edit ignored: editor is read-only");
        }
    }
}

const STYLE_BUTTONS: &[(&str, &str, StyleKind)] = &[
    (regular::PARAGRAPH, "Paragraph", StyleKind::Paragraph),
    (regular::TEXT_BOLDER, "Bold", StyleKind::Bold),
    (regular::TEXT_ITALIC, "Italic", StyleKind::Italic),
    (regular::TEXT_UNDERLINE, "Underline", StyleKind::Underline),
    (
        regular::TEXT_STRIKETHROUGH,
        "Strikethrough",
        StyleKind::Strikethrough,
    ),
    (regular::LINK, "Link", StyleKind::Link),
    (regular::QUOTES, "Quote", StyleKind::Quote),
    (regular::CODE_SIMPLE, "Code", StyleKind::Code),
    (regular::LIST_BULLETS, "Bulleted list", StyleKind::ListUnordered),
    (regular::LIST_NUMBERS, "Numbered list", StyleKind::ListOrdered),
    (regular::MINUS, "Horizontal rule", StyleKind::Rule),
];

/// Render the formatting toolbar and text area, emitting messages instead of mutating state directly.
pub fn view(model: &EditorModel, ui: &mut egui::Ui) -> Vec<EditorMsg> {
    let mut msgs = Vec::new();

    ui.vertical(|ui| {
        ui.add_enabled_ui(!model.read_only, |ui| {
            ui.horizontal(|ui| {
                let heading_resp = egui::ComboBox::from_id_salt("heading_picker")
                    .width(40.0)
                    .selected_text(heading_icon(model.heading_level))
                    .show_ui(ui, |ui| {
                        for lvl in 1..=6u8 {
                            if ui
                                .selectable_label(model.heading_level == lvl, heading_icon(lvl))
                                .clicked()
                            {
                                msgs.push(EditorMsg::SetHeadingLevel(lvl));
                                msgs.push(EditorMsg::InsertHeading(lvl));
                            }
                        }
                    });
                heading_resp.response.on_hover_text("Heading");
                ui.separator();

                for (icon, label, kind) in STYLE_BUTTONS {
                    if ui.button(*icon).on_hover_text(*label).clicked() {
                        msgs.push(EditorMsg::ApplyStyle(*kind));
                    }
                }
            });
        });

        ui.add_space(4.0);

        let body_id = ui.id().with("document_text_edit");

        if let Some(state) = TextEditState::load(ui.ctx(), body_id) {
            msgs.push(EditorMsg::SetCursor(state.cursor.char_range()));
        }

        let line_height = ui.text_style_height(&egui::TextStyle::Monospace);
        let desired_rows = (ui.available_height() / line_height).max(1.0) as usize;

        let mut buffer = model.text.clone();
        let mut output = egui::TextEdit::multiline(&mut buffer)
            .code_editor()
            .id_source(body_id)
            .interactive(!model.read_only)
            .hint_text("<p>Start typing HTML…</p>")
            .desired_width(f32::INFINITY)
            .desired_rows(desired_rows)
            .show(ui);

        if buffer != model.text {
            msgs.push(EditorMsg::SetText(buffer));
        }

        if let Some(override_range) = model.cursor_override {
            output.state.cursor.set_char_range(Some(override_range));
            msgs.push(EditorMsg::SetCursor(Some(override_range)));
            msgs.push(EditorMsg::ClearCursorOverride);
        } else {
            msgs.push(EditorMsg::SetCursor(
                output.state.cursor.char_range().or_else(|| {
                    Some(CCursorRange::one(CCursor::new(model.text.chars().count())))
                }),
            ));
        }

        output.state.store(ui.ctx(), body_id);
    });

    msgs
}

/// Map a heading level to its phosphor icon glyph.
fn heading_icon(level: u8) -> &'static str {
    match level {
        1 => regular::TEXT_H_ONE,
        2 => regular::TEXT_H_TWO,
        3 => regular::TEXT_H_THREE,
        4 => regular::TEXT_H_FOUR,
        5 => regular::TEXT_H_FIVE,
        6 => regular::TEXT_H_SIX,
        _ => regular::TEXT_H,
    }
}

/// Wrap the selection in an `<hN>` element.
fn insert_heading(model: &mut EditorModel, level: u8) {
    let level = level.clamp(1, 6);
    model.heading_level = level;
    apply_style(
        model,
        &format!("<h{level}>"),
        &format!("</h{level}>"),
        "Title",
        true,
    );
}

/// Dispatch a style action into a concrete tag insertion around the selection.
fn apply_style_kind(model: &mut EditorModel, kind: StyleKind) {
    match kind {
        StyleKind::Paragraph => apply_style(model, "<p>", "</p>", "text", true),
        StyleKind::Bold => apply_style(model, "<strong>", "</strong>", "bold", false),
        StyleKind::Italic => apply_style(model, "<em>", "</em>", "italic", false),
        StyleKind::Underline => apply_style(model, "<u>", "</u>", "text", false),
        StyleKind::Strikethrough => apply_style(model, "<s>", "</s>", "text", false),
        StyleKind::Link => apply_style(model, "<a href=\"https://example.com\">", "</a>", "text", false),
        StyleKind::Quote => apply_style(model, "<blockquote>", "</blockquote>", "quote", true),
        StyleKind::Code => apply_style(model, "<code>", "</code>", "code", false),
        StyleKind::ListUnordered => apply_style(model, "<ul><li>", "</li></ul>", "item", true),
        StyleKind::ListOrdered => apply_style(model, "<ol><li>", "</li></ol>", "first", true),
        StyleKind::Rule => apply_style(model, "<hr>", "", "", true),
    }
}

/// Return (start, end, selected text) for the current cursor range.
fn selection(model: &EditorModel) -> (usize, usize, String) {
    let (start_char, end_char) = if let Some(range) = &model.cursor {
        let (a, b) = (range.primary.index, range.secondary.index);
        (a.min(b), a.max(b))
    } else {
        let len = model.text.chars().count();
        (len, len)
    };

    let selected = if start_char < end_char {
        model
            .text
            .chars()
            .skip(start_char)
            .take(end_char - start_char)
            .collect::<String>()
    } else {
        String::new()
    };

    (start_char, end_char, selected)
}

/// Apply a prefix/suffix insertion around the current selection, updating cursor placement.
///
/// Block elements are put on their own line.
fn apply_style(
    model: &mut EditorModel,
    prefix: &str,
    suffix: &str,
    placeholder: &str,
    block: bool,
) {
    let (start_char, end_char, selected) = selection(model);
    let start = char_to_byte(&model.text, start_char);
    let end = char_to_byte(&model.text, end_char);

    let inner = if selected.is_empty() {
        placeholder
    } else {
        &selected
    };
    let mut insertion = format!("{prefix}{inner}{suffix}");

    if block {
        if !model.text[end..].starts_with('\n') {
            insertion.push('\n');
        }
        if start > 0 && !model.text[..start].ends_with('\n') {
            insertion.insert(0, '\n');
        }
    }

    model.text.replace_range(start..end, &insertion);

    let new_pos = start_char + insertion.chars().count();
    let new_range = CCursorRange::one(CCursor::new(new_pos));
    model.cursor = Some(new_range);
    model.cursor_override = model.cursor;
}

/// Convert a character index to a byte index, clamping to the string end.
fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
