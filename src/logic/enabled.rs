// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Enable/disable gate for document actions, driven by host events.

use std::cell::Cell;
use std::rc::Rc;

use crate::logic::host::EventFeed;

/// Whether an action may be activated.
///
/// Clones share the same value, so the copy subscribed to the host feed and
/// the copy read by the toolbar always agree. Recomputing is idempotent; the
/// latest host event wins.
#[derive(Clone, Debug)]
pub struct EnabledSignal {
    require_content: bool,
    value: Rc<Cell<bool>>,
}

impl EnabledSignal {
    /// New signal, initially disabled until the first recompute.
    ///
    /// With `require_content` the signal also stays off while the document is blank.
    pub fn new(require_content: bool) -> Self {
        Self {
            require_content,
            value: Rc::new(Cell::new(false)),
        }
    }

    /// Pure enablement rule.
    pub fn evaluate(require_content: bool, read_only: bool, content: &str) -> bool {
        !read_only && (!require_content || !content.trim().is_empty())
    }

    pub fn recompute(&self, read_only: bool, content: &str) -> bool {
        let enabled = Self::evaluate(self.require_content, read_only, content);
        if enabled != self.value.get() {
            tracing::debug!(enabled, read_only, "enabled signal changed");
        }
        self.value.set(enabled);
        enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.value.get()
    }

    /// Recompute on every host event from now on.
    pub fn subscribe_to(&self, feed: &mut EventFeed) {
        let signal = self.clone();
        feed.subscribe(move |_, snapshot| {
            signal.recompute(snapshot.read_only, snapshot.content);
        });
    }
}
