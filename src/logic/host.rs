// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Boundary between the document actions and the editing host.

/// Content accessor implemented by the editing host.
pub trait DocumentHost {
    /// Current document content as serialized HTML.
    fn content(&self) -> String;
    /// Replace the document content.
    fn set_content(&mut self, content: &str);
    fn is_read_only(&self) -> bool;
}

/// Change notifications emitted by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    ContentChanged,
    ReadOnlyChanged,
}

/// Host state delivered alongside every event.
#[derive(Clone, Copy, Debug)]
pub struct HostSnapshot<'a> {
    pub content: &'a str,
    pub read_only: bool,
}

type Observer = Box<dyn FnMut(HostEvent, HostSnapshot<'_>)>;

/// Observer registry the host notifies on every change.
///
/// Subscriptions live as long as the feed; there is no unsubscribe.
#[derive(Default)]
pub struct EventFeed {
    observers: Vec<Observer>,
}

impl EventFeed {
    pub fn subscribe(&mut self, observer: impl FnMut(HostEvent, HostSnapshot<'_>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn emit(&mut self, event: HostEvent, snapshot: HostSnapshot<'_>) {
        for observer in &mut self.observers {
            observer(event, snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for EventFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFeed")
            .field("observers", &self.observers.len())
            .finish()
    }
}
