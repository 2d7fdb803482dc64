// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! "Save document" and "New document" actions.
//!
//! Each activation runs synchronously to completion:
//! `Idle -> Activated -> Packaging -> (Intercepted | Saved | Cleared | Aborted) -> Idle`.
//! Nothing is carried over between activations except the registered interceptor.

use std::cell::{Cell, OnceCell};
use std::fmt;

use thiserror::Error;

use crate::logic::host::DocumentHost;
use crate::logic::packager::DocumentPackager;
use crate::logic::sink::{DownloadSink, SaveOutcome, SinkError};
use crate::models::package::Package;

/// Replaces the download: receives the package, nothing else happens afterwards.
pub type SaveInterceptor = dyn Fn(Package) -> anyhow::Result<()>;
/// Decides whether the document may be cleared.
pub type ClearInterceptor = dyn Fn(Package) -> anyhow::Result<bool>;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("an interceptor is already registered for this action")]
    InterceptorAlreadyRegistered,
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("interceptor failed: {0}")]
    Interceptor(#[source] anyhow::Error),
}

/// Phase of the activation currently running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Activated,
    Packaging,
    Intercepted,
    Saved,
    Cleared,
    Aborted,
}

/// Single-assignment slot for a caller-supplied interceptor.
pub struct InterceptorSlot<F: ?Sized> {
    inner: OnceCell<Box<F>>,
}

impl<F: ?Sized> Default for InterceptorSlot<F> {
    fn default() -> Self {
        Self {
            inner: OnceCell::new(),
        }
    }
}

impl<F: ?Sized> InterceptorSlot<F> {
    /// Fill the slot. A second registration is rejected and leaves the first in place.
    pub fn register(&self, interceptor: Box<F>) -> Result<(), ActionError> {
        self.inner
            .set(interceptor)
            .map_err(|_| ActionError::InterceptorAlreadyRegistered)
    }

    pub fn get(&self) -> Option<&F> {
        self.inner.get().map(|boxed| &**boxed)
    }

    pub fn is_registered(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl<F: ?Sized> fmt::Debug for InterceptorSlot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorSlot")
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Tracks the state machine of one action.
#[derive(Debug)]
struct Tracker {
    action: &'static str,
    state: Cell<ActionState>,
}

impl Tracker {
    fn new(action: &'static str) -> Self {
        Self {
            action,
            state: Cell::new(ActionState::Idle),
        }
    }

    fn begin(&self) -> Activation<'_> {
        let activation = Activation { tracker: self };
        activation.advance(ActionState::Activated);
        activation
    }
}

/// Running activation; returns the tracker to `Idle` when dropped.
struct Activation<'a> {
    tracker: &'a Tracker,
}

impl Activation<'_> {
    fn advance(&self, next: ActionState) {
        tracing::debug!(action = self.tracker.action, state = ?next, "action state");
        self.tracker.state.set(next);
    }
}

impl Drop for Activation<'_> {
    fn drop(&mut self) {
        self.tracker.state.set(ActionState::Idle);
    }
}

/// Result of a successful save activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveActivation {
    /// The interceptor took the package.
    Intercepted,
    /// The download sink ran.
    Saved(SaveOutcome),
}

/// Packages the current document and downloads it, or hands it to an interceptor.
pub struct SaveAction {
    packager: DocumentPackager,
    sink: Option<Box<dyn DownloadSink>>,
    interceptor: InterceptorSlot<SaveInterceptor>,
    tracker: Tracker,
}

impl SaveAction {
    /// `sink` is `None` when the environment offers no save mechanism; activating
    /// without an interceptor then fails with [`SinkError::NoSaveMechanism`].
    pub fn new(packager: DocumentPackager, sink: Option<Box<dyn DownloadSink>>) -> Self {
        Self {
            packager,
            sink,
            interceptor: InterceptorSlot::default(),
            tracker: Tracker::new("save"),
        }
    }

    /// Construct with the interceptor already in place.
    pub fn with_interceptor(
        packager: DocumentPackager,
        sink: Option<Box<dyn DownloadSink>>,
        interceptor: impl Fn(Package) -> anyhow::Result<()> + 'static,
    ) -> Self {
        let action = Self::new(packager, sink);
        // A fresh slot is always empty.
        let _ = action.interceptor.register(Box::new(interceptor));
        action
    }

    pub fn register_interceptor(
        &self,
        interceptor: impl Fn(Package) -> anyhow::Result<()> + 'static,
    ) -> Result<(), ActionError> {
        self.interceptor.register(Box::new(interceptor))
    }

    pub fn has_interceptor(&self) -> bool {
        self.interceptor.is_registered()
    }

    pub fn sink_name(&self) -> Option<&'static str> {
        self.sink.as_ref().map(|sink| sink.name())
    }

    pub fn state(&self) -> ActionState {
        self.tracker.state.get()
    }

    pub fn activate(&self, host: &dyn DocumentHost) -> Result<SaveActivation, ActionError> {
        let activation = self.tracker.begin();

        activation.advance(ActionState::Packaging);
        let package = self.packager.package(&host.content());

        if let Some(interceptor) = self.interceptor.get() {
            activation.advance(ActionState::Intercepted);
            interceptor(package).map_err(ActionError::Interceptor)?;
            tracing::info!("document handed to save interceptor");
            return Ok(SaveActivation::Intercepted);
        }

        let sink = self.sink.as_deref().ok_or(SinkError::NoSaveMechanism)?;
        let outcome = sink.save(&package)?;
        activation.advance(ActionState::Saved);
        match &outcome {
            SaveOutcome::Saved(path) => {
                tracing::info!(sink = sink.name(), "document saved to {}", path.display())
            }
            SaveOutcome::Cancelled => tracing::warn!(sink = sink.name(), "save cancelled"),
        }
        Ok(SaveActivation::Saved(outcome))
    }
}

impl fmt::Debug for SaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveAction")
            .field("packager", &self.packager)
            .field("sink", &self.sink_name())
            .field("interceptor", &self.interceptor)
            .field("state", &self.state())
            .finish()
    }
}

/// Result of a clear activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearActivation {
    Cleared,
    /// The interceptor refused; the document was left untouched.
    Aborted,
}

/// Clears the current document, optionally asking an interceptor first.
pub struct ClearAction {
    packager: DocumentPackager,
    interceptor: InterceptorSlot<ClearInterceptor>,
    tracker: Tracker,
}

impl ClearAction {
    pub fn new(packager: DocumentPackager) -> Self {
        Self {
            packager,
            interceptor: InterceptorSlot::default(),
            tracker: Tracker::new("clear"),
        }
    }

    pub fn with_interceptor(
        packager: DocumentPackager,
        interceptor: impl Fn(Package) -> anyhow::Result<bool> + 'static,
    ) -> Self {
        let action = Self::new(packager);
        let _ = action.interceptor.register(Box::new(interceptor));
        action
    }

    pub fn register_interceptor(
        &self,
        interceptor: impl Fn(Package) -> anyhow::Result<bool> + 'static,
    ) -> Result<(), ActionError> {
        self.interceptor.register(Box::new(interceptor))
    }

    pub fn has_interceptor(&self) -> bool {
        self.interceptor.is_registered()
    }

    pub fn state(&self) -> ActionState {
        self.tracker.state.get()
    }

    /// Clear `host`, unless a registered interceptor answers `false`.
    ///
    /// The content is only packaged when an interceptor is present.
    pub fn activate(&self, host: &mut dyn DocumentHost) -> Result<ClearActivation, ActionError> {
        let activation = self.tracker.begin();

        let confirmed = match self.interceptor.get() {
            Some(interceptor) => {
                activation.advance(ActionState::Packaging);
                let package = self.packager.package(&host.content());
                activation.advance(ActionState::Intercepted);
                interceptor(package).map_err(ActionError::Interceptor)?
            }
            None => true,
        };

        if !confirmed {
            activation.advance(ActionState::Aborted);
            tracing::info!("clear aborted by interceptor");
            return Ok(ClearActivation::Aborted);
        }

        host.set_content("");
        activation.advance(ActionState::Cleared);
        tracing::info!("document cleared");
        Ok(ClearActivation::Cleared)
    }
}

impl fmt::Debug for ClearAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClearAction")
            .field("packager", &self.packager)
            .field("interceptor", &self.interceptor)
            .field("state", &self.state())
            .finish()
    }
}
