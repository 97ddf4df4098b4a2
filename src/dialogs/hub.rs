use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::{Button, Continuation, Dialog, DialogError};
use crate::main_loop::MainHandle;

/// UI-side hook that displays dialogs.
///
/// Implementations must eventually call [`Dialog::resolve`] (or
/// [`Dialog::dismiss`] when the user closes the window) exactly once for
/// every dialog they receive, including kinds they do not know how to draw.
pub trait PresentationSink: Send + Sync {
    fn present(&self, dialog: Dialog);
}

impl<F> PresentationSink for F
where
    F: Fn(Dialog) + Send + Sync,
{
    fn present(&self, dialog: Dialog) {
        self(dialog);
    }
}

/// Connects code asking questions with the frontend answering them.
///
/// Holds the single installed presentation sink and the main context that
/// continuations are scheduled on. Share it behind an [`Arc`].
pub struct DialogHub {
    sink: RwLock<Option<Arc<dyn PresentationSink>>>,
    main: MainHandle,
}

impl DialogHub {
    pub fn new(main: MainHandle) -> Self {
        Self {
            sink: RwLock::new(None),
            main,
        }
    }

    /// Install the frontend hook, replacing any previous one.
    pub fn install_sink(&self, sink: impl PresentationSink + 'static) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(sink));
    }

    pub fn remove_sink(&self) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_sink(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Hand `dialog` to the frontend.
    ///
    /// `continuation` runs on the main context after the dialog is resolved.
    /// With no sink installed the dialog is dismissed straight away so that
    /// nobody waits on it forever.
    pub fn submit(
        &self,
        dialog: &Dialog,
        continuation: Option<Continuation>,
    ) -> Result<(), DialogError> {
        dialog.mark_submitted(continuation, self.main.clone())?;

        // Clone out of the lock so the sink may resolve synchronously.
        let sink = self
            .sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(sink) = sink {
            info!(dialog = %dialog, "Presenting dialog");
            sink.present(dialog.clone());
            Ok(())
        } else {
            warn!(dialog = %dialog, "No presentation sink installed, dismissing dialog");
            dialog.dismiss()
        }
    }

    /// Submit with a continuation closure.
    pub fn submit_with(
        &self,
        dialog: &Dialog,
        continuation: impl FnOnce(Dialog) + Send + 'static,
    ) -> Result<(), DialogError> {
        self.submit(dialog, Some(Box::new(continuation)))
    }

    /// Submit and block the current thread until the user answers.
    ///
    /// Meant for worker threads; calling it from the main context deadlocks
    /// frontends that answer on that context.
    pub fn await_response(&self, dialog: &Dialog) -> Result<Option<Button>, DialogError> {
        self.submit(dialog, None)?;
        Ok(dialog.wait())
    }

    /// Async counterpart of [`DialogHub::await_response`].
    pub async fn response(&self, dialog: &Dialog) -> Result<Option<Button>, DialogError> {
        self.submit(dialog, None)?;
        Ok(dialog.wait_async().await)
    }
}
