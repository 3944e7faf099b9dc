//! Clipboard collaborator and the delayed clear that follows a sensitive copy.
//!
//! Clearing the clipboard is a courtesy, not a guarantee: the platform may
//! refuse a write that is not tied to a user gesture, another application may
//! already have read the text, and the user may have copied something else
//! since. Failures are logged and otherwise ignored.

use crate::error::{Error, Result};
use crate::session::{Notice, NoticeManager};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// System clipboard access.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replaces the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// A clipboard held in process memory.
///
/// Useful for front ends that manage the real clipboard themselves and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, if anything has been written.
    pub fn contents(&self) -> Result<Option<String>> {
        let contents = self
            .contents
            .lock()
            .map_err(|_| Error::Clipboard("Failed to lock clipboard".to_string()))?;
        Ok(contents.clone())
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| Error::Clipboard("Failed to lock clipboard".to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

/// Owns the pending "clear the clipboard" task after a copy that included secrets.
#[derive(Debug, Default)]
pub struct ClipboardClearer {
    task: Option<JoinHandle<()>>,
}

impl ClipboardClearer {
    /// Create a clearer with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an empty write to `clipboard` after `after`, replacing any
    /// clear already scheduled.
    ///
    /// Needs a tokio runtime; without one nothing is scheduled.
    pub fn schedule(&mut self, clipboard: Arc<dyn Clipboard>, after: Duration, notices: NoticeManager) {
        self.cancel();

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("No tokio runtime, clipboard will not be cleared automatically");
                return;
            }
        };

        tracing::debug!(delay_secs = after.as_secs(), "Scheduling clipboard clear");
        self.task = Some(handle.spawn(async move {
            tokio::time::sleep(after).await;
            match clipboard.write_text("").await {
                Ok(()) => {
                    tracing::debug!("Clipboard cleared");
                    notices.send(Notice::ClipboardCleared);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Clipboard clear was refused");
                }
            }
        }));
    }

    /// Returns `true` while a clear is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels a scheduled clear, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ClipboardClearer {
    fn drop(&mut self) {
        self.cancel();
    }
}
