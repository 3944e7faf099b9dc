use std::fmt;
use tokio::sync::broadcast;

/// A user-facing status message produced by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The configuration file was written
    Exported,
    /// The configuration was copied to the clipboard
    Copied,
    /// A configuration was imported
    Imported,
    /// A configuration was imported but still contains redaction placeholders
    PlaceholdersPending,
    /// Sensitive values have been in the document for a long time
    ClearSensitiveData,
    /// The clipboard was cleared after a sensitive copy
    ClipboardCleared,
}

impl Notice {
    /// Message to show the user.
    pub fn message(self) -> &'static str {
        match self {
            Notice::Exported => "Configuration exported successfully!",
            Notice::Copied => "Configuration copied to clipboard!",
            Notice::Imported => "Configuration imported successfully!",
            Notice::PlaceholdersPending => {
                "Configuration imported. Please fill in the placeholder values before using it."
            }
            Notice::ClearSensitiveData => {
                "This configuration has held sensitive values for a while. Consider clearing them when you are done."
            }
            Notice::ClipboardCleared => "Clipboard cleared of sensitive configuration.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Broadcasts notices to every subscribed view.
///
/// Sending with no subscribers is not an error; the notice is dropped.
#[derive(Debug, Clone)]
pub struct NoticeManager {
    sender: broadcast::Sender<Notice>,
}

impl NoticeManager {
    /// Create a manager buffering up to `capacity` notices per slow subscriber.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Get a new receiver for notices sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Send a notice to all subscribers.
    pub fn send(&self, notice: Notice) {
        if let Err(e) = self.sender.send(notice) {
            tracing::debug!(notice = ?e.0, "No subscribers for notice");
        }
    }
}
