//! Session state kept beside the document.
//!
//! Nothing in this module is part of the exported configuration: which view
//! is active, which secret values the user has chosen to reveal, status
//! notices and the sensitive data reminder all live only as long as the
//! editing session.
mod notice;
mod reminder;

pub use notice::{Notice, NoticeManager};
pub use reminder::{SecretsReminder, has_env_entries};

use std::borrow::Cow;
use std::collections::HashSet;

/// Character used to mask hidden values.
const MASK_CHAR: char = '\u{2022}';

/// How the document is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Editable form
    #[default]
    Visual,
    /// Read-only JSON preview
    Json,
}

/// Presentation state owned by a front end.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    view: View,
    /// (server, env key) pairs whose values are shown in clear
    revealed: HashSet<(String, String)>,
}

impl SessionState {
    /// Create a session showing the visual view with every value hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active view.
    pub fn view(&self) -> View {
        self.view
    }

    /// Switch the active view.
    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Flips whether the value of `key` on `server` is shown, returning the new state.
    pub fn toggle_reveal(&mut self, server: &str, key: &str) -> bool {
        let entry = (server.to_string(), key.to_string());
        if self.revealed.remove(&entry) {
            false
        } else {
            self.revealed.insert(entry);
            true
        }
    }

    /// Returns `true` if the value of `key` on `server` is shown.
    pub fn is_revealed(&self, server: &str, key: &str) -> bool {
        self.revealed
            .contains(&(server.to_string(), key.to_string()))
    }

    /// The value as it should be displayed: in clear when revealed, masked otherwise.
    pub fn display_value<'a>(&self, server: &str, key: &str, value: &'a str) -> Cow<'a, str> {
        if self.is_revealed(server, key) {
            Cow::Borrowed(value)
        } else {
            Cow::Owned(std::iter::repeat_n(MASK_CHAR, value.chars().count()).collect())
        }
    }

    /// Hides every value again, e.g. after a new document is imported.
    pub fn hide_all(&mut self) {
        self.revealed.clear();
    }
}
