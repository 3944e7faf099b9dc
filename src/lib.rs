/*!
 # MCP Config Editor

 A Rust library for building editors of Claude desktop MCP server configurations.

 ## Overview

 MCP Config Editor provides functionality to:
 - Add, rename and remove MCP server entries and edit their command, arguments and environment
 - Insert built-in server presets
 - Validate the document and report every problem at once
 - Import and export `claude_desktop_config.json`
 - Copy the configuration to the clipboard
 - Replace secret environment values with placeholders on export

 ## Basic Usage

 ```no_run
 use mcp_config_editor::config::{Edit, Preset};
 use mcp_config_editor::transfer::DirectorySink;
 use mcp_config_editor::{ConfigEditor, ExportGate, ExportOptions, Result};

 #[tokio::main]
 async fn main() -> Result<()> {
     let mut editor = ConfigEditor::new();

     // Start from a preset and fill in its token
     editor.load_preset(Preset::Github);
     editor.apply(Edit::UpdateEnvVar {
         server: "github".to_string(),
         old_key: "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
         new_key: "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
         value: "ghp_example".to_string(),
     })?;

     // Export with secrets replaced by placeholders
     let gate = editor.request_export(ExportOptions::default())?;
     assert_eq!(gate, ExportGate::Ready);
     editor.confirm_export(&DirectorySink::new(".")).await?;

     Ok(())
 }
 ```

 ## Features

 - **Functional edits**: every mutator returns a new document and never touches the old one
 - **Validation**: all problems are collected; export and copy are refused until there are none
 - **Redaction**: optional placeholder substitution of environment values on export and copy
 - **Session hints**: export confirmation for secrets, best-effort clipboard clearing and a
   reminder to clear sensitive data, none of which are security guarantees

 ## License

 This project is licensed under the terms in the LICENSE file.
*/

pub mod config;
pub mod error;
pub mod session;
pub mod transfer;

pub use config::{Config, Edit, Preset, ServerConfig, ValidationError};
pub use error::{Error, Result};
pub use session::{Notice, SessionState, View};

use config::{EXPORT_FILE_NAME, mutators};
use session::{NoticeManager, SecretsReminder, has_env_entries};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use transfer::{Clipboard, ClipboardClearer, FileSink, FileSource};

/// Timing and buffering settings of an editing session.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    /// How long environment values may sit in the document before the user
    /// is reminded to clear them
    pub secrets_reminder_after: Duration,
    /// Delay before the clipboard is cleared after a copy that included secrets
    pub clipboard_clear_after: Duration,
    /// Number of notices buffered for a slow subscriber
    pub notice_capacity: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            secrets_reminder_after: Duration::from_secs(30 * 60),
            clipboard_clear_after: Duration::from_secs(2 * 60),
            notice_capacity: 16,
        }
    }
}

/// Export and copy preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    /// Write environment values as they are instead of placeholders
    pub include_secrets: bool,
}

impl ExportOptions {
    /// Options that keep environment values.
    pub fn with_secrets() -> Self {
        Self { include_secrets: true }
    }
}

/// Outcome of [`ConfigEditor::request_export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportGate {
    /// The export can be confirmed straight away
    Ready,
    /// The export contains secrets; ask the user before confirming
    ConfirmationRequired,
}

impl ExportGate {
    /// Returns `true` if the user must confirm before the file is written.
    pub fn requires_confirmation(self) -> bool {
        self == ExportGate::ConfirmationRequired
    }
}

/// An export that has passed validation and waits for confirmation.
#[derive(Debug, Clone)]
pub struct PendingExport {
    contents: String,
    includes_secrets: bool,
}

impl PendingExport {
    /// The file name the export will be written as.
    pub fn file_name(&self) -> &'static str {
        EXPORT_FILE_NAME
    }

    /// The JSON text that will be written.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Returns `true` if the text contains unredacted environment values.
    pub fn includes_secrets(&self) -> bool {
        self.includes_secrets
    }
}

/// An editing session over one configuration document.
///
/// The editor owns the document and everything derived from it. Every change
/// goes through a mutator, after which the validation errors are recomputed,
/// a staged export is discarded and the sensitive data reminder is
/// re-evaluated. Failed edits leave the document as it was.
/// All public methods are instrumented with `tracing` spans; secret values
/// are never recorded.
pub struct ConfigEditor {
    /// Current document
    config: Config,
    /// Validation errors of `config`
    errors: Vec<ValidationError>,
    /// Timing settings
    settings: EditorSettings,
    /// Presentation state
    session: SessionState,
    /// Notice broadcaster
    notices: NoticeManager,
    /// Export waiting for confirmation
    pending_export: Option<PendingExport>,
    /// Sensitive data reminder
    reminder: SecretsReminder,
    /// Pending clipboard clear
    clipboard_clearer: ClipboardClearer,
}

impl ConfigEditor {
    /// Create an editor with an empty document and default settings.
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    /// Create an editor with an empty document.
    #[tracing::instrument(skip(settings))]
    pub fn with_settings(settings: EditorSettings) -> Self {
        tracing::debug!("Creating new ConfigEditor");
        Self {
            config: Config::default(),
            errors: Vec::new(),
            notices: NoticeManager::new(settings.notice_capacity),
            reminder: SecretsReminder::new(settings.secrets_reminder_after),
            settings,
            session: SessionState::new(),
            pending_export: None,
            clipboard_clearer: ClipboardClearer::new(),
        }
    }

    /// The current document.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validation errors of the current document.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns `true` if the document can be exported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if any environment variable has a non-blank value.
    pub fn contains_secrets(&self) -> bool {
        config::contains_secrets(&self.config)
    }

    /// The session settings.
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Presentation state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Mutable presentation state.
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Subscribe to status notices.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// The export staged by [`request_export`](Self::request_export), if any.
    pub fn pending_export(&self) -> Option<&PendingExport> {
        self.pending_export.as_ref()
    }

    /// Installs a new document and refreshes everything derived from it.
    fn replace(&mut self, config: Config) {
        self.config = config;
        self.errors = config::validate_config(&self.config);

        if self.pending_export.take().is_some() {
            tracing::debug!("Document changed, discarding staged export");
        }

        self.reminder
            .observe(has_env_entries(&self.config), &self.notices);
        tracing::debug!(
            servers = self.config.len(),
            errors = self.errors.len(),
            "Document updated"
        );
    }

    /// Applies an edit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServerNotFound`] or [`Error::IndexOutOfRange`] when the
    /// edit refers to something that does not exist; the document is unchanged.
    #[tracing::instrument(skip(self, edit), fields(edit = edit.kind()))]
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        let next = edit.apply(&self.config).map_err(|e| {
            tracing::warn!(error = %e, "Edit rejected");
            e
        })?;
        self.replace(next);
        Ok(())
    }

    /// Adds an empty server entry and returns its generated name.
    #[tracing::instrument(skip(self))]
    pub fn add_server(&mut self) -> String {
        let (next, name) = mutators::add_server(&self.config);
        tracing::debug!(server = %name, "Added server");
        self.replace(next);
        name
    }

    /// Inserts a preset under its own id.
    #[tracing::instrument(skip(self), fields(preset = %preset))]
    pub fn load_preset(&mut self, preset: Preset) {
        let next = mutators::load_preset(&self.config, preset);
        self.replace(next);
    }

    /// Renders the document for the JSON view.
    ///
    /// Unlike export, the preview is available while the document is invalid.
    pub fn preview_json(&self, options: ExportOptions) -> Result<String> {
        if options.include_secrets {
            self.config.to_pretty_json()
        } else {
            config::redact(&self.config).to_pretty_json()
        }
    }

    /// Produces the export text after checking validation.
    fn export_text(&self, options: ExportOptions) -> Result<(String, bool)> {
        if !self.errors.is_empty() {
            tracing::warn!(errors = self.errors.len(), "Refusing to export an invalid configuration");
            return Err(Error::ValidationFailed(self.errors.clone()));
        }

        let includes_secrets = options.include_secrets && self.contains_secrets();
        Ok((self.preview_json(options)?, includes_secrets))
    }

    /// Stages an export and reports whether the user has to confirm it.
    ///
    /// Confirmation is required when the export would contain secret values.
    /// The staged text is dropped by any later edit or import.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationFailed`] if the document is invalid.
    #[tracing::instrument(skip(self), fields(include_secrets = options.include_secrets))]
    pub fn request_export(&mut self, options: ExportOptions) -> Result<ExportGate> {
        let (contents, includes_secrets) = self.export_text(options)?;
        self.pending_export = Some(PendingExport {
            contents,
            includes_secrets,
        });

        let gate = if includes_secrets {
            ExportGate::ConfirmationRequired
        } else {
            ExportGate::Ready
        };
        tracing::debug!(?gate, "Export staged");
        Ok(gate)
    }

    /// Writes the staged export to `sink`.
    ///
    /// If the write fails the export stays staged so it can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingExport`] if nothing is staged, or the sink's error.
    #[tracing::instrument(skip(self, sink))]
    pub async fn confirm_export(&mut self, sink: &dyn FileSink) -> Result<()> {
        let pending = self.pending_export.take().ok_or(Error::NoPendingExport)?;

        if let Err(e) = sink.save(pending.file_name(), pending.contents()).await {
            tracing::error!(error = %e, "Failed to write exported configuration");
            self.pending_export = Some(pending);
            return Err(e);
        }

        tracing::info!(
            file = EXPORT_FILE_NAME,
            includes_secrets = pending.includes_secrets,
            "Configuration exported"
        );
        self.notices.send(Notice::Exported);
        Ok(())
    }

    /// Drops the staged export, returning `true` if there was one.
    pub fn cancel_export(&mut self) -> bool {
        let cancelled = self.pending_export.take().is_some();
        if cancelled {
            tracing::debug!("Export cancelled");
        }
        cancelled
    }

    /// Replaces the document with one parsed from JSON text.
    ///
    /// Returns [`Notice::PlaceholdersPending`] when the imported file still has
    /// redaction placeholders, [`Notice::Imported`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if the text cannot be parsed; the current
    /// document is kept.
    #[tracing::instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn import_str(&mut self, text: &str) -> Result<Notice> {
        let config = Config::parse_from_str(text).map_err(|e| {
            tracing::warn!(error = %e, "Import rejected, keeping current configuration");
            e
        })?;

        let notice = if config::has_placeholders(&config) {
            Notice::PlaceholdersPending
        } else {
            Notice::Imported
        };

        self.session.hide_all();
        self.replace(config);
        tracing::info!(servers = self.config.len(), "Configuration imported");
        self.notices.send(notice);
        Ok(notice)
    }

    /// Reads a file from `source` and imports it.
    #[tracing::instrument(skip(self, source))]
    pub async fn import_from(&mut self, source: &dyn FileSource) -> Result<Notice> {
        let text = source.read_to_string().await?;
        self.import_str(&text)
    }

    /// Copies the configuration to the clipboard.
    ///
    /// When the copied text includes secret values a clear of the clipboard is
    /// scheduled after [`EditorSettings::clipboard_clear_after`]. The clear is
    /// best effort; a refused write is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationFailed`] if the document is invalid, or the
    /// clipboard's error.
    #[tracing::instrument(skip(self, clipboard), fields(include_secrets = options.include_secrets))]
    pub async fn copy_to_clipboard(
        &mut self,
        clipboard: Arc<dyn Clipboard>,
        options: ExportOptions,
    ) -> Result<()> {
        let (text, includes_secrets) = self.export_text(options)?;

        clipboard.write_text(&text).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to write to clipboard");
            e
        })?;

        if includes_secrets {
            self.clipboard_clearer.schedule(
                clipboard,
                self.settings.clipboard_clear_after,
                self.notices.clone(),
            );
        } else {
            self.clipboard_clearer.cancel();
        }

        tracing::info!(includes_secrets, "Configuration copied to clipboard");
        self.notices.send(Notice::Copied);
        Ok(())
    }

    /// Returns `true` while a clipboard clear is scheduled.
    pub fn clipboard_clear_pending(&self) -> bool {
        self.clipboard_clearer.is_pending()
    }
}

impl Default for ConfigEditor {
    fn default() -> Self {
        Self::new()
    }
}
