use async_trait::async_trait;
use mcp_config_editor::config::{Config, EXPORT_FILE_NAME, Edit, Preset, ValidationError, redact};
use mcp_config_editor::error::{Error, Result};
use mcp_config_editor::transfer::{Clipboard, DirectorySink, FileSink, MemoryClipboard, PathSource};
use mcp_config_editor::{ConfigEditor, EditorSettings, ExportGate, ExportOptions, Notice};
use mockall::mock;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

mock! {
    pub Sink {}

    #[async_trait]
    impl FileSink for Sink {
        async fn save(&self, file_name: &str, contents: &str) -> Result<()>;
    }
}

mock! {
    pub SystemClipboard {}

    #[async_trait]
    impl Clipboard for SystemClipboard {
        async fn write_text(&self, text: &str) -> Result<()>;
    }
}

const TOKEN_KEY: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";

// Editor holding the github preset with a filled-in token
fn editor_with_token() -> ConfigEditor {
    let mut editor = ConfigEditor::new();
    editor.load_preset(Preset::Github);
    editor
        .apply(Edit::UpdateEnvVar {
            server: "github".to_string(),
            old_key: TOKEN_KEY.to_string(),
            new_key: TOKEN_KEY.to_string(),
            value: "ghp_secret".to_string(),
        })
        .unwrap();
    editor
}

#[test]
fn test_new_editor_is_empty_and_valid() {
    let editor = ConfigEditor::new();
    assert!(editor.config().is_empty());
    assert!(editor.errors().is_empty());
    assert!(editor.is_valid());
    assert!(!editor.contains_secrets());
}

#[test]
fn test_edits_recompute_validation() -> Result<()> {
    let mut editor = ConfigEditor::new();
    let name = editor.add_server();

    assert_eq!(editor.errors(), [ValidationError::MissingCommand(name.clone())]);

    editor.apply(Edit::SetCommand {
        server: name,
        command: "uvx".to_string(),
    })?;
    assert!(editor.is_valid());
    Ok(())
}

#[test]
fn test_rejected_edit_keeps_document() {
    let mut editor = ConfigEditor::new();
    editor.load_preset(Preset::Filesystem);
    let before = editor.config().clone();

    let result = editor.apply(Edit::UpdateArg {
        server: "filesystem".to_string(),
        index: 99,
        value: "x".to_string(),
    });

    assert!(matches!(result, Err(Error::IndexOutOfRange { index: 99, len: 3, .. })));
    assert_eq!(editor.config(), &before);
}

#[test]
fn test_export_refused_while_invalid() {
    let mut editor = ConfigEditor::new();
    editor.add_server();

    match editor.request_export(ExportOptions::default()) {
        Err(Error::ValidationFailed(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert!(editor.pending_export().is_none());
}

#[tokio::test]
async fn test_export_without_secrets_writes_placeholders() -> Result<()> {
    let mut editor = editor_with_token();
    let mut notices = editor.subscribe();

    let gate = editor.request_export(ExportOptions::default())?;
    assert_eq!(gate, ExportGate::Ready);

    let mut sink = MockSink::new();
    sink.expect_save()
        .withf(|file_name, contents| {
            file_name == EXPORT_FILE_NAME
                && contents.contains("[ENTER_GITHUB_PERSONAL_ACCESS_TOKEN_HERE]")
                && !contents.contains("ghp_secret")
        })
        .times(1)
        .returning(|_, _| Ok(()));

    editor.confirm_export(&sink).await?;

    assert_eq!(notices.recv().await.unwrap(), Notice::Exported);
    assert!(editor.pending_export().is_none());
    Ok(())
}

#[tokio::test]
async fn test_export_with_secrets_requires_confirmation() -> Result<()> {
    let mut editor = editor_with_token();

    let gate = editor.request_export(ExportOptions::with_secrets())?;
    assert!(gate.requires_confirmation());

    let pending = editor.pending_export().unwrap();
    assert!(pending.includes_secrets());
    assert!(pending.contents().contains("ghp_secret"));
    assert_eq!(pending.file_name(), "claude_desktop_config.json");

    // The user declines.
    assert!(editor.cancel_export());
    let sink = MockSink::new();
    assert!(matches!(editor.confirm_export(&sink).await, Err(Error::NoPendingExport)));
    Ok(())
}

#[test]
fn test_including_secrets_without_any_needs_no_confirmation() -> Result<()> {
    let mut editor = ConfigEditor::new();
    editor.load_preset(Preset::Filesystem);
    assert_eq!(editor.request_export(ExportOptions::with_secrets())?, ExportGate::Ready);
    Ok(())
}

#[test]
fn test_edit_discards_staged_export() -> Result<()> {
    let mut editor = editor_with_token();
    editor.request_export(ExportOptions::with_secrets())?;

    editor.apply(Edit::RemoveEnvVar {
        server: "github".to_string(),
        key: TOKEN_KEY.to_string(),
    })?;

    assert!(editor.pending_export().is_none());
    assert!(!editor.contains_secrets());
    Ok(())
}

#[tokio::test]
async fn test_failed_write_keeps_export_staged() -> Result<()> {
    let mut editor = editor_with_token();
    editor.request_export(ExportOptions::default())?;

    let mut sink = MockSink::new();
    sink.expect_save()
        .times(1)
        .returning(|_, _| Err(Error::Io(std::io::Error::other("disk full"))));

    assert!(matches!(editor.confirm_export(&sink).await, Err(Error::Io(_))));
    assert!(editor.pending_export().is_some());
    Ok(())
}

#[tokio::test]
async fn test_export_to_directory() -> Result<()> {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut editor = editor_with_token();

    editor.request_export(ExportOptions::with_secrets())?;
    editor.confirm_export(&DirectorySink::new(temp.path())).await?;

    let written = std::fs::read_to_string(temp.path().join(EXPORT_FILE_NAME))?;
    assert_eq!(written, editor.config().to_pretty_json()?);
    assert_eq!(&Config::parse_from_str(&written)?, editor.config());
    Ok(())
}

#[test]
fn test_import_malformed_json_keeps_document() {
    let mut editor = editor_with_token();
    let before = editor.config().clone();

    let result = editor.import_str("{\"mcpServers\": {");

    assert!(matches!(result, Err(Error::ConfigParse(_))));
    assert_eq!(editor.config(), &before);
}

#[test]
fn test_import_replaces_whole_document() -> Result<()> {
    let mut editor = editor_with_token();
    editor.session_mut().toggle_reveal("github", TOKEN_KEY);

    let notice = editor.import_str(r#"{"mcpServers": {"fetch": {"command": "uvx", "args": ["mcp-server-fetch"]}}}"#)?;

    assert_eq!(notice, Notice::Imported);
    assert_eq!(editor.config().server_names(), ["fetch"]);
    assert!(editor.is_valid());
    assert!(!editor.session().is_revealed("github", TOKEN_KEY));
    Ok(())
}

#[test]
fn test_import_with_placeholders_asks_for_values() -> Result<()> {
    let redacted = redact(editor_with_token().config()).to_pretty_json()?;

    let mut editor = ConfigEditor::new();
    assert_eq!(editor.import_str(&redacted)?, Notice::PlaceholdersPending);
    Ok(())
}

#[test]
fn test_import_keeps_invalid_entries_for_review() -> Result<()> {
    let mut editor = ConfigEditor::new();
    editor.import_str(r#"{"mcpServers": {"broken": {"args": "oops"}}}"#)?;

    let messages: Vec<String> = editor.errors().iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "Server \"broken\": Command is required",
            "Server \"broken\": Args must be an array",
        ]
    );
    Ok(())
}

#[test]
fn test_import_loads_null_command_and_null_entry() -> Result<()> {
    let mut editor = ConfigEditor::new();
    editor.import_str(r#"{"mcpServers": {"x": {"command": null, "args": []}, "z": null}}"#)?;

    assert_eq!(editor.config().server_names(), ["x", "z"]);
    assert_eq!(
        editor.errors(),
        [
            ValidationError::MissingCommand("x".to_string()),
            ValidationError::MissingCommand("z".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_zero_notice_capacity_is_accepted() {
    let editor = ConfigEditor::with_settings(EditorSettings {
        notice_capacity: 0,
        ..EditorSettings::default()
    });
    assert!(editor.is_valid());
}

#[tokio::test]
async fn test_import_from_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"mcpServers": {{"fetch": {{"command": "uvx"}}}}}}"#).unwrap();

    let mut editor = ConfigEditor::new();
    let notice = editor.import_from(&PathSource::new(file.path())).await?;

    assert_eq!(notice, Notice::Imported);
    assert_eq!(editor.config().server("fetch").unwrap().command(), "uvx");

    let missing = editor
        .import_from(&PathSource::new(file.path().with_extension("missing")))
        .await;
    assert!(matches!(missing, Err(Error::Io(_))));
    assert_eq!(editor.config().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_copy_refused_while_invalid() {
    let mut editor = ConfigEditor::new();
    editor.add_server();
    let clipboard = MemoryClipboard::new();

    let result = editor
        .copy_to_clipboard(Arc::new(clipboard.clone()), ExportOptions::default())
        .await;

    assert!(matches!(result, Err(Error::ValidationFailed(_))));
    assert_eq!(clipboard.contents().unwrap(), None);
}

#[tokio::test]
async fn test_copy_without_secrets() -> Result<()> {
    let mut editor = editor_with_token();
    let clipboard = MemoryClipboard::new();

    editor
        .copy_to_clipboard(Arc::new(clipboard.clone()), ExportOptions::default())
        .await?;

    let copied = clipboard.contents()?.unwrap();
    assert_eq!(copied, redact(editor.config()).to_pretty_json()?);
    assert!(!editor.clipboard_clear_pending());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_copy_with_secrets_clears_clipboard_later() -> Result<()> {
    let mut editor = editor_with_token();
    let mut notices = editor.subscribe();
    let clipboard = MemoryClipboard::new();

    editor
        .copy_to_clipboard(Arc::new(clipboard.clone()), ExportOptions::with_secrets())
        .await?;

    assert_eq!(notices.recv().await.unwrap(), Notice::Copied);
    assert!(clipboard.contents()?.unwrap().contains("ghp_secret"));
    assert!(editor.clipboard_clear_pending());

    // Nothing happens before two minutes have passed.
    assert!(timeout(Duration::from_secs(110), notices.recv()).await.is_err());
    assert!(clipboard.contents()?.unwrap().contains("ghp_secret"));

    assert_eq!(notices.recv().await.unwrap(), Notice::ClipboardCleared);
    assert_eq!(clipboard.contents()?, Some(String::new()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refused_clipboard_clear_is_ignored() -> Result<()> {
    let mut editor = editor_with_token();
    let mut notices = editor.subscribe();

    let mut clipboard = MockSystemClipboard::new();
    clipboard
        .expect_write_text()
        .withf(|text| !text.is_empty())
        .times(1)
        .returning(|_| Ok(()));
    clipboard
        .expect_write_text()
        .withf(|text| text.is_empty())
        .times(1)
        .returning(|_| Err(Error::Clipboard("write denied".to_string())));

    editor
        .copy_to_clipboard(Arc::new(clipboard), ExportOptions::with_secrets())
        .await?;
    assert_eq!(notices.recv().await.unwrap(), Notice::Copied);

    // The clear runs and fails quietly: no notice follows.
    assert!(timeout(Duration::from_secs(5 * 60), notices.recv()).await.is_err());
    assert!(!editor.clipboard_clear_pending());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sensitive_data_reminder() -> Result<()> {
    let mut editor = ConfigEditor::with_settings(EditorSettings::default());
    let mut notices = editor.subscribe();

    editor.load_preset(Preset::Brave);

    assert!(timeout(Duration::from_secs(29 * 60), notices.recv()).await.is_err());
    assert_eq!(notices.recv().await.unwrap(), Notice::ClearSensitiveData);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_reminder_cancelled_when_environment_emptied() -> Result<()> {
    let mut editor = ConfigEditor::new();
    let mut notices = editor.subscribe();

    editor.load_preset(Preset::Brave);
    editor.apply(Edit::RemoveEnvVar {
        server: "brave".to_string(),
        key: "BRAVE_API_KEY".to_string(),
    })?;

    assert!(timeout(Duration::from_secs(60 * 60), notices.recv()).await.is_err());
    Ok(())
}

#[test]
fn test_preview_json_masks_secrets_unless_included() -> Result<()> {
    let editor = editor_with_token();

    let masked = editor.preview_json(ExportOptions::default())?;
    assert!(masked.contains("[ENTER_GITHUB_PERSONAL_ACCESS_TOKEN_HERE]"));

    let full = editor.preview_json(ExportOptions::with_secrets())?;
    assert!(full.contains("ghp_secret"));
    Ok(())
}

#[test]
fn test_preview_available_while_invalid() -> Result<()> {
    let mut editor = ConfigEditor::new();
    editor.add_server();
    assert!(editor.preview_json(ExportOptions::default())?.contains("new-server-1"));
    Ok(())
}
