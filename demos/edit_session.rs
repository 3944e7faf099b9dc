use mcp_config_editor::config::{Edit, Preset};
use mcp_config_editor::error::Result;
use mcp_config_editor::transfer::{DirectorySink, MemoryClipboard};
use mcp_config_editor::{ConfigEditor, ExportGate, ExportOptions, View};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    // `with_env_filter` reads the RUST_LOG environment variable to set the log level.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    tracing::info!("Starting edit_session demo");

    let mut editor = ConfigEditor::new();
    let mut notices = editor.subscribe();

    // Build a document from a preset and a hand-made entry
    editor.load_preset(Preset::Github);
    let name = editor.add_server();
    println!("Added {} -> errors: {:?}", name, editor.errors());

    editor.apply(Edit::RenameServer {
        from: name,
        to: "fetch".to_string(),
    })?;
    editor.apply(Edit::SetCommand {
        server: "fetch".to_string(),
        command: "uvx".to_string(),
    })?;
    editor.apply(Edit::AddArg {
        server: "fetch".to_string(),
    })?;
    editor.apply(Edit::UpdateArg {
        server: "fetch".to_string(),
        index: 0,
        value: "mcp-server-fetch".to_string(),
    })?;
    editor.apply(Edit::UpdateEnvVar {
        server: "github".to_string(),
        old_key: "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
        new_key: "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
        value: "ghp_demo_token".to_string(),
    })?;

    // Hidden until revealed
    let token = "ghp_demo_token";
    println!(
        "Token field shows: {}",
        editor
            .session()
            .display_value("github", "GITHUB_PERSONAL_ACCESS_TOKEN", token)
    );

    editor.session_mut().set_view(View::Json);
    println!("\n=== JSON preview (redacted) ===");
    println!("{}", editor.preview_json(ExportOptions::default())?);

    // Export to the current directory, with secrets, which asks for confirmation
    let gate = editor.request_export(ExportOptions::with_secrets())?;
    if gate == ExportGate::ConfirmationRequired {
        println!("\nExport contains secrets; confirming for the demo");
    }
    editor.confirm_export(&DirectorySink::new(".")).await?;

    // Copy without secrets
    let clipboard = MemoryClipboard::new();
    editor
        .copy_to_clipboard(Arc::new(clipboard.clone()), ExportOptions::default())
        .await?;

    while let Ok(notice) = notices.try_recv() {
        println!("Notice: {}", notice);
    }

    // Malformed input leaves the document alone
    if let Err(e) = editor.import_str("{ not json") {
        println!("Import failed as expected: {}", e);
    }
    println!("Still {} servers", editor.config().len());

    tracing::info!("edit_session demo finished");
    Ok(())
}
