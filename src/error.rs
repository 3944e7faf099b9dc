/// Error handling module for the MCP config editor.
///
/// This module defines the error types used throughout the library.
/// Validation problems are not raised while editing; they are collected by
/// the validator and only become an [`Error::ValidationFailed`] when an
/// export or copy is gated on them.
///
/// # Example
///
/// ```
/// use mcp_config_editor::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Operation succeeded"),
///         Err(Error::ServerNotFound(name)) => println!("Server '{}' is not in the document", name),
///         Err(Error::ValidationFailed(errors)) => println!("{} validation errors", errors.len()),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use crate::config::ValidationError;
use thiserror::Error;

/// Errors that can occur in the mcp-config-editor library.
///
/// Every failing operation leaves the document exactly as it was, so all of
/// these are recoverable. `ServerNotFound` and `IndexOutOfRange` come from a
/// caller holding a stale reference to the document and point at a bug in
/// the caller rather than something to show the user.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse a configuration from a file or string.
    ///
    /// This error occurs when:
    /// - The text is not valid JSON
    /// - A server entry is not an object or its command is not a string
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The named server does not exist in the document.
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// An argument index is outside the server's argument list.
    #[error("Argument index {index} out of range for server '{server}' ({len} arguments)")]
    IndexOutOfRange {
        /// Server whose arguments were addressed
        server: String,
        /// Requested index
        index: usize,
        /// Number of arguments the server actually has
        len: usize,
    },

    /// A preset id that is not part of the built-in catalog.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// The document has validation errors, so it cannot be exported or copied.
    #[error("Configuration has {} validation error(s)", .0.len())]
    ValidationFailed(Vec<ValidationError>),

    /// `confirm_export` was called without a staged export.
    #[error("No export is waiting for confirmation")]
    NoPendingExport,

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The clipboard rejected a write.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Error in serializing the document.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for mcp-config-editor operations.
///
/// This is a convenience type alias for `std::result::Result` with the `Error` type
/// from this module.
pub type Result<T> = std::result::Result<T, Error>;
