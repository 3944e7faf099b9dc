use crate::config::{Config, ServerConfig};
use crate::error::{Error, Result};

/// A single violated rule in the document.
///
/// The `Display` form is the message shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A server name is empty or only whitespace.
    #[error("Server name cannot be empty")]
    EmptyName,

    /// A server has no command, or its command is not a string.
    #[error("Server \"{0}\": Command is required")]
    MissingCommand(String),

    /// A server's `args` is not an array of strings.
    #[error("Server \"{0}\": Args must be an array")]
    ArgsNotArray(String),

    /// A server's `env` is not a flat string-to-string object.
    #[error("Server \"{0}\": Environment variables must be an object")]
    EnvNotObject(String),
}

/// Validates a single server entry, appending every violation found.
pub fn validate_server_config(name: &str, config: &ServerConfig, errors: &mut Vec<ValidationError>) {
    if name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    if config.command().is_empty() {
        errors.push(ValidationError::MissingCommand(name.to_string()));
    }

    if config.args.is_malformed() {
        errors.push(ValidationError::ArgsNotArray(name.to_string()));
    }

    if config.env.is_malformed() {
        errors.push(ValidationError::EnvNotObject(name.to_string()));
    }
}

/// Validates the whole document.
///
/// Every entry is checked and every applicable error is reported; an empty
/// result means the document may be exported.
///
/// # Examples
///
/// ```
/// use mcp_config_editor::config::{validate_config, Config, ServerConfig};
///
/// let mut config = Config::default();
/// assert!(validate_config(&config).is_empty());
///
/// config.mcp_servers.insert("x".to_string(), ServerConfig::default());
/// let errors = validate_config(&config);
/// assert_eq!(errors[0].to_string(), "Server \"x\": Command is required");
/// ```
pub fn validate_config(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, server) in &config.mcp_servers {
        validate_server_config(name, server, &mut errors);
    }

    errors
}

/// Fails with [`Error::ValidationFailed`] unless the document is valid.
pub fn ensure_valid(config: &Config) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::ValidationFailed(errors))
    }
}
