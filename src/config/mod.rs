//! Configuration document module for the MCP config editor.
//!
//! This module holds the document model (`Config` and `ServerConfig`), the
//! validator, the functional mutators, the preset catalog and the redactor.
//! Nothing here performs I/O beyond `Config::from_file`.
//!
//! # Examples
//!
//! Building a document with mutators:
//!
//! ```
//! use mcp_config_editor::config::{mutators, validate_config, Config, Preset};
//!
//! let config = Config::default();
//! let config = mutators::load_preset(&config, Preset::Github);
//! let (config, name) = mutators::add_server(&config);
//! let config = mutators::set_command(&config, &name, "uvx").unwrap();
//! let config = mutators::add_arg(&config, &name).unwrap();
//! let config = mutators::update_arg(&config, &name, 0, "mcp-server-fetch").unwrap();
//!
//! assert!(validate_config(&config).is_empty());
//! assert_eq!(config.server_names(), ["github", "new-server-2"]);
//! ```
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use mcp_config_editor::config::Config;
//!
//! let config = Config::from_file("claude_desktop_config.json").unwrap();
//! println!("Loaded configuration with {} servers", config.len());
//! ```
pub mod mutators;
mod parser;
mod presets;
mod redactor;
pub mod validator;

pub use mutators::Edit;
pub use parser::{Config, EXPORT_FILE_NAME, Field, ServerConfig};
pub use presets::Preset;
pub use redactor::{contains_secrets, has_placeholders, is_placeholder, placeholder_for, redact};
pub use validator::{ValidationError, ensure_valid, validate_config};
