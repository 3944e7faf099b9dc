use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// File name used when the configuration is exported.
pub const EXPORT_FILE_NAME: &str = "claude_desktop_config.json";

/// A field whose JSON shape is checked by the validator rather than the parser.
///
/// Imported files are not trusted to have the right types. A value of the
/// expected shape lands in `Valid`; anything else is kept verbatim in
/// `Malformed` so it can be reported and exported unchanged instead of being
/// coerced or rejected at import time.
///
/// # Examples
///
/// ```
/// use mcp_config_editor::config::{Field, ServerConfig};
///
/// let server: ServerConfig = serde_json::from_str(r#"{"command": "npx", "args": "-y"}"#).unwrap();
/// assert!(server.args.is_malformed());
///
/// let server: ServerConfig = serde_json::from_str(r#"{"command": "npx", "args": ["-y"]}"#).unwrap();
/// assert_eq!(server.args, Field::Valid(vec!["-y".to_string()]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field<T> {
    /// The value has the expected shape.
    Valid(T),
    /// The value had some other JSON shape.
    Malformed(Value),
}

impl<T> Field<T> {
    /// Returns the typed value, or `None` when the field is malformed.
    pub fn valid(&self) -> Option<&T> {
        match self {
            Field::Valid(value) => Some(value),
            Field::Malformed(_) => None,
        }
    }

    /// Returns `true` if the field did not have the expected shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Field::Malformed(_))
    }
}

/// Reads a [`Field`], treating an explicit JSON `null` like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<Field<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<Field<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads the server map, loading a `null` or non-object entry as an empty entry.
fn lenient_servers<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, ServerConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(name, value)| -> std::result::Result<_, D::Error> {
            let server = if value.is_object() {
                ServerConfig::deserialize(value).map_err(D::Error::custom)?
            } else {
                tracing::warn!(server = %name, "Server entry is not an object; loading it as an empty entry");
                ServerConfig::default()
            };
            Ok((name, server))
        })
        .collect()
}

impl<T: Default> Default for Field<T> {
    fn default() -> Self {
        Field::Valid(T::default())
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Valid(value)
    }
}

/// Configuration for a single MCP server entry.
///
/// An entry describes how a client launches an MCP server: the command to
/// execute, its positional arguments, and the environment variables to set.
/// Keys the editor does not model (`cwd`, `disabled`, ...) are kept in
/// `extra` and written back on export.
///
/// # Examples
///
/// ```
/// use mcp_config_editor::config::ServerConfig;
///
/// let server = ServerConfig::new("uvx", ["mcp-server-fetch"]);
/// assert_eq!(server.command(), "uvx");
/// assert_eq!(server.arg_list(), ["mcp-server-fetch"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Command to execute when starting the MCP server.
    /// Empty or non-string only while the user is still editing; the validator flags it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub command: Field<String>,

    /// Command-line arguments, in order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Field<Vec<String>>,

    /// Environment variables to set when launching the server.
    /// Values may be secrets.
    #[serde(default, deserialize_with = "null_as_default")]
    pub env: Field<IndexMap<String, String>>,

    /// Entry keys not modeled by the editor.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ServerConfig {
    /// Creates an entry with the given command and arguments and no environment.
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: Field::Valid(command.into()),
            args: Field::Valid(args.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Adds an environment variable, builder style.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut env = self.env.valid().cloned().unwrap_or_default();
        env.insert(key.into(), value.into());
        self.env = Field::Valid(env);
        self
    }

    /// The command, or an empty string when `command` is not a string.
    pub fn command(&self) -> &str {
        self.command.valid().map(String::as_str).unwrap_or("")
    }

    /// The argument list, or an empty slice when `args` is malformed.
    pub fn arg_list(&self) -> &[String] {
        self.args.valid().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The environment variables, or `None` when `env` is malformed.
    pub fn env_vars(&self) -> Option<&IndexMap<String, String>> {
        self.env.valid()
    }
}

/// The configuration document edited by this crate.
///
/// Servers are kept in insertion order so the exported JSON lists them the
/// way the user arranged them. Top-level keys other than `mcpServers` are
/// carried through from import to export untouched.
///
/// # JSON Schema
///
/// ```json
/// {
///   "mcpServers": {
///     "github": {
///       "command": "npx",
///       "args": ["-y", "@modelcontextprotocol/server-github"],
///       "env": {
///         "GITHUB_PERSONAL_ACCESS_TOKEN": ""
///       }
///     }
///   }
/// }
/// ```
///
/// # Examples
///
/// ```
/// use mcp_config_editor::config::Config;
///
/// let config = Config::parse_from_str(r#"{"mcpServers": {"fetch": {"command": "uvx"}}}"#).unwrap();
/// if let Some(server) = config.server("fetch") {
///     println!("Command: {}", server.command());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Map of server names to their configurations, in insertion order.
    #[serde(rename = "mcpServers", default, deserialize_with = "lenient_servers")]
    pub mcp_servers: IndexMap<String, ServerConfig>,

    /// Top-level keys not modeled by the editor.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be read
    /// * The file contents are not valid JSON
    /// * The JSON is not an object of server entries
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        Self::parse_from_str(&content)
    }

    /// Parses a configuration from a JSON string.
    ///
    /// Only the JSON syntax and the overall object shape are enforced here;
    /// field types inside each server entry are left to the validator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if the string is not valid JSON or the
    /// JSON cannot be read as a configuration document.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }

    /// Serializes the document as pretty JSON with two-space indentation.
    ///
    /// Servers and their environment variables appear in insertion order.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Looks up a server entry by name.
    pub fn server(&self, name: &str) -> Option<&ServerConfig> {
        self.mcp_servers.get(name)
    }

    /// Server names in display order.
    pub fn server_names(&self) -> Vec<&str> {
        self.mcp_servers.keys().map(String::as_str).collect()
    }

    /// Number of server entries.
    pub fn len(&self) -> usize {
        self.mcp_servers.len()
    }

    /// Returns `true` if the document has no server entries.
    pub fn is_empty(&self) -> bool {
        self.mcp_servers.is_empty()
    }
}
