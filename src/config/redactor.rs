//! Placeholder redaction of environment values.
//!
//! Redaction is not a security mechanism: it only keeps secret values out of
//! an exported or copied document by substituting a descriptive placeholder.

use crate::config::{Config, Field};

const PLACEHOLDER_PREFIX: &str = "[ENTER_";
const PLACEHOLDER_SUFFIX: &str = "_HERE]";

/// Placeholder that replaces the value of `key`, e.g. `[ENTER_API_KEY_HERE]`.
pub fn placeholder_for(key: &str) -> String {
    format!("{}{}{}", PLACEHOLDER_PREFIX, key.to_uppercase(), PLACEHOLDER_SUFFIX)
}

/// Returns `true` if `value` looks like a redaction placeholder.
pub fn is_placeholder(value: &str) -> bool {
    value
        .strip_prefix(PLACEHOLDER_PREFIX)
        .and_then(|rest| rest.strip_suffix(PLACEHOLDER_SUFFIX))
        .is_some_and(|key| !key.is_empty())
}

/// Returns a copy of the document with every environment value replaced by its placeholder.
///
/// Commands, arguments and server names are untouched. A malformed `env`
/// is left as it is; it already fails validation, which blocks export.
///
/// # Examples
///
/// ```
/// use mcp_config_editor::config::{redact, Config, ServerConfig};
///
/// let mut config = Config::default();
/// config
///     .mcp_servers
///     .insert("api".to_string(), ServerConfig::new("node", ["server.js"]).with_env("API_KEY", "secret123"));
///
/// let redacted = redact(&config);
/// assert_eq!(redacted.server("api").unwrap().env_vars().unwrap()["API_KEY"], "[ENTER_API_KEY_HERE]");
/// ```
pub fn redact(config: &Config) -> Config {
    let mut redacted = config.clone();

    for server in redacted.mcp_servers.values_mut() {
        if let Field::Valid(env) = &mut server.env {
            for (key, value) in env.iter_mut() {
                *value = placeholder_for(key);
            }
        }
    }

    redacted
}

/// Returns `true` if any environment variable has a non-blank value.
pub fn contains_secrets(config: &Config) -> bool {
    config
        .mcp_servers
        .values()
        .filter_map(|server| server.env_vars())
        .flat_map(|env| env.values())
        .any(|value| !value.trim().is_empty())
}

/// Returns `true` if any environment value is a redaction placeholder
/// still waiting to be filled in.
pub fn has_placeholders(config: &Config) -> bool {
    config
        .mcp_servers
        .values()
        .filter_map(|server| server.env_vars())
        .flat_map(|env| env.values())
        .any(|value| is_placeholder(value))
}
