//! Functional edits of the configuration document.
//!
//! Each mutator borrows the current [`Config`] and returns a new one; the
//! input is never modified. A mutator that fails returns an error and no
//! document, so a failed edit cannot leave anything half applied.

use crate::config::{Config, Field, Preset, ServerConfig};
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Key inserted by [`add_env_var`].
pub const NEW_ENV_KEY: &str = "NEW_VAR";

/// Prefix of the names generated by [`add_server`].
pub const NEW_SERVER_PREFIX: &str = "new-server-";

/// Renames `old` to `new` in place, dropping any other entry already named `new`.
fn rename_key<V>(map: IndexMap<String, V>, old: &str, new: &str) -> IndexMap<String, V> {
    if !map.contains_key(old) {
        return map;
    }

    map.into_iter()
        .filter(|(key, _)| key != new)
        .map(|(key, value)| {
            if key == old {
                (new.to_string(), value)
            } else {
                (key, value)
            }
        })
        .collect()
}

/// Clones the document and applies `edit` to the named server.
fn edit_server<F>(config: &Config, name: &str, edit: F) -> Result<Config>
where
    F: FnOnce(&mut ServerConfig) -> Result<()>,
{
    let mut next = config.clone();
    let server = next
        .mcp_servers
        .get_mut(name)
        .ok_or_else(|| Error::ServerNotFound(name.to_string()))?;
    edit(server)?;
    Ok(next)
}

/// Adds an empty server entry and returns the new document with its generated name.
///
/// The name is `new-server-<k>` with `k` starting at the current server
/// count plus one. If that name is already taken `k` keeps counting up, so a
/// new entry never replaces an existing one.
pub fn add_server(config: &Config) -> (Config, String) {
    let mut k = config.len() + 1;
    let mut name = format!("{}{}", NEW_SERVER_PREFIX, k);
    while config.mcp_servers.contains_key(&name) {
        k += 1;
        name = format!("{}{}", NEW_SERVER_PREFIX, k);
    }

    let mut next = config.clone();
    next.mcp_servers.insert(name.clone(), ServerConfig::default());
    (next, name)
}

/// Moves a server entry to a new name, keeping its position.
///
/// Renaming to the current name returns an identical document. An existing
/// entry named `new_name` is replaced.
pub fn rename_server(config: &Config, old_name: &str, new_name: &str) -> Result<Config> {
    if !config.mcp_servers.contains_key(old_name) {
        return Err(Error::ServerNotFound(old_name.to_string()));
    }
    if old_name == new_name {
        return Ok(config.clone());
    }

    if config.mcp_servers.contains_key(new_name) {
        tracing::warn!(from = %old_name, to = %new_name, "Rename replaces an existing server entry");
    }

    let mut next = config.clone();
    next.mcp_servers = rename_key(next.mcp_servers, old_name, new_name);
    Ok(next)
}

/// Removes a server entry.
pub fn remove_server(config: &Config, name: &str) -> Result<Config> {
    if !config.mcp_servers.contains_key(name) {
        return Err(Error::ServerNotFound(name.to_string()));
    }

    let mut next = config.clone();
    next.mcp_servers.shift_remove(name);
    Ok(next)
}

/// Replaces a server's command.
pub fn set_command(config: &Config, name: &str, command: impl Into<String>) -> Result<Config> {
    let command = command.into();
    edit_server(config, name, |server| {
        server.command = Field::Valid(command);
        Ok(())
    })
}

/// Replaces a server's whole argument list.
pub fn set_args(config: &Config, name: &str, args: Vec<String>) -> Result<Config> {
    edit_server(config, name, |server| {
        server.args = Field::Valid(args);
        Ok(())
    })
}

/// Replaces a server's whole environment.
pub fn set_env(config: &Config, name: &str, env: IndexMap<String, String>) -> Result<Config> {
    edit_server(config, name, |server| {
        server.env = Field::Valid(env);
        Ok(())
    })
}

/// Appends an empty argument. A malformed `args` is replaced by a fresh list.
pub fn add_arg(config: &Config, name: &str) -> Result<Config> {
    edit_server(config, name, |server| {
        let mut args = server.args.valid().cloned().unwrap_or_default();
        args.push(String::new());
        server.args = Field::Valid(args);
        Ok(())
    })
}

/// Returns the server's argument list, or an index error if `index` is not in it.
fn args_at<'a>(server: &'a mut ServerConfig, name: &str, index: usize) -> Result<&'a mut Vec<String>> {
    let len = server.args.valid().map_or(0, Vec::len);
    match &mut server.args {
        Field::Valid(args) if index < len => Ok(args),
        _ => Err(Error::IndexOutOfRange {
            server: name.to_string(),
            index,
            len,
        }),
    }
}

/// Replaces the argument at `index`.
pub fn update_arg(config: &Config, name: &str, index: usize, value: impl Into<String>) -> Result<Config> {
    let value = value.into();
    edit_server(config, name, |server| {
        args_at(server, name, index)?[index] = value;
        Ok(())
    })
}

/// Removes the argument at `index`, shifting later arguments down.
pub fn remove_arg(config: &Config, name: &str, index: usize) -> Result<Config> {
    edit_server(config, name, |server| {
        args_at(server, name, index)?.remove(index);
        Ok(())
    })
}

/// Inserts `NEW_VAR` with an empty value, resetting it if it already exists.
pub fn add_env_var(config: &Config, name: &str) -> Result<Config> {
    edit_server(config, name, |server| {
        let mut env = server.env.valid().cloned().unwrap_or_default();
        env.insert(NEW_ENV_KEY.to_string(), String::new());
        server.env = Field::Valid(env);
        Ok(())
    })
}

/// Renames and/or sets an environment variable.
///
/// When the key changes the variable keeps its position. Another variable
/// already named `new_key` is replaced.
pub fn update_env_var(
    config: &Config,
    name: &str,
    old_key: &str,
    new_key: &str,
    value: impl Into<String>,
) -> Result<Config> {
    let value = value.into();
    edit_server(config, name, |server| {
        let mut env = server.env.valid().cloned().unwrap_or_default();
        if old_key != new_key {
            if env.contains_key(old_key) && env.contains_key(new_key) {
                tracing::warn!(server = %name, key = %new_key, "Environment key rename replaces an existing variable");
            }
            env = rename_key(env, old_key, new_key);
        }
        env.insert(new_key.to_string(), value);
        server.env = Field::Valid(env);
        Ok(())
    })
}

/// Removes an environment variable; a missing key is not an error.
pub fn remove_env_var(config: &Config, name: &str, key: &str) -> Result<Config> {
    edit_server(config, name, |server| {
        if let Field::Valid(env) = &mut server.env {
            env.shift_remove(key);
        }
        Ok(())
    })
}

/// Inserts a preset under its own id, replacing any entry with that name.
pub fn load_preset(config: &Config, preset: Preset) -> Config {
    let mut next = config.clone();
    if next.mcp_servers.contains_key(preset.id()) {
        tracing::warn!(preset = %preset, "Preset replaces an existing server entry");
    }
    next.mcp_servers.insert(preset.id().to_string(), preset.template());
    next
}

/// An edit intent, as dispatched by a user interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// See [`add_server`]
    AddServer,
    /// See [`rename_server`]
    RenameServer { from: String, to: String },
    /// See [`remove_server`]
    RemoveServer { server: String },
    /// See [`set_command`]
    SetCommand { server: String, command: String },
    /// See [`set_args`]
    SetArgs { server: String, args: Vec<String> },
    /// See [`set_env`]
    SetEnv { server: String, env: IndexMap<String, String> },
    /// See [`add_arg`]
    AddArg { server: String },
    /// See [`update_arg`]
    UpdateArg { server: String, index: usize, value: String },
    /// See [`remove_arg`]
    RemoveArg { server: String, index: usize },
    /// See [`add_env_var`]
    AddEnvVar { server: String },
    /// See [`update_env_var`]
    UpdateEnvVar {
        server: String,
        old_key: String,
        new_key: String,
        value: String,
    },
    /// See [`remove_env_var`]
    RemoveEnvVar { server: String, key: String },
    /// See [`load_preset`]
    LoadPreset(Preset),
}

impl Edit {
    /// Short name of the edit, safe to log (carries no values).
    pub fn kind(&self) -> &'static str {
        match self {
            Edit::AddServer => "add_server",
            Edit::RenameServer { .. } => "rename_server",
            Edit::RemoveServer { .. } => "remove_server",
            Edit::SetCommand { .. } => "set_command",
            Edit::SetArgs { .. } => "set_args",
            Edit::SetEnv { .. } => "set_env",
            Edit::AddArg { .. } => "add_arg",
            Edit::UpdateArg { .. } => "update_arg",
            Edit::RemoveArg { .. } => "remove_arg",
            Edit::AddEnvVar { .. } => "add_env_var",
            Edit::UpdateEnvVar { .. } => "update_env_var",
            Edit::RemoveEnvVar { .. } => "remove_env_var",
            Edit::LoadPreset(_) => "load_preset",
        }
    }

    /// Applies the edit to `config`, producing a new document.
    pub fn apply(&self, config: &Config) -> Result<Config> {
        match self {
            Edit::AddServer => Ok(add_server(config).0),
            Edit::RenameServer { from, to } => rename_server(config, from, to),
            Edit::RemoveServer { server } => remove_server(config, server),
            Edit::SetCommand { server, command } => set_command(config, server, command.as_str()),
            Edit::SetArgs { server, args } => set_args(config, server, args.clone()),
            Edit::SetEnv { server, env } => set_env(config, server, env.clone()),
            Edit::AddArg { server } => add_arg(config, server),
            Edit::UpdateArg { server, index, value } => update_arg(config, server, *index, value.as_str()),
            Edit::RemoveArg { server, index } => remove_arg(config, server, *index),
            Edit::AddEnvVar { server } => add_env_var(config, server),
            Edit::UpdateEnvVar {
                server,
                old_key,
                new_key,
                value,
            } => update_env_var(config, server, old_key, new_key, value.as_str()),
            Edit::RemoveEnvVar { server, key } => remove_env_var(config, server, key),
            Edit::LoadPreset(preset) => Ok(load_preset(config, *preset)),
        }
    }
}
