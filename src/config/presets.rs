use crate::config::ServerConfig;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Built-in server templates that can be inserted by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// GitHub server, needs a personal access token
    Github,
    /// Filesystem server rooted at a placeholder directory
    Filesystem,
    /// Brave search server, needs an API key
    Brave,
    /// Postgres server, needs a connection string
    Postgres,
}

impl Preset {
    /// Every preset, in catalog order.
    pub const ALL: [Preset; 4] = [
        Preset::Github,
        Preset::Filesystem,
        Preset::Brave,
        Preset::Postgres,
    ];

    /// The preset id, also used as the server name when the preset is loaded.
    pub fn id(self) -> &'static str {
        match self {
            Preset::Github => "github",
            Preset::Filesystem => "filesystem",
            Preset::Brave => "brave",
            Preset::Postgres => "postgres",
        }
    }

    /// The server entry this preset inserts.
    ///
    /// Secret-bearing variables are present with empty values for the user to fill in.
    pub fn template(self) -> ServerConfig {
        match self {
            Preset::Github => ServerConfig::new("npx", ["-y", "@modelcontextprotocol/server-github"])
                .with_env("GITHUB_PERSONAL_ACCESS_TOKEN", ""),
            Preset::Filesystem => ServerConfig::new(
                "npx",
                [
                    "-y",
                    "@modelcontextprotocol/server-filesystem",
                    "/path/to/allowed/directory",
                ],
            ),
            Preset::Brave => ServerConfig::new("npx", ["-y", "@modelcontextprotocol/server-brave-search"])
                .with_env("BRAVE_API_KEY", ""),
            Preset::Postgres => ServerConfig::new("npx", ["-y", "@modelcontextprotocol/server-postgres"])
                .with_env("POSTGRES_CONNECTION_STRING", ""),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.id() == s)
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}
