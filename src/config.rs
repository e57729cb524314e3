//! Optional TOML configuration.
//!
//! Every key is optional and explicit command-line flags win over the file:
//!
//! ```toml
//! email_filters = ["me@work.example", "me@home.example"]
//! hide_message = true
//! branch = "main"
//! artifact = "README.md"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Branch the target repository is initialized on.
pub const DEFAULT_BRANCH: &str = "main";

/// File in the target repository that every replayed commit appends to.
pub const DEFAULT_ARTIFACT: &str = "README.md";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecoveryConfig {
    /// Accepted author emails; `git config user.email` when absent.
    #[serde(default)]
    pub email_filters: Option<Vec<String>>,

    #[serde(default)]
    pub hide_message: bool,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub artifact: Option<String>,
}

impl RecoveryConfig {
    /// Parse a config from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    pub fn artifact(&self) -> &str {
        self.artifact.as_deref().unwrap_or(DEFAULT_ARTIFACT)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
}
