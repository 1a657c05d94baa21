//! Renderer configuration.
//!
//! ```toml
//! [render]
//! dialect = "sqlite"
//! quote_all_identifiers = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{QailError, QailResult};
use crate::transpiler::Dialect;

/// Settings for [`SqlRenderer`](crate::transpiler::SqlRenderer).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub dialect: Dialect,

    /// Quote every identifier. When off, Postgres output quotes only
    /// identifiers that need it: reserved words, names with characters
    /// outside `[A-Za-z0-9_]` and names with uppercase letters. SQLite
    /// always quotes.
    #[serde(default)]
    pub quote_all_identifiers: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            quote_all_identifiers: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    render: Option<RenderConfig>,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    /// Parse the `[render]` table of a TOML document. A missing table yields
    /// the defaults.
    pub fn from_toml_str(content: &str) -> QailResult<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| QailError::Config(e.to_string()))?;
        Ok(file.render.unwrap_or_default())
    }

    /// Load the `[render]` table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> QailResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Builder for RenderConfig
#[derive(Debug, Default)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    pub fn quote_all_identifiers(mut self, enabled: bool) -> Self {
        self.config.quote_all_identifiers = enabled;
        self
    }

    pub fn build(self) -> RenderConfig {
        self.config
    }
}
