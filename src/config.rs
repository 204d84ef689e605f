//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/blocktree/blocktree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `BLOCKTREE_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// How `tree` renders a block tree.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    /// `- [id] type` lines, two spaces of indent per level
    #[default]
    Plain,
    /// Box-drawing branches
    Unicode,
}

impl fmt::Display for TreeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeStyle::Plain => write!(f, "plain"),
            TreeStyle::Unicode => write!(f, "unicode"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PrintSettings {
    pub style: TreeStyle,
    /// Show block ids in the unicode view
    pub show_ids: bool,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            style: TreeStyle::Plain,
            show_ids: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Unified configuration for blocktree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub print: PrintSettings,
    pub output: OutputSettings,
}

/// Get the XDG config directory for blocktree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "blocktree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("blocktree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), explicit)
    }

    /// Load settings from the given files on top of the defaults, then apply env overrides.
    pub fn load_from(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("print.style", defaults.print.style.to_string())
            .map_err(config_err)?
            .set_default("print.show_ids", defaults.print.show_ids)
            .map_err(config_err)?
            .set_default("output.pretty", defaults.output.pretty)
            .map_err(config_err)?;

        if let Some(path) = global {
            debug!("global config: {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        if let Some(path) = explicit {
            debug!("explicit config: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BLOCKTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# blocktree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/blocktree/blocktree.toml
#   Explicit: --config <file>
#   Env:      BLOCKTREE_* environment variables, e.g. BLOCKTREE_PRINT__STYLE=unicode

[print]
# Tree rendering: "plain" (- [id] type) or "unicode" (box drawing)
# style = "plain"

# Show block ids in the unicode view
# show_ids = true

[output]
# Pretty-print JSON written by `flatten`
# pretty = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
