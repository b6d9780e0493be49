use dashgrid_editor::{PlaceholderOptions, DEFAULT_SPACE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "dashgrid.config.json";

/// Dashgrid configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Space between cells for new grids, in pixels
    #[serde(default = "default_space")]
    pub default_space: u32,

    /// Write indented markup
    #[serde(default)]
    pub pretty: bool,

    /// Turn modules into grids when entering design mode
    #[serde(default = "default_placeholders_in_modules")]
    pub placeholders_in_modules: bool,
}

fn default_space() -> u32 {
    DEFAULT_SPACE
}

fn default_placeholders_in_modules() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn placeholder_options(&self) -> PlaceholderOptions {
        PlaceholderOptions {
            modules_into_grids: self.placeholders_in_modules,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_space: default_space(),
            pretty: false,
            placeholders_in_modules: default_placeholders_in_modules(),
        }
    }
}
