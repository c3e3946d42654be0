use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use survey_dash_evaluator::VisibilityRules;

pub const DEFAULT_CONFIG_NAME: &str = "survey-dash.config.json";

/// survey-dash configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema document rendered when `--schema` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,

    /// Data file rendered against when `--data` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,

    /// Interval at which `render --follow` polls the shared channel
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Visibility rules, including the field groups treated as one
    #[serde(default)]
    pub visibility: VisibilityRules,
}

fn default_poll_interval_ms() -> u64 {
    50
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid {}: {}", config_path.display(), e))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// `explicit` if given, else the configured path relative to `cwd`
    pub fn resolve_input(cwd: &Path, explicit: Option<&Path>, configured: Option<&str>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| configured.map(|p| cwd.join(p)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_path: None,
            data_path: None,
            poll_interval_ms: default_poll_interval_ms(),
            visibility: VisibilityRules::default(),
        }
    }
}
