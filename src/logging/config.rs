use crate::logging::layers::console::ConsoleOutput;
use crate::Result;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::Directive;

const DEFAULT_LEVEL: &str = "info";

/// Directory under the project root holding tool-local state.
pub const STATE_DIR: &str = ".sfn-offline";

/// Resolved logging configuration after reading `logging.toml`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
    pub default_level: String,
    /// `None` leaves the decision to the execution context.
    pub enable_file: Option<bool>,
    pub console_output: Option<ConsoleOutput>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            default_level: DEFAULT_LEVEL.to_string(),
            enable_file: None,
            console_output: None,
        }
    }
}

impl LoggingConfig {
    /// Load configuration: defaults first, then `<project>/.sfn-offline/logging.toml` when present.
    pub fn load(project_root: Option<&Path>) -> Result<Self> {
        let mut config = LoggingConfig::default();
        if let Some(project) = project_root {
            let path = project.join(STATE_DIR).join("logging.toml");
            if let Some(parsed) = Self::load_from_file(&path)? {
                config.apply(parsed);
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Option<TomlLogging>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read logging config {}", path.display()))?;
        let parsed: TomlLogging = toml::from_str(&content)
            .with_context(|| format!("failed to parse logging config {}", path.display()))?;
        Ok(Some(parsed))
    }

    fn apply(&mut self, toml: TomlLogging) {
        let Some(logging) = toml.logging else {
            return;
        };
        if let Some(log_dir) = logging.log_dir {
            self.log_dir = Some(PathBuf::from(log_dir));
        }
        if let Some(default_level) = logging.default_level {
            self.default_level = default_level;
        }
        if logging.enable_file.is_some() {
            self.enable_file = logging.enable_file;
        }
        if logging.console_output.is_some() {
            self.console_output = logging.console_output;
        }
    }

    fn validate(&self) -> Result<()> {
        Directive::from_str(&self.default_level)
            .map_err(|_| anyhow!("logging.default_level must be a valid tracing directive"))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TomlLogging {
    logging: Option<TomlLoggingSection>,
}

#[derive(Debug, Deserialize)]
struct TomlLoggingSection {
    log_dir: Option<String>,
    default_level: Option<String>,
    enable_file: Option<bool>,
    #[serde(default)]
    console_output: Option<ConsoleOutput>,
}
