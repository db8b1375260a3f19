// Configuration file handling

use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ConfigError;

/// Environment variable holding the Report Portal access token
pub const REPORTPORTAL_TOKEN: &str = "ROTEST_REPORTPORTAL_TOKEN";

/// Key of the reporting section inside the runner's configuration file
pub const SECTION: &str = "reportportal";

/// File names looked up in every directory, in order
pub const CONFIG_FILE_NAMES: [&str; 4] =
    ["rotest.yml", "rotest.yaml", ".rotest.yml", "rotest.toml"];

/// What happens after a log record could not be shipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardFailurePolicy {
    /// Surface the fault to the runner on the next callback
    #[default]
    Abort,
    /// Report the fault on stderr and keep going
    Ignore,
}

/// Settings needed to reach Report Portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub endpoint: String,
    pub project: String,
    pub token: String,
    pub on_log_failure: ForwardFailurePolicy,
}

#[derive(Debug, Deserialize)]
struct PortalSection {
    endpoint: String,
    project: String,
    #[serde(default)]
    on_log_failure: ForwardFailurePolicy,
}

/// Source of the adapter's configuration
pub trait ConfigurationProvider {
    fn load(&self) -> Result<PortalConfig, ConfigError>;
}

impl PortalConfig {
    /// Build the configuration from a file's text.
    ///
    /// `path` decides the format (`.toml` or YAML) and is quoted in errors.
    /// The token never comes from the file, only from `env`.
    pub fn from_source<F>(path: &Path, content: &str, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed: Value = if path.extension().is_some_and(|e| e == "toml") {
            toml::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };

        let Some(section) = parsed.get(SECTION) else {
            return Err(ConfigError::MissingSection {
                path: path.to_path_buf(),
                content: parsed.to_string(),
            });
        };

        let section: PortalSection =
            serde_json::from_value(section.clone()).map_err(|e| ConfigError::InvalidValue {
                field: SECTION.to_string(),
                message: e.to_string(),
            })?;

        url::Url::parse(&section.endpoint).map_err(|e| ConfigError::InvalidValue {
            field: "endpoint".to_string(),
            message: format!("{} ({})", e, section.endpoint),
        })?;

        let token = env(REPORTPORTAL_TOKEN).ok_or_else(|| ConfigError::MissingToken {
            variable: REPORTPORTAL_TOKEN.to_string(),
        })?;

        Ok(Self {
            endpoint: section.endpoint,
            project: section.project,
            token,
            on_log_failure: section.on_log_failure,
        })
    }
}

/// Reads the runner's configuration file and the token from the environment
#[derive(Debug, Clone, Default)]
pub struct FileConfigurationProvider {
    path: Option<PathBuf>,
    start_dir: Option<PathBuf>,
}

impl FileConfigurationProvider {
    /// Search from the current directory upwards, then the home directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this exact file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            start_dir: None,
        }
    }

    /// Search from `dir` upwards instead of the current directory
    pub fn searching_from(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: None,
            start_dir: Some(dir.into()),
        }
    }

    fn locate(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let start = match &self.start_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        find_config(&start)
            .or_else(|| dirs::home_dir().and_then(|home| find_in_dir(&home)))
            .ok_or(ConfigError::NotFound(start))
    }
}

impl ConfigurationProvider for FileConfigurationProvider {
    fn load(&self) -> Result<PortalConfig, ConfigError> {
        let path = self.locate()?;
        info!(path = %path.display(), "loading Report Portal configuration");

        let content = std::fs::read_to_string(&path)?;
        let config = PortalConfig::from_source(&path, &content, |name| std::env::var(name).ok())?;

        debug!(endpoint = %config.endpoint, project = %config.project, "configuration loaded");
        Ok(config)
    }
}

/// Find a configuration file in `start_dir` or any of its parents
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        if let Some(found) = find_in_dir(&current) {
            return Some(found);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
