//! Configuration management for canon.
//!
//! Parses `canon.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.username`
//! - `confluence.api_token`
//! - `store.dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override the publish record store directory.
    pub store_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "canon.toml";

/// Default store directory, relative to the config file.
const DEFAULT_STORE_DIR: &str = ".canon";

/// Upper bound for conflict retries.
const MAX_RETRIES_LIMIT: u32 = 10;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence configuration.
    pub confluence: Option<ConfluenceConfig>,
    /// Publishing behavior.
    pub publish: PublishConfig,
    /// Store configuration (path as a relative string from TOML).
    store: StoreConfigRaw,

    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Confluence configuration.
#[derive(Debug, Deserialize)]
pub struct ConfluenceConfig {
    /// Confluence base URL (e.g. `https://example.atlassian.net/wiki`).
    pub base_url: String,
    /// User for basic authentication; bearer authentication when absent.
    #[serde(default)]
    pub username: Option<String>,
    /// API token or personal access token.
    pub api_token: String,
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.api_token, "confluence.api_token")?;
        if let Some(username) = &self.username {
            require_non_empty(username, "confluence.username")?;
        }
        Ok(())
    }
}

/// Publishing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Retries after a version conflict before giving up.
    pub max_retries: u32,
    /// Title of the collapsible notes container.
    pub notes_title: String,
    /// Version message attached to page updates.
    pub version_message: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            notes_title: "Notes".to_owned(),
            version_message: None,
        }
    }
}

/// Raw store configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    dir: Option<String>,
}

/// Resolved store configuration with an absolute path.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// Directory holding publish records.
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `canon.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url
            && let Some(confluence) = &mut self.confluence
        {
            confluence.base_url.clone_from(base_url);
        }
        if let Some(store_dir) = &settings.store_dir {
            self.store_resolved.dir.clone_from(store_dir);
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Returns the Confluence config if the `[confluence]` section is present
    /// and all fields are valid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        let conf = self.confluence.as_ref().ok_or_else(|| {
            ConfigError::Validation("[confluence] section required in config".into())
        })?;
        conf.validate()?;
        Ok(conf)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            confluence: None,
            publish: PublishConfig::default(),
            store: StoreConfigRaw::default(),
            store_resolved: StoreConfig {
                dir: base.join(DEFAULT_STORE_DIR),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[confluence]` section is validated separately by
    /// [`require_confluence`](Self::require_confluence), since offline
    /// commands do not need it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.publish.notes_title, "publish.notes_title")?;
        if self.publish.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::Validation(format!(
                "publish.max_retries cannot exceed {MAX_RETRIES_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut confluence) = self.confluence {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
            confluence.api_token =
                expand::expand_env(&confluence.api_token, "confluence.api_token")?;
            if let Some(ref username) = confluence.username {
                confluence.username = Some(expand::expand_env(username, "confluence.username")?);
            }
        }

        if let Some(ref dir) = self.store.dir {
            self.store.dir = Some(expand::expand_env(dir, "store.dir")?);
        }

        Ok(())
    }

    /// Resolve the store directory against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.store_resolved = StoreConfig {
            dir: config_dir.join(self.store.dir.as_deref().unwrap_or(DEFAULT_STORE_DIR)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.confluence.is_none());
        assert_eq!(config.publish.max_retries, 3);
        assert_eq!(config.publish.notes_title, "Notes");
        assert_eq!(config.store_resolved.dir, PathBuf::from("/test/.canon"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.publish.max_retries, 3);
        assert!(config.publish.version_message.is_none());
    }

    #[test]
    fn test_parse_confluence_config() {
        let toml = r#"
[confluence]
base_url = "https://example.atlassian.net/wiki"
username = "bot@example.com"
api_token = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let confluence = config.confluence.unwrap();
        assert_eq!(confluence.base_url, "https://example.atlassian.net/wiki");
        assert_eq!(confluence.username.as_deref(), Some("bot@example.com"));
        assert_eq!(confluence.api_token, "secret");
    }

    #[test]
    fn test_load_resolves_store_dir_relative_to_config() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[publish]
max_retries = 5
notes_title = "Internal notes"

[store]
dir = "state"
"#,
        );
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.store_resolved.dir, tmp.path().join("state"));
        assert_eq!(config.publish.max_retries, 5);
        assert_eq!(config.publish.notes_title, "Internal notes");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/canon.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_too_many_retries() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[publish]\nmax_retries = 11\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("publish.max_retries"));
    }

    #[test]
    fn test_load_rejects_empty_notes_title() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[publish]\nnotes_title = \"\"\n");
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config: Config = toml::from_str(
            r#"
[confluence]
base_url = "https://a.example.com"
api_token = "t"
"#,
        )
        .unwrap();
        config.apply_cli_settings(&CliSettings {
            base_url: Some("https://b.example.com".to_owned()),
            store_dir: Some(PathBuf::from("/tmp/records")),
        });
        assert_eq!(
            config.confluence.as_ref().unwrap().base_url,
            "https://b.example.com"
        );
        assert_eq!(config.store_resolved.dir, PathBuf::from("/tmp/records"));
    }

    #[test]
    fn test_expand_env_vars_confluence() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CANON_TEST_CONF_URL", "https://wiki.test.com");
            std::env::set_var("CANON_TEST_CONF_TOKEN", "tok");
        }
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[confluence]
base_url = "${CANON_TEST_CONF_URL}"
api_token = "${CANON_TEST_CONF_TOKEN}"
"#,
        );
        let config = Config::load(Some(&path), None).unwrap();
        let confluence = config.require_confluence().unwrap();
        assert_eq!(confluence.base_url, "https://wiki.test.com");
        assert_eq!(confluence.api_token, "tok");
        unsafe {
            std::env::remove_var("CANON_TEST_CONF_URL");
            std::env::remove_var("CANON_TEST_CONF_TOKEN");
        }
    }

    #[test]
    fn test_require_confluence_missing_section() {
        let config = Config::default_with_base(Path::new("/x"));
        let err = config.require_confluence().unwrap_err();
        assert!(err.to_string().contains("[confluence]"));
    }

    #[test]
    fn test_confluence_validate_invalid_url() {
        let confluence = ConfluenceConfig {
            base_url: "wiki.example.com".to_owned(),
            username: None,
            api_token: "t".to_owned(),
        };
        assert!(matches!(
            confluence.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_confluence_validate_empty_token() {
        let confluence = ConfluenceConfig {
            base_url: "https://wiki.example.com".to_owned(),
            username: Some("me".to_owned()),
            api_token: String::new(),
        };
        let err = confluence.validate().unwrap_err();
        assert!(err.to_string().contains("confluence.api_token"));
    }
}
