use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result};
use quill_db::{DatabaseSettings, RetryPolicy, DEFAULT_DB_URL};
use serde::Deserialize;

const DEFAULT_CONFIG: &str = "quill.toml";

/// Configuration file structure (quill.toml)
///
/// Every section is optional; missing values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub slack: SlackConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Pre-rendered pages and assets, laid out like the URL space
    pub site_dir: PathBuf,
    /// Public URL of the blog, used in notification links
    pub site_url: String,
    /// Mark the identity cookie `Secure`; enable behind HTTPS
    pub secure_cookie: bool,
    pub request_timeout_secs: u64,
    /// Snowflake machine id, unique per running instance
    pub machine_id: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            site_dir: PathBuf::from("site"),
            site_url: "http://localhost:8080".to_string(),
            secure_cookie: false,
            request_timeout_secs: 30,
            machine_id: 1,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Total time spent retrying the initial connection before giving up
    pub retry_window_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DB_URL.to_string(),
            max_connections: 10,
            connect_timeout_secs: 10,
            retry_window_secs: 15 * 60,
        }
    }
}

impl DatabaseConfig {
    pub fn settings(&self) -> DatabaseSettings {
        DatabaseSettings {
            url: self.url.clone(),
            max_connections: self.max_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_elapsed: Duration::from_secs(self.retry_window_secs),
            ..Default::default()
        }
    }
}

/// Slack notifications, disabled while `bot_token` is unset
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub bot_token: Option<String>,
    pub channel_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl QuillConfig {
    /// Load `path` if given, else quill.toml in the current directory if
    /// present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None if Path::new(DEFAULT_CONFIG).exists() => Self::load_from(Path::new(DEFAULT_CONFIG)),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Could not read {}: {}", path.display(), e))?;

        Self::parse(&content)
    }

    /// Parse a config document, resolving `${VAR}` references
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: QuillConfig = toml::from_str(content)?;

        config.database.url = resolve_env_var(&config.database.url)?;
        config.slack.bot_token = config
            .slack
            .bot_token
            .as_deref()
            .map(resolve_env_var)
            .transpose()?
            .filter(|token| !token.trim().is_empty());

        Ok(config)
    }
}

/// Resolve environment variable references in a string
/// Supports ${VAR_NAME} syntax
fn resolve_env_var(value: &str) -> Result<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).map_err(|_| eyre!("Environment variable '{}' not set", var_name))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000
site_dir = "public"
site_url = "https://blog.example.com"
secure_cookie = true
machine_id = 7

[database]
url = "sqlite://data/quill.db"
max_connections = 4
retry_window_secs = 60

[slack]
bot_token = "xoxb-literal"
channel_id = "C0123456"

[logging]
level = "debug"
format = "json"
"#;

        let config = QuillConfig::parse(toml_content).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.site_dir, PathBuf::from("public"));
        assert!(config.server.secure_cookie);
        assert_eq!(config.server.machine_id, 7);
        assert_eq!(config.database.url, "sqlite://data/quill.db");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(
            config.database.retry_policy().max_elapsed,
            Duration::from_secs(60)
        );
        assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-literal"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = QuillConfig::parse("").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.site_dir, PathBuf::from("site"));
        assert!(!config.server.secure_cookie);
        assert_eq!(config.database.url, DEFAULT_DB_URL);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.settings().connect_timeout, Duration::from_secs(10));
        assert!(config.slack.bot_token.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_slack_token_from_env() {
        std::env::set_var("QUILL_TEST_SLACK_TOKEN", "xoxb-from-env");

        let config = QuillConfig::parse(
            r#"
[slack]
bot_token = "${QUILL_TEST_SLACK_TOKEN}"
channel_id = "C1"
"#,
        )
        .unwrap();
        assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-from-env"));

        std::env::remove_var("QUILL_TEST_SLACK_TOKEN");
    }

    #[test]
    fn test_blank_slack_token_disables_notifications() {
        let config = QuillConfig::parse(
            r#"
[slack]
bot_token = "  "
"#,
        )
        .unwrap();

        assert!(config.slack.bot_token.is_none());
    }

    #[test]
    fn test_missing_env_var_is_an_error() {
        let result = QuillConfig::parse(
            r#"
[database]
url = "${QUILL_NONEXISTENT_VAR_99999}"
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result = QuillConfig::parse(
            r#"
[logging]
format = "pretty"
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_env_var() {
        std::env::set_var("QUILL_TEST_VAR_123", "resolved_value");

        let result = resolve_env_var("${QUILL_TEST_VAR_123}").unwrap();
        assert_eq!(result, "resolved_value");

        std::env::remove_var("QUILL_TEST_VAR_123");
    }

    #[test]
    fn test_resolve_env_var_literal() {
        let result = resolve_env_var("sqlite://quill.db").unwrap();
        assert_eq!(result, "sqlite://quill.db");
    }

    #[test]
    fn test_load_missing_file() {
        let result = QuillConfig::load(Some(Path::new("definitely/missing/quill.toml")));
        assert!(result.is_err());
    }
}
