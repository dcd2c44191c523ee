//! Client settings at ~/.config/kalender/config.toml, overridable through
//! `KALENDER__*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::auth::AuthConfig;
use crate::error::{ConfigError, TransportError};
use crate::transport::JsonRpcTransport;

pub static DEFAULT_ENDPOINT: &str = "https://www.scoutnet.de/jsonrpc/server.php";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

static ENV_PREFIX: &str = "KALENDER";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Username write operations are performed as.
    #[serde(default)]
    pub api_user: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            endpoint: default_endpoint(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_user: None,
            api_key: None,
            auth: AuthConfig::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Load("Could not determine config directory".into()))?
            .join("kalender");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config file. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env.separator("__").try_parsing(true))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_user(&self) -> Result<&str, ConfigError> {
        required(&self.api_user, "api_user")
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        required(&self.api_key, "api_key")
    }

    pub fn transport(&self) -> Result<JsonRpcTransport, TransportError> {
        JsonRpcTransport::new(self.endpoint.clone(), self.timeout())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let contents = format!(
            "\
# kalender configuration

# JSON-RPC endpoint of the calendar service:
# endpoint = \"{}\"

# Request timeout in seconds:
# timeout_secs = {}

# Credentials for writing events:
# api_user = \"\"
# api_key = \"\"

# Settings for verifying tokens from the login page:
# [auth]
# aes_key = \"\"
# aes_iv = \"\"
# login_url = \"\"
# provider_name = \"\"
",
            DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Load(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Load(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingValue(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_test_env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = Settings::build(&path, make_test_env(&[])).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.api_key(), Err(ConfigError::MissingValue("api_key")));
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Settings::create_default_config(&path).unwrap();

        let settings = Settings::build(&path, make_test_env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_user = \"alice\"\napi_key = \"secret\"\ntimeout_secs = 3\n\n[auth]\naes_key = \"k\"\nprovider_name = \"demo\"\n",
        )
        .unwrap();

        let settings = Settings::build(&path, make_test_env(&[])).unwrap();
        assert_eq!(settings.api_user(), Ok("alice"));
        assert_eq!(settings.api_key(), Ok("secret"));
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.auth.aes_key.as_deref(), Some("k"));
        assert_eq!(settings.auth.aes_iv, None);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_user = \"alice\"\n").unwrap();

        let env = make_test_env(&[
            ("KALENDER__API_USER", "bob"),
            ("KALENDER__TIMEOUT_SECS", "30"),
            ("KALENDER__AUTH__AES_IV", "iv"),
        ]);
        let settings = Settings::build(&path, env).unwrap();

        assert_eq!(settings.api_user(), Ok("bob"));
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.auth.aes_iv.as_deref(), Some("iv"));
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let settings = Settings {
            api_user: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.api_user(), Err(ConfigError::MissingValue("api_user")));
    }
}
