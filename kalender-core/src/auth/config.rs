//! Per-deployment settings needed to verify login tokens.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Shared configuration for verifying tokens issued by the login page.
///
/// All four values are required. They are optional here so a partially
/// filled config file still deserializes; [`AuthConfig::validated`] reports
/// the first missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aes_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aes_iv: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
}

/// Borrowed view of an [`AuthConfig`] whose values are all present.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedAuthConfig<'a> {
    pub aes_key: &'a str,
    pub aes_iv: &'a str,
    pub login_url: &'a str,
    pub provider_name: &'a str,
}

impl AuthConfig {
    pub fn new(
        aes_key: impl Into<String>,
        aes_iv: impl Into<String>,
        login_url: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        AuthConfig {
            aes_key: Some(aes_key.into()),
            aes_iv: Some(aes_iv.into()),
            login_url: Some(login_url.into()),
            provider_name: Some(provider_name.into()),
        }
    }

    pub fn validated(&self) -> Result<ValidatedAuthConfig<'_>, ConfigError> {
        Ok(ValidatedAuthConfig {
            aes_key: required(&self.aes_key, "aes_key")?,
            aes_iv: required(&self.aes_iv, "aes_iv")?,
            login_url: required(&self.login_url, "login_url")?,
            provider_name: required(&self.provider_name, "provider_name")?,
        })
    }

    /// Build the login page URL a user is sent to in order to obtain a token.
    pub fn login_link(&self, redirect_url: Option<&str>) -> Result<String, ConfigError> {
        let config = self.validated()?;

        let mut url = Url::parse(config.login_url).map_err(|e| ConfigError::Invalid {
            name: "login_url",
            reason: e.to_string(),
        })?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(redirect) = redirect_url {
                query.append_pair("redirect_url", redirect);
            }
            query.append_pair("provider", config.provider_name);
        }

        Ok(url.into())
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingValue(name))
}
