pub mod events;
pub mod index;
pub mod init_config;
pub mod login_url;
pub mod permission;
pub mod structures;
pub mod token;

use anyhow::{Context, Result};
use kalender_core::{JsonRpcTransport, KalenderClient, Settings};
use serde_json::Value;
use tracing::debug;

pub fn client(settings: &Settings) -> Result<KalenderClient<JsonRpcTransport>> {
    debug!(endpoint = %settings.endpoint, timeout_secs = settings.timeout_secs, "creating client");
    let transport = settings
        .transport()
        .with_context(|| format!("Could not set up a client for {}", settings.endpoint))?;
    Ok(KalenderClient::new(transport))
}

/// Parse a `--filter` argument. No filter means an empty object.
pub fn parse_filter(filter: Option<&str>) -> Result<Value> {
    let Some(filter) = filter else {
        return Ok(Value::Object(Default::default()));
    };
    let value: Value = serde_json::from_str(filter).context("Filter is not valid JSON")?;
    if !value.is_object() {
        anyhow::bail!("Filter must be a JSON object, e.g. '{{\"limit\": 10}}'");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter(None).unwrap(), json!({}));
        assert_eq!(parse_filter(Some(r#"{"limit": 3}"#)).unwrap(), json!({"limit": 3}));
        assert!(parse_filter(Some("[1]")).is_err());
        assert!(parse_filter(Some("{")).is_err());
    }
}
