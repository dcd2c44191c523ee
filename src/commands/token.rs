use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use serde_json::{Map, Value};

use kalender_core::Settings;
use kalender_core::auth::{self, AuthVerifier};

pub fn generate(settings: &Settings, check: &str) -> Result<()> {
    let token = auth::generate(settings.api_key()?, check)?;
    println!("{}", token);
    Ok(())
}

pub fn issue(settings: &Settings, user: &str) -> Result<()> {
    let config = settings.auth.validated()?;

    let mut fields = Map::new();
    fields.insert("your_domain".to_string(), Value::from(config.provider_name));
    fields.insert("user".to_string(), Value::from(user));

    let token = auth::issue(config.aes_key, config.aes_iv, fields, Utc::now().timestamp())?;
    println!("{}", token);
    Ok(())
}

pub fn verify(settings: &Settings, token: &str) -> Result<()> {
    let mut verifier = AuthVerifier::new(settings.auth.clone());
    let payload = verifier.verify(token)?;

    println!("{}", "Token is valid".green());
    if let Some(user) = payload.user() {
        println!("  User:  {}", user);
    }
    println!("  Time:  {}", payload.time());
    for (key, value) in &payload.fields {
        if matches!(key.as_str(), "user" | "time") {
            continue;
        }
        println!("  {}: {}", key, value);
    }
    Ok(())
}
