//! Signed, time-boxed auth tokens carried in URLs.
//!
//! Wire format:
//! `urlsafe(base64(AES-CBC(random[16] || canonical_json(payload))))`
//! where `urlsafe` maps `+/=` to `-_~`.
//!
//! The IV is fixed; the random first block stands in for a per-message IV
//! and is dropped by the receiver.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use md5::Md5;
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::auth::config::AuthConfig;
use crate::auth::json::to_canonical_string;
use crate::cipher::{BLOCK_SIZE, Cipher, CipherMode};
use crate::error::AuthError;
use crate::wire::loose;

/// IV used for outgoing write tokens. The remote side expects exactly this.
pub const FIXED_IV: &str = "1234567890123456";

/// Tokens older than this many seconds are rejected.
pub const MAX_TOKEN_AGE_SECS: i64 = 3600;

pub fn sha1_hex(value: &str) -> String {
    hex::encode(Sha1::digest(value.as_bytes()))
}

pub fn md5_hex(value: &str) -> String {
    hex::encode(Md5::digest(value.as_bytes()))
}

/// Build a write-authorization token proving possession of `api_key` for
/// `check_value`.
pub fn generate(api_key: &str, check_value: &str) -> Result<String, AuthError> {
    generate_at(api_key, check_value, Utc::now().timestamp())
}

pub fn generate_at(api_key: &str, check_value: &str, now: i64) -> Result<String, AuthError> {
    if api_key.is_empty() {
        return Err(AuthError::EmptyApiKey);
    }

    let mut payload = Map::new();
    payload.insert("sha1".to_string(), Value::String(sha1_hex(check_value)));
    payload.insert("md5".to_string(), Value::String(md5_hex(check_value)));
    payload.insert("time".to_string(), Value::from(now));

    seal(api_key, FIXED_IV, &Value::Object(payload))
}

/// Build a token the way the login page does: the hashes cover the canonical
/// encoding of `fields` (with `time` set to `now`), so [`AuthVerifier`]
/// accepts it.
pub fn issue(
    key: &str,
    iv: &str,
    mut fields: Map<String, Value>,
    now: i64,
) -> Result<String, AuthError> {
    fields.insert("time".to_string(), Value::from(now));

    let canonical = to_canonical_string(&Value::Object(fields.clone()));
    fields.insert("md5".to_string(), Value::String(md5_hex(&canonical)));
    fields.insert("sha1".to_string(), Value::String(sha1_hex(&canonical)));

    seal(key, iv, &Value::Object(fields))
}

/// Decode and decrypt a token without checking its integrity or age.
pub fn open(key: &str, iv: &str, token: &str) -> Result<Map<String, Value>, AuthError> {
    let data = decode_url_safe(token)
        .filter(|data| !data.is_empty())
        .ok_or(AuthError::EmptyAuth)?;

    let cipher = Cipher::with_iv(key.as_bytes(), CipherMode::Cbc, iv.as_bytes())?;
    let plaintext = cipher.decrypt(&data);
    let body = plaintext.get(BLOCK_SIZE..).unwrap_or_default();

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(AuthError::MalformedAuth),
    }
}

fn seal(key: &str, iv: &str, payload: &Value) -> Result<String, AuthError> {
    let cipher = Cipher::with_iv(key.as_bytes(), CipherMode::Cbc, iv.as_bytes())?;

    let first_block: [u8; BLOCK_SIZE] = rand::random();
    let mut plaintext = first_block.to_vec();
    plaintext.extend_from_slice(to_canonical_string(payload).as_bytes());

    Ok(encode_url_safe(&cipher.encrypt(&plaintext)))
}

pub fn encode_url_safe(data: &[u8]) -> String {
    STANDARD
        .encode(data)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            '=' => '~',
            c => c,
        })
        .collect()
}

pub fn decode_url_safe(token: &str) -> Option<Vec<u8>> {
    let standard: String = token
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            '~' => '=',
            c => c,
        })
        .collect();
    STANDARD.decode(standard).ok()
}

/// A verified token payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthPayload {
    /// Every field except the two hashes, in wire order.
    pub fields: Map<String, Value>,
    pub md5: String,
    pub sha1: String,
}

impl AuthPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Issue time in Unix seconds; missing or unparseable counts as 0.
    pub fn time(&self) -> i64 {
        self.fields.get("time").and_then(loose::as_i64).unwrap_or(0)
    }

    pub fn your_domain(&self) -> Option<&str> {
        self.fields.get("your_domain").and_then(Value::as_str)
    }

    /// Username of the person who logged in, when the login page sent one.
    pub fn user(&self) -> Option<&str> {
        self.fields.get("user").and_then(Value::as_str)
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> String {
    match fields.shift_remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Verifies login tokens against one deployment's [`AuthConfig`].
///
/// The first successful payload is kept: later calls on the same verifier
/// return it without looking at their token.
#[derive(Debug, Clone)]
pub struct AuthVerifier {
    config: AuthConfig,
    verified: Option<AuthPayload>,
}

impl AuthVerifier {
    pub fn new(config: AuthConfig) -> Self {
        AuthVerifier {
            config,
            verified: None,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn verify(&mut self, token: &str) -> Result<&AuthPayload, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&mut self, token: &str, now: i64) -> Result<&AuthPayload, AuthError> {
        let payload = match self.verified.take() {
            Some(payload) => payload,
            None => verify_token(&self.config, token, now)?,
        };
        Ok(&*self.verified.insert(payload))
    }
}

fn verify_token(config: &AuthConfig, token: &str, now: i64) -> Result<AuthPayload, AuthError> {
    let config = config.validated()?;

    let mut fields = open(config.aes_key, config.aes_iv, token)?;
    let md5 = take_string(&mut fields, "md5");
    let sha1 = take_string(&mut fields, "sha1");

    let canonical = to_canonical_string(&Value::Object(fields.clone()));
    if md5_hex(&canonical) != md5 {
        debug!("auth token md5 mismatch");
        return Err(AuthError::TamperedMd5);
    }
    if sha1_hex(&canonical) != sha1 {
        debug!("auth token sha1 mismatch");
        return Err(AuthError::TamperedSha1);
    }

    let payload = AuthPayload { fields, md5, sha1 };

    let age = now - payload.time();
    if age > MAX_TOKEN_AGE_SECS {
        debug!(age, "auth token expired");
        return Err(AuthError::ExpiredAuth { age });
    }

    let found = payload.your_domain().unwrap_or_default();
    if found != config.provider_name {
        debug!(found, "auth token issued for another provider");
        return Err(AuthError::WrongProvider {
            expected: config.provider_name.to_string(),
            found: found.to_string(),
        });
    }

    Ok(payload)
}
