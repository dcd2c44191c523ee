//! Error types for the kalender ecosystem.

use thiserror::Error;

/// A required setting is missing or the settings could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    MissingValue(&'static str),

    #[error("Invalid configuration value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Could not load configuration: {0}")]
    Load(String),
}

/// The cipher could not be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Invalid key size: {bits} bits (expected 128, 192 or 256)")]
    InvalidKeySize { bits: usize },
}

/// Failures while generating or verifying an auth token.
///
/// Each cause is its own variant so callers can branch on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Your api key is empty")]
    EmptyApiKey,

    #[error("The auth is empty")]
    EmptyAuth,

    #[error("The auth is malformed")]
    MalformedAuth,

    #[error("The auth is broken (md5 mismatch)")]
    TamperedMd5,

    #[error("The auth is broken (sha1 mismatch)")]
    TamperedSha1,

    #[error("The auth is too old ({age}s). Try again")]
    ExpiredAuth { age: i64 },

    #[error("The auth is for the wrong site (expected '{expected}', got '{found}'). Try again")]
    WrongProvider { expected: String, found: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),
}

impl AuthError {
    /// Whether the token failed one of its integrity hashes.
    pub fn is_tampered(&self) -> bool {
        matches!(self, AuthError::TamperedMd5 | AuthError::TamperedSha1)
    }
}

/// Errors raised by a [`Transport`](crate::transport::Transport).
///
/// Every variant has a stable numeric [`code`](TransportError::code).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Method name has no scalar value")]
    MethodNotString,

    #[error("Params must be given as array")]
    ParamsNotArray,

    #[error("Unable to connect to {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Incorrect response id (request id: {request}, response id: {response})")]
    IdMismatch { request: String, response: String },

    #[error("Request error: {0}")]
    Remote(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl TransportError {
    pub fn code(&self) -> u16 {
        match self {
            TransportError::MethodNotString => 1,
            TransportError::ParamsNotArray => 2,
            TransportError::Unreachable { .. } => 3,
            TransportError::IdMismatch { .. } => 4,
            TransportError::Remote(_) => 5,
            TransportError::MalformedResponse(_) => 6,
        }
    }
}

/// Errors that can occur in kalender operations.
#[derive(Error, Debug)]
pub enum KalenderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for KalenderError {
    fn from(err: serde_json::Error) -> Self {
        KalenderError::Serialization(err.to_string())
    }
}

/// Result type alias for kalender operations.
pub type KalenderResult<T> = Result<T, KalenderError>;
