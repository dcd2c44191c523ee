//! Auth token protocol: write tokens sent to the remote service and login
//! tokens received from its login page.

pub mod config;
pub mod json;
pub mod token;

pub use config::{AuthConfig, ValidatedAuthConfig};
pub use token::{AuthPayload, AuthVerifier, FIXED_IV, MAX_TOKEN_AGE_SECS, generate, issue, open};
