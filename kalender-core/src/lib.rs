//! Core library for the kalender ecosystem.
//!
//! - `entity` and `cache`: the domain model and the per-session identity map
//! - `wire` and `mapper`: the service's record format and conversion to entities
//! - `auth` and `cipher`: signed, encrypted auth tokens
//! - `facade` and `transport`: the client for the remote calendar service

pub mod auth;
pub mod cache;
pub mod cipher;
pub mod entity;
pub mod error;
pub mod facade;
pub mod mapper;
pub mod settings;
pub mod transport;
pub mod wire;

pub use cache::{CacheKey, Cacheable, EntityCache, EntityKind};
pub use entity::*;
pub use error::{KalenderError, KalenderResult};
pub use facade::KalenderClient;
pub use mapper::{FromWire, ToWire};
pub use settings::Settings;
pub use transport::{JsonRpcTransport, Transport};
