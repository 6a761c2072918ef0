//! Infrastructure layer for first-responder
//!
//! This crate contains adapters for the application layer's ports:
//! HTTP query sources built on `reqwest`, and configuration loading
//! with `figment`.

pub mod config;
pub mod http;

pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileOutputConfig, FileRaceConfig, FileSourceConfig,
};
pub use http::{HttpQuerySource, build_http_registry, default_client};
