//! Infrastructure layer providing external service integrations.
//!
//! This module contains the key-value storage backends, the HTTP directory
//! client, configuration loading and logging setup.

pub mod config;
pub mod http;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use http::*;
pub use logging::*;
pub use persistence::*;
