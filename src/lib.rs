//! Primera Página - Terminal Registry and Directory Library
//!
//! A terminal application with a locally persisted user registry and a
//! browser for a remote user directory, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
