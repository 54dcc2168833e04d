//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the local registry, the remote directory fetch states, routing and the
//! UI state built on top of them.

pub mod directory;
pub mod registry;
pub mod routes;
pub mod state;

pub use directory::*;
pub use registry::*;
pub use routes::*;
pub use state::*;
