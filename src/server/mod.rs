//! Server module exposing the actions over HTTP
//!
//! This module provides a `ServerBuilder` that wires:
//! - the invoice create/update/delete actions to form routes
//! - the credential sign-in action to `/login`
//! - a view cache invalidated by successful mutations

pub mod builder;
pub mod cache;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use cache::ViewCache;
pub use handlers::AppState;
