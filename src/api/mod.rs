//! HTTP routes and request processing

pub mod handler;
pub mod helpers;
pub mod parsing;

// Re-export the router pieces for convenience
pub use handler::{AppState, build_router, serve};
