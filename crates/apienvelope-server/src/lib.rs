//! Apienvelope Server - enveloped JSON responses for axum handlers
//!
//! This crate provides:
//! - `ResponseBuilder` with `respond` and the ok / not_found / validation /
//!   forbidden / error helpers
//! - `ApiResponse`, the axum response carrying an envelope
//! - A registry of named response operations added at startup
//! - A small demo API wired through all of the above

pub mod builder;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod response;
pub mod server;
pub mod state;

// Re-export commonly used types
pub use builder::{Reply, ResponseBuilder};
pub use error::{ResponseError, Result};
pub use registry::{OperationArgs, OperationFn, OperationRegistry};
pub use response::ApiResponse;
pub use server::{ApiServer, Config};
pub use state::AppState;

pub use axum::http::StatusCode;
