//! HTTP/REST API for editing sessions.
//!
//! Axum-based REST API at `/api/v1/` with API key authentication,
//! envelope response format, and CORS support. Each session hosts one
//! `ConfigurationSurface` in memory until it is submitted or closed.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
