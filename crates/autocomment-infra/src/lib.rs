//! Infrastructure layer for the auto-commenter allocator.
//!
//! Contains implementations of the repository traits defined in
//! `autocomment-core` (SQLite storage), the API key store, the `config.toml`
//! loader and data directory resolution.

pub mod config;
pub mod paths;
pub mod sqlite;
