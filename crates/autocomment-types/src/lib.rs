//! Shared domain types for the auto-commenter engagement allocator.
//!
//! Platforms, budgets, the configuration draft, licenses, the quota policy,
//! and the error/violation vocabulary used by every other crate.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod budget;
pub mod config;
pub mod draft;
pub mod error;
pub mod event;
pub mod license;
pub mod platform;
pub mod violation;
