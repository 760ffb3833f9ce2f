//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (autocomment-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod configuration;
pub mod license;
