//! Allocation engine, configuration surface and repository trait definitions
//! for the auto-commenter.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `autocomment-types` -- never on
//! `autocomment-infra` or any database/IO crate.

pub mod allocation;
pub mod event;
pub mod repository;
pub mod service;
pub mod surface;
