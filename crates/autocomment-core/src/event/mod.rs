//! Violation notification infrastructure.

pub mod bus;

pub use bus::ViolationBus;
