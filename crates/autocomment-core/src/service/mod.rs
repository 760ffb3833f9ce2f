//! Application services orchestrating repositories and the configuration
//! surface.

pub mod configuration;

pub use configuration::ConfigurationService;
