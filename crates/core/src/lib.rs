pub mod config;
pub mod errors;

pub use config::{AppConfig, ConfigError, LoadOptions};
pub use errors::InterfaceError;
