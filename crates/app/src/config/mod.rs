//! Application configuration

pub mod commercetools;
pub mod logging;

pub use commercetools::CommercetoolsArgs;
pub use logging::{LogFormat, LoggingConfig};
