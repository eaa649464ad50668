pub mod assemble;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod polyline;
pub mod provider;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{Config, ConfigError};
pub use errors::RoutingError;
