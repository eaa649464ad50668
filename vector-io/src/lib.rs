pub mod driver;
pub mod errors;
pub mod feature;
pub mod files;
mod formats;
pub mod reader;
pub mod table;
pub mod writer;


pub use driver::{resolve_driver, validate_input_path, Driver, DriverError};
pub use errors::{VectorError, VectorResult};
pub use feature::{Feature, FeatureId, Schema, VectorLayer, VectorRecord};
