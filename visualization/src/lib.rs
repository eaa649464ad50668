pub mod errors;
pub mod map;

pub use errors::MapError;
pub use map::render;
