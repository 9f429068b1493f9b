pub mod loader;
pub mod schema;

pub use loader::{DrawingLoadError, DrawingLoader};
pub use schema::*;
