pub mod cli;
pub mod error;
pub mod format;
pub mod math;
pub mod mesh;
pub mod normals;

pub use error::{NormalisError, Result};
