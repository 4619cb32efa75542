pub mod config;
pub mod cube_model;

pub use cube_model::file_store::CubeConfigParser;
pub use cube_model::{Cube, CubeConfigError, CubeStore, Dimension, Facts};
