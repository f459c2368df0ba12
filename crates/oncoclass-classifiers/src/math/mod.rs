//! Small row-major containers used for feature matrices, label vectors and
//! probability tables.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::{argmax, Array1};
