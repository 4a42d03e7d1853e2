pub mod matrix;
pub mod unitary;

pub use matrix::{CMatrix, LinalgError, C64};
