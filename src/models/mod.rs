pub mod enums;
pub mod lab;
pub mod recommendation;

pub use enums::*;
pub use lab::*;
pub use recommendation::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
