//! Request/response models

pub mod prediction;
pub mod baseline;

pub use prediction::*;
pub use baseline::*;
