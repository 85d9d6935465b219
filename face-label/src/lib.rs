//! Label types for face attribute classification datasets.

mod common;

pub mod attr;
pub use attr::*;

pub mod class_mode;
pub use class_mode::*;
