//! The building blocks of face attribute dataset pipelines.

mod common;
pub mod config;
pub mod dataset;
pub mod processor;
pub mod profiling;
pub mod ratio;
pub mod size;
pub mod stats;
pub mod tensor;
