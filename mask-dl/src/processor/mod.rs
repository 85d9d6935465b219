//! Image loading and preprocessing building blocks.

pub mod color_jitter;
pub mod gaussian_noise;
pub mod loader;
pub mod pipeline;
pub mod random_flip;

pub use color_jitter::*;
pub use gaussian_noise::*;
pub use loader::*;
pub use pipeline::*;
pub use random_flip::*;
