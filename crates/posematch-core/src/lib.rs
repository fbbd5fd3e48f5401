//! # PoseMatch-Core
//!
//! Core types for the PoseMatch pose classification engine: the 33-point
//! landmark scheme, detection frames, timestamps, and 2D geometry helpers.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
