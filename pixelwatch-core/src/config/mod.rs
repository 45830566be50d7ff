//! Configuration types
//!
//! Board-agnostic configuration for the render supervisor.

pub mod types;

pub use types::*;
