//! Error types for simulation setup

use thiserror::Error;

/// Errors raised while building a simulation from a [`crate::ClothConfig`].
///
/// Per-frame operations never fail; only setup is checked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClothError {
    #[error("grid must be at least 2x2, got {rows}x{cols}")]
    InvalidGrid { rows: usize, cols: usize },

    #[error("parameter `{name}` has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}
