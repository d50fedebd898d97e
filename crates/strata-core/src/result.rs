//! Result type alias used throughout the crate

use crate::error::StrataError;

/// Result type for configuration resolution operations
pub type Result<T> = std::result::Result<T, StrataError>;
