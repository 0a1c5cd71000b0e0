//! Result type alias for Mendel
//!
//! This module provides a convenient Result type alias that uses MendelError
//! as the error type.

use super::errors::MendelError;

/// Result type alias for Mendel operations
///
/// This is a convenience type alias that uses `MendelError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use mendel::domain::result::Result;
/// use mendel::domain::errors::MendelError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MendelError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MendelError>;
