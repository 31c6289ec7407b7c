//! Result type alias for deid
//!
//! Uses [`DeidError`] as the error type for fallible domain operations.

use super::errors::DeidError;

/// Result type alias for deid operations
///
/// # Examples
///
/// ```
/// use deid::domain::result::Result;
/// use deid::domain::errors::DeidError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DeidError::Other("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DeidError>;
