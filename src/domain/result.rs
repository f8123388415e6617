//! Result type alias for Medigram

use super::errors::MedigramError;

/// Result type alias for Medigram operations
///
/// # Examples
///
/// ```
/// use medigram::domain::result::Result;
/// use medigram::domain::errors::MedigramError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MedigramError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MedigramError>;
