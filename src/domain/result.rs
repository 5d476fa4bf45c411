//! Result type alias for qrbatch

use super::errors::QrBatchError;

/// Result type alias for qrbatch operations
///
/// # Examples
///
/// ```
/// use qrbatch::domain::result::Result;
/// use qrbatch::domain::errors::QrBatchError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(QrBatchError::Publish("bucket unavailable".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, QrBatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(QrBatchError::Audit("write failed".to_string()));
        assert!(result.is_err());
    }
}
