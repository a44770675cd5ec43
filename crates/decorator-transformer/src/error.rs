//! Transformation error types.

use thiserror::Error;

/// An error that aborts the transformation of a single file.
///
/// Inputs that simply are not eligible (no decorator, no literal argument,
/// unrecognized shapes) are passed through unchanged and never produce an error.
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    /// The source could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// The resource path of the file.
        path: String,
        /// The parser's description of the problem.
        message: String,
    },

    /// The loader options are unusable.
    #[error("invalid loader options: {0}")]
    InvalidOptions(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TransformError::Parse {
            path: "src/App.ts".to_string(),
            message: "Expected '}'".to_string(),
        };
        assert_eq!(error.to_string(), "failed to parse src/App.ts: Expected '}'");
    }
}
