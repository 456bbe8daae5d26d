//! Error types for the extraction pipeline.

use std::fmt;

/// Error type for the color extraction stages.
///
/// `InsufficientPixels` and `InsufficientClusters` are expected per-page
/// failures on degenerate input (fully blacklisted or near-uniform pages)
/// and are meant to be handled by the caller's failure policy.
/// `MalformedInput` indicates a contract violation between stages and is
/// never expected in correct operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Too few pixels survived masking to initialize the requested clusters
    InsufficientPixels {
        /// Pixels available after masking
        available: usize,
        /// Cluster count that had to be initialized
        required: usize,
    },
    /// Fewer non-empty clusters than requested dominant colors
    InsufficientClusters {
        /// Non-empty clusters found
        found: usize,
        /// Dominant colors requested
        requested: usize,
    },
    /// Stage contract violation (wrong color count, mismatched bar width)
    MalformedInput {
        /// What was malformed
        what: &'static str,
        /// Expected value
        expected: usize,
        /// Actual value
        actual: usize,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InsufficientPixels {
                available,
                required,
            } => {
                write!(
                    f,
                    "insufficient pixels after masking: {} available, {} clusters required",
                    available, required
                )
            }
            ExtractError::InsufficientClusters { found, requested } => {
                write!(
                    f,
                    "insufficient clusters: {} non-empty, {} dominant colors requested",
                    found, requested
                )
            }
            ExtractError::MalformedInput {
                what,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "malformed input: {} expected {}, got {}",
                    what, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for ExtractError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_pixels_display() {
        let error = ExtractError::InsufficientPixels {
            available: 0,
            required: 5,
        };
        assert_eq!(
            error.to_string(),
            "insufficient pixels after masking: 0 available, 5 clusters required"
        );
    }

    #[test]
    fn test_insufficient_clusters_display() {
        let error = ExtractError::InsufficientClusters {
            found: 1,
            requested: 3,
        };
        assert_eq!(
            error.to_string(),
            "insufficient clusters: 1 non-empty, 3 dominant colors requested"
        );
    }

    #[test]
    fn test_malformed_input_display() {
        let error = ExtractError::MalformedInput {
            what: "ranked color count",
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            error.to_string(),
            "malformed input: ranked color count expected 3, got 2"
        );
    }
}
