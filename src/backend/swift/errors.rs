//! Define error types for Swift emission.
//!
//! These errors represent *backend emission* failures. The input tree is already resolved, so there are exactly two
//! ways to fail:
//!
//! - [`EmitError::Unsupported`]: the program uses a construct Swift cannot express faithfully. The program cannot
//!   target this backend.
//! - [`EmitError::Internal`]: the tree breaks a contract the resolver promises. This is a bug, not a user error.
//!
//! ## Notes
//!
//! - Errors are raised deep inside expression emission where no location is known; statement and declaration
//!   emission attach the nearest span on the way up via [`EmitError::at`].

use ciswift_ast::Span;
use thiserror::Error;

/// Error during Swift emission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("`{construct}` is not supported when targeting Swift{}", location_suffix(.span))]
    Unsupported { construct: String, span: Option<Span> },
    #[error("internal error in Swift emission: {0}")]
    Internal(String),
}

fn location_suffix(span: &Option<Span>) -> String {
    span.map(|s| format!(" (at {s})")).unwrap_or_default()
}

impl EmitError {
    pub fn unsupported(construct: impl Into<String>) -> Self {
        EmitError::Unsupported {
            construct: construct.into(),
            span: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        EmitError::Internal(message.into())
    }

    /// Attach `span` unless the error already carries a location.
    pub fn at(self, span: Option<Span>) -> Self {
        match self {
            EmitError::Unsupported { construct, span: None } => EmitError::Unsupported { construct, span },
            other => other,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, EmitError::Unsupported { .. })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, EmitError::Internal(_))
    }
}

/// Result type for Swift emission.
pub type EmitResult<T> = Result<T, EmitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display_with_location() {
        let err = EmitError::unsupported("OrderedDictionary").at(Some(Span::new(3, 7)));
        assert_eq!(
            err.to_string(),
            "`OrderedDictionary` is not supported when targeting Swift (at 3:7)"
        );
    }

    #[test]
    fn test_at_keeps_innermost_location() {
        let err = EmitError::unsupported("x")
            .at(Some(Span::new(1, 1)))
            .at(Some(Span::new(9, 9)));
        assert_eq!(
            err,
            EmitError::Unsupported {
                construct: "x".to_string(),
                span: Some(Span::new(1, 1))
            }
        );
    }

    #[test]
    fn test_kinds_are_distinct() {
        assert!(EmitError::unsupported("x").is_unsupported());
        assert!(!EmitError::unsupported("x").is_internal());
        assert!(EmitError::internal("bad").is_internal());
        assert_eq!(
            EmitError::internal("bad").to_string(),
            "internal error in Swift emission: bad"
        );
    }
}
