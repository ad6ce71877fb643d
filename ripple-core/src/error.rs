//! Error types for Ripple.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RippleError`] - Top-level error type for all Ripple operations
//! - [`PatternError`] - A pattern string does not follow the `model/handler` grammar
//! - [`RegistrationError`] - A model's subscription declarations were rejected

use thiserror::Error;

/// A boxed error type for handler and host failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Ripple operations.
#[derive(Error, Debug)]
pub enum RippleError {
    /// A pattern could not be compiled.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// A model's subscriptions could not be installed.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// A handler or host failure.
    #[error(transparent)]
    Custom(BoxError),
}

/// A pattern string that does not split into exactly two non-empty segments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern does not have exactly two `/`-separated segments.
    #[error("pattern `{pattern}` must have exactly two segments separated by `/`, found {found}")]
    SegmentCount {
        /// The offending pattern.
        pattern: String,
        /// Number of segments found.
        found: usize,
    },

    /// One of the two segments is empty.
    #[error("pattern `{pattern}` has an empty segment")]
    EmptySegment {
        /// The offending pattern.
        pattern: String,
    },
}

impl PatternError {
    /// The raw pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        match self {
            PatternError::SegmentCount { pattern, .. } | PatternError::EmptySegment { pattern } => {
                pattern
            }
        }
    }
}

/// Errors raised while installing a model's subscriptions.
///
/// Any of these aborts the whole declaration set for that model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The subscription key is not a valid action pattern.
    #[error("invalid subscription `{pattern}` in model `{model}`: {source}")]
    MalformedPattern {
        /// Owning model.
        model: String,
        /// Raw pattern as declared.
        pattern: String,
        /// Why the pattern failed to compile.
        #[source]
        source: PatternError,
    },

    /// The value declared under a subscription key cannot be invoked.
    #[error("subscription `{pattern}` in model `{model}` must be a handler, found {found}")]
    InvalidHandlerType {
        /// Owning model.
        model: String,
        /// Raw pattern as declared.
        pattern: String,
        /// Description of the value that was found instead.
        found: String,
    },

    /// The pattern resolves to one of the model's own handlers.
    #[error(
        "subscription `{pattern}` in model `{model}` shadows its own handler `{model}/{handler}`"
    )]
    SubscriptionCollision {
        /// Owning model.
        model: String,
        /// Raw pattern as declared.
        pattern: String,
        /// The shadowed handler name.
        handler: String,
    },

    /// The same pattern was declared twice for one model.
    #[error("model `{model}` declares subscription `{pattern}` more than once")]
    DuplicateSubscription {
        /// Owning model.
        model: String,
        /// Raw pattern as declared.
        pattern: String,
    },

    /// The pattern names a model that has not been registered.
    #[error("subscription `{pattern}` in model `{model}` targets unknown model `{target}`")]
    UnknownTarget {
        /// Owning model.
        model: String,
        /// Raw pattern as declared.
        pattern: String,
        /// The unknown model segment.
        target: String,
    },
}

impl RegistrationError {
    /// The model whose declarations were rejected.
    pub fn model(&self) -> &str {
        match self {
            RegistrationError::MalformedPattern { model, .. }
            | RegistrationError::InvalidHandlerType { model, .. }
            | RegistrationError::SubscriptionCollision { model, .. }
            | RegistrationError::DuplicateSubscription { model, .. }
            | RegistrationError::UnknownTarget { model, .. } => model,
        }
    }

    /// The declared pattern that caused the rejection.
    pub fn pattern(&self) -> &str {
        match self {
            RegistrationError::MalformedPattern { pattern, .. }
            | RegistrationError::InvalidHandlerType { pattern, .. }
            | RegistrationError::SubscriptionCollision { pattern, .. }
            | RegistrationError::DuplicateSubscription { pattern, .. }
            | RegistrationError::UnknownTarget { pattern, .. } => pattern,
        }
    }
}

// Convenience conversions
impl From<BoxError> for RippleError {
    fn from(err: BoxError) -> Self {
        RippleError::Custom(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_accessors() {
        let err = RegistrationError::SubscriptionCollision {
            model: "first".into(),
            pattern: "*/addOne".into(),
            handler: "addOne".into(),
        };
        assert_eq!(err.model(), "first");
        assert_eq!(err.pattern(), "*/addOne");
        assert_eq!(
            err.to_string(),
            "subscription `*/addOne` in model `first` shadows its own handler `first/addOne`"
        );
    }

    #[test]
    fn test_malformed_pattern_keeps_source() {
        use std::error::Error as _;

        let err = RegistrationError::MalformedPattern {
            model: "first".into(),
            pattern: "a/b/c".into(),
            source: PatternError::SegmentCount {
                pattern: "a/b/c".into(),
                found: 3,
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("found 3"));
    }

    #[test]
    fn test_ripple_error_conversions() {
        let err: RippleError = PatternError::EmptySegment {
            pattern: "/x".into(),
        }
        .into();
        assert!(matches!(err, RippleError::Pattern(_)));

        let boxed: BoxError = "handler failed".into();
        let err: RippleError = boxed.into();
        assert_eq!(err.to_string(), "handler failed");
    }
}
