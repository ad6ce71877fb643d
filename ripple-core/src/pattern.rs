//! # Action Patterns
//!
//! An action pattern selects a set of fully-qualified action names of the
//! form `model/handler`. Both segments are compiled independently:
//!
//! | Segment | Matches |
//! |---------|---------|
//! | `addOne` | exactly `addOne` |
//! | `*` | any non-empty segment |
//! | `add*` | segments starting with `add` (including `add`) |
//! | `*Add` | segments ending with `Add` |
//! | `a*b*c` | `a`, then `b`, then `c`, in that order |
//!
//! Matching never crosses the `/` boundary: `second/*` will not match
//! `second/a/b`, and a candidate name that does not split into exactly two
//! non-empty segments matches nothing.
//!
//! # Example
//!
//! ```rust
//! use ripple_core::ActionPattern;
//!
//! let pattern: ActionPattern = "second/add*".parse().unwrap();
//! assert!(pattern.matches("second/addOne"));
//! assert!(!pattern.matches("second/subtract"));
//! ```

use crate::error::PatternError;
use std::{fmt, str::FromStr};

/// Separator between the model segment and the handler segment.
pub const SEPARATOR: char = '/';

const WILDCARD: char = '*';

/// Split a fully-qualified name into `(model, handler)`.
///
/// Returns `None` unless the name has exactly two non-empty segments.
pub fn split_name(name: &str) -> Option<(&str, &str)> {
    let mut parts = name.split(SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(model), Some(handler), None) if !model.is_empty() && !handler.is_empty() => {
            Some((model, handler))
        }
        _ => None,
    }
}

/// A compiled matcher for one segment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A bare `*`: any non-empty value.
    Any,
    /// No wildcard: the value must be equal.
    Exact(String),
    /// A literal with embedded wildcards.
    Glob {
        /// Literal the value must start with.
        prefix: String,
        /// Literals that must appear, in order, between prefix and suffix.
        inner: Vec<String>,
        /// Literal the value must end with.
        suffix: String,
    },
}

impl Segment {
    fn compile(raw: &str) -> Self {
        if !raw.contains(WILDCARD) {
            return Segment::Exact(raw.to_string());
        }

        let mut pieces: Vec<&str> = raw.split(WILDCARD).collect();
        // split on a string containing '*' always yields at least two pieces
        let suffix = pieces.pop().unwrap_or_default().to_string();
        let prefix = pieces.first().copied().unwrap_or_default().to_string();
        let inner: Vec<String> = pieces
            .iter()
            .skip(1)
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect();

        if prefix.is_empty() && suffix.is_empty() && inner.is_empty() {
            Segment::Any
        } else {
            Segment::Glob {
                prefix,
                inner,
                suffix,
            }
        }
    }

    /// Test a single segment value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Segment::Any => !value.is_empty(),
            Segment::Exact(literal) => literal == value,
            Segment::Glob {
                prefix,
                inner,
                suffix,
            } => {
                if value.len() < prefix.len() + suffix.len()
                    || !value.starts_with(prefix.as_str())
                    || !value.ends_with(suffix.as_str())
                {
                    return false;
                }
                let mut rest = &value[prefix.len()..value.len() - suffix.len()];
                for piece in inner {
                    match rest.find(piece.as_str()) {
                        Some(at) => rest = &rest[at + piece.len()..],
                        None => return false,
                    }
                }
                true
            }
        }
    }

    /// The literal value if this segment has no wildcard.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Segment::Exact(literal) => Some(literal.as_str()),
            _ => None,
        }
    }
}

/// A compiled `model/handler` pattern.
///
/// The raw string is kept for identity: two patterns are equal when their
/// raw strings are equal. Once compiled, a pattern is immutable and can be
/// matched any number of times.
#[derive(Debug, Clone)]
pub struct ActionPattern {
    raw: String,
    model: Segment,
    handler: Segment,
}

impl ActionPattern {
    /// Compile a pattern string.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let segments: Vec<&str> = raw.split(SEPARATOR).collect();
        if segments.len() != 2 {
            return Err(PatternError::SegmentCount {
                pattern: raw.to_string(),
                found: segments.len(),
            });
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PatternError::EmptySegment {
                pattern: raw.to_string(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            model: Segment::compile(segments[0]),
            handler: Segment::compile(segments[1]),
        })
    }

    /// Test a fully-qualified action name against this pattern.
    pub fn matches(&self, name: &str) -> bool {
        match split_name(name) {
            Some((model, handler)) => self.model.matches(model) && self.handler.matches(handler),
            None => false,
        }
    }

    /// Whether this pattern would match `handler` dispatched on `model`.
    pub fn matches_parts(&self, model: &str, handler: &str) -> bool {
        self.model.matches(model) && self.handler.matches(handler)
    }

    /// The raw pattern string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The compiled model segment.
    pub fn model_segment(&self) -> &Segment {
        &self.model
    }

    /// The compiled handler segment.
    pub fn handler_segment(&self) -> &Segment {
        &self.handler
    }
}

impl PartialEq for ActionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ActionPattern {}

impl std::hash::Hash for ActionPattern {
    fn hash<S: std::hash::Hasher>(&self, state: &mut S) {
        self.raw.hash(state);
    }
}

impl FromStr for ActionPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ActionPattern {
    type Error = PatternError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for ActionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
