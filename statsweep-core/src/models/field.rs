//! Field configuration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A metric field name plus the JSON path used to read it from a detail document.
///
/// Paths are dot-separated. `#` maps the rest of the path over an array,
/// digits index into an array, and `\.` escapes a literal dot in a key.
///
/// ```
/// use statsweep_core::FieldSpec;
///
/// let spec = FieldSpec::new("viewCount", "items.#.statistics.viewCount");
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Name of the field in emitted metrics.
    pub name: String,
    /// JSON path into the detail document.
    pub path: String,
}

impl FieldSpec {
    /// Creates a new field spec.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Validates the spec.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFieldSpec` if the name or path is empty,
    /// or if the path contains an empty segment (e.g. `a..b`).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name is empty"));
        }
        if self.path.is_empty() {
            return Err(self.invalid("path is empty"));
        }
        if has_empty_segment(&self.path) {
            return Err(self.invalid("path contains an empty segment"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> CoreError {
        CoreError::InvalidFieldSpec {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Returns true if splitting `path` on unescaped dots yields an empty segment.
///
/// `\.` is part of a key, so `a\..b` splits into `a.` and `b`.
fn has_empty_segment(path: &str) -> bool {
    let mut segment_len = 0usize;
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                chars.next();
                segment_len += 1;
            }
            '.' => {
                if segment_len == 0 {
                    return true;
                }
                segment_len = 0;
            }
            _ => segment_len += 1,
        }
    }
    segment_len == 0
}
