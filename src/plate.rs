//! License plate normalization.
//!
//! Users type plates with dashes, spaces or dots (`12-345-67`). The registry stores
//! them as bare digits, so every non-digit character is discarded before lookup.

use std::fmt;

/// Strip every character that is not an ASCII digit.
///
/// Absent or digit-free input yields an empty string; callers decide whether that
/// is an error.
pub fn normalize(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// A normalized, non-empty plate number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlateQuery(String);

impl PlateQuery {
    /// Normalize raw input, returning `None` when no digits remain.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let digits = normalize(raw);
        if digits.is_empty() {
            None
        } else {
            Some(Self(digits))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlateQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
