//! Core domain types for the enrichment run.

use std::fmt;

/// Text printed in place of a score when the badge is missing from a page.
pub const NOT_FOUND_SENTINEL: &str = "string not found";

// ---------------------------------------------------------------------------
// InputRecord
// ---------------------------------------------------------------------------

/// One row of the input table: `label,unused,region_code,locality_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Caller-supplied identifier, echoed into the output.
    pub label: String,
    /// Second column; carried through loading but never used.
    pub unused: String,
    /// State or region code, first URL path segment.
    pub region_code: String,
    /// City name, second URL path segment.
    pub locality_name: String,
}

impl InputRecord {
    /// Build a record from its four columns in file order.
    pub fn new(
        label: impl Into<String>,
        unused: impl Into<String>,
        region_code: impl Into<String>,
        locality_name: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            unused: unused.into(),
            region_code: region_code.into(),
            locality_name: locality_name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Walkability score pulled out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Score {
    /// Decimal digits taken from the badge URL (e.g. `"87"`).
    Value(String),
    /// No badge on the page.
    NotFound,
}

impl Score {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Text written into the output column.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(digits) => digits,
            Self::NotFound => NOT_FOUND_SENTINEL,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OutputRecord
// ---------------------------------------------------------------------------

/// One row of the result table: `label,region_code,locality_name,score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub label: String,
    pub region_code: String,
    pub locality_name: String,
    pub score: Score,
}

impl OutputRecord {
    /// Combine an input row with the score found for it.
    pub fn from_input(input: &InputRecord, score: Score) -> Self {
        Self {
            label: input.label.clone(),
            region_code: input.region_code.clone(),
            locality_name: input.locality_name.clone(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_display() {
        assert_eq!(Score::Value("87".into()).to_string(), "87");
        assert_eq!(Score::NotFound.to_string(), "string not found");
        assert!(Score::Value("0".into()).is_found());
        assert!(!Score::NotFound.is_found());
    }

    #[test]
    fn output_drops_unused_column() {
        let input = InputRecord::new("A", "x", "WA", "Seattle");
        let out = OutputRecord::from_input(&input, Score::Value("73".into()));
        assert_eq!(out.label, "A");
        assert_eq!(out.region_code, "WA");
        assert_eq!(out.locality_name, "Seattle");
        assert_eq!(out.score.as_str(), "73");
    }
}
