//! Non-fatal warning types.
//!
//! Unsupported constructs and best-effort fallbacks are surfaced as warnings
//! collected alongside the parse result; fatal conditions use the parser
//! crate's error type instead.

use std::fmt;

/// Machine-readable warning category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningCode {
    /// A recognized but unimplemented construct was skipped.
    UnsupportedFeature,
    /// A best-effort default was substituted during decoding.
    DecodeFallback,
    /// Marked-content pushes and pops did not balance by stream end.
    UnbalancedMarkedContent,
    /// Any other warning.
    Other(String),
}

impl WarningCode {
    /// The string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            WarningCode::UnsupportedFeature => "UNSUPPORTED_FEATURE",
            WarningCode::DecodeFallback => "DECODE_FALLBACK",
            WarningCode::UnbalancedMarkedContent => "UNBALANCED_MARKED_CONTENT",
            WarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal condition encountered during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    /// Machine-readable code.
    pub code: WarningCode,
    /// Human-readable description.
    pub description: String,
    /// Index of the operator being interpreted, if applicable.
    pub operator_index: Option<usize>,
    /// Font resource name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl Warning {
    /// Create a warning with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            code: WarningCode::Other(description.clone()),
            description,
            operator_index: None,
            font_name: None,
        }
    }

    /// Create a warning with a specific code.
    pub fn with_code(code: WarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            operator_index: None,
            font_name: None,
        }
    }

    /// Attach the index of the operator being interpreted.
    pub fn at_operator(mut self, index: usize) -> Self {
        self.operator_index = Some(index);
        self
    }

    /// Attach the font resource name in scope.
    pub fn for_font(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(index) = self.operator_index {
            write!(f, " (operator {index})")?;
        }
        if let Some(font) = &self.font_name {
            write!(f, " (font {font})")?;
        }
        Ok(())
    }
}

/// A parse result paired with the warnings collected while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome<T> {
    /// The produced value.
    pub value: T,
    /// Warnings, in the order they were recorded.
    pub warnings: Vec<Warning>,
}

impl<T> ParseOutcome<T> {
    /// A result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// A result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    /// True when no warnings were recorded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        ParseOutcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_includes_code_and_context() {
        let warning = Warning::with_code(WarningCode::UnsupportedFeature, "bfrange skipped")
            .at_operator(7)
            .for_font("F1");
        let text = warning.to_string();
        assert!(text.contains("UNSUPPORTED_FEATURE"));
        assert!(text.contains("bfrange skipped"));
        assert!(text.contains("operator 7"));
        assert!(text.contains("font F1"));
    }

    #[test]
    fn plain_warning_uses_other_code() {
        let warning = Warning::new("something odd");
        assert_eq!(warning.code.as_str(), "OTHER");
    }

    #[test]
    fn outcome_map_keeps_warnings() {
        let outcome = ParseOutcome::with_warnings(2, vec![Warning::new("w")]);
        let mapped = outcome.map(|v| v * 2);
        assert_eq!(mapped.value, 4);
        assert_eq!(mapped.warnings.len(), 1);
        assert!(!mapped.is_clean());
    }

    #[test]
    fn ok_outcome_is_clean() {
        assert!(ParseOutcome::ok(()).is_clean());
    }
}
