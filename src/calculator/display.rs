//! What the calculator shows after each command.

use serde::Serialize;

/// Text shown on an error result.
pub const ERROR_TEXT: &str = "Error";

/// A snapshot of the two display lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Display {
    /// The pending expression, e.g. `"3 + "`. Empty when nothing is pending.
    pub expression: String,
    /// The result if one is shown, otherwise the current input, otherwise `"0"`.
    pub primary: String,
    /// Whether `primary` is the error sentinel.
    pub is_error: bool,
}

impl Display {
    pub(crate) fn error(expression: String) -> Self {
        Self {
            expression,
            primary: ERROR_TEXT.to_string(),
            is_error: true,
        }
    }

    pub(crate) fn value(expression: String, primary: String) -> Self {
        let primary = if primary.is_empty() {
            "0".to_string()
        } else {
            primary
        };
        Self {
            expression,
            primary,
            is_error: false,
        }
    }
}

impl std::fmt::Display for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.expression.is_empty() {
            writeln!(f, "{}", self.expression)?;
        }
        write!(f, "{}", self.primary)
    }
}
