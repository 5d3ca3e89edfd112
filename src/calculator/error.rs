//! Failure classification for expression evaluation.

use thiserror::Error;

/// Why an expression could not be evaluated.
///
/// Division by zero is kept apart from every other failure so callers can
/// tell a well-formed but undefined calculation from a broken expression.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    /// Syntax, arity, domain, range or type problems.
    #[error("{0}")]
    InvalidExpression(String),
    /// The denylist screen matched a forbidden token.
    #[error("Unsafe token detected in expression.")]
    UnsafeExpression,
    /// A zero divisor in `/`, `//`, `%` or a zero base raised to a negative power.
    #[error("{0}")]
    DivisionByZero(String),
}

impl CalcError {
    /// An invalid-expression failure with the standard `Invalid expression:` prefix.
    pub fn invalid(cause: impl std::fmt::Display) -> Self {
        Self::InvalidExpression(format!("Invalid expression: {}", cause))
    }

    /// The input could not be read as text at all.
    pub fn not_text() -> Self {
        Self::InvalidExpression("Expression must be a string.".to_string())
    }

    pub(crate) fn division(message: &str) -> Self {
        Self::DivisionByZero(message.to_string())
    }

    pub(crate) fn domain() -> Self {
        Self::invalid("math domain error")
    }

    pub(crate) fn range() -> Self {
        Self::invalid("math range error")
    }

    /// Whether a zero divisor caused the failure.
    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, Self::DivisionByZero(_))
    }

    /// Whether the denylist screen rejected the input.
    pub fn is_unsafe(&self) -> bool {
        matches!(self, Self::UnsafeExpression)
    }

    /// Whether the expression itself was malformed or undefined.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::InvalidExpression(_))
    }
}
