//! Denylist screen applied before parsing.
//!
//! A conservative substring check: any forbidden token anywhere in the input
//! rejects it, whatever its context. The closed grammar in [`super::parser`]
//! is what actually keeps capabilities out of reach; this screen only keeps
//! the historical rejections stable.

use super::error::CalcError;
use lazy_static::lazy_static;
use regex::Regex;

/// Tokens that name dangerous capabilities.
pub const FORBIDDEN_TOKENS: &[&str] = &[
    "__",
    "import",
    "os.",
    "sys.",
    "subprocess",
    "open(",
    "eval(",
    "exec(",
];

lazy_static! {
    /// Case-insensitive alternation of every forbidden token.
    static ref FORBIDDEN: Regex = {
        let alternation = FORBIDDEN_TOKENS
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i){}", alternation)).unwrap()
    };
}

/// Return the first forbidden token found in `input`, if any.
pub fn find_forbidden(input: &str) -> Option<&str> {
    FORBIDDEN.find(input).map(|m| m.as_str())
}

/// Reject `input` if it contains any forbidden token.
pub fn check(input: &str) -> Result<(), CalcError> {
    match find_forbidden(input) {
        Some(token) => {
            tracing::debug!(token, "Expression rejected by denylist");
            Err(CalcError::UnsafeExpression)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_tokens_rejected() {
        assert_eq!(check("__import__('os')"), Err(CalcError::UnsafeExpression));
        assert_eq!(check("open('x')"), Err(CalcError::UnsafeExpression));
        assert_eq!(check("os.system('ls')"), Err(CalcError::UnsafeExpression));
        assert_eq!(check("exec('1')"), Err(CalcError::UnsafeExpression));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(check("IMPORT"), Err(CalcError::UnsafeExpression));
        assert_eq!(check("Eval(1)"), Err(CalcError::UnsafeExpression));
        assert_eq!(find_forbidden("1 + SubProcess"), Some("SubProcess"));
    }

    #[test]
    fn test_context_is_ignored() {
        // A forbidden word inside what would be a string literal still counts.
        assert_eq!(check("len('import')"), Err(CalcError::UnsafeExpression));
    }

    #[test]
    fn test_plain_math_passes() {
        assert_eq!(check("2 + 2"), Ok(()));
        assert_eq!(check("sin(pi/2) + cos(0)"), Ok(()));
        assert_eq!(check("cos(0)"), Ok(()));
        assert_eq!(find_forbidden("log(100, 10)"), None);
    }
}
