//! Calculator module for evaluating mathematical expressions.
//!
//! This module provides functionality to:
//! - Screen input against a denylist of dangerous tokens
//! - Parse expressions with a closed arithmetic grammar
//! - Evaluate them against an immutable table of math constants and functions
//! - Format and copy results

mod clipboard;
mod environment;
mod error;
mod evaluation;
mod lexer;
mod number;
mod parser;
mod screen;

pub use clipboard::copy_to_clipboard;
pub use environment::{Arity, Binding, Environment, Function, NativeFn};
pub use error::CalcError;
pub use evaluation::{Calculator, evaluate};
pub use number::Number;
pub use screen::{FORBIDDEN_TOKENS, find_forbidden};
