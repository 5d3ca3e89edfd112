//! Expression evaluation against a restricted environment.
//!
//! Input goes through three gates in order: an emptiness check, the denylist
//! screen, and the closed-grammar parser. Only then is the tree walked, with
//! every identifier resolved against the [`Environment`].

use super::environment::{Binding, Environment};
use super::error::CalcError;
use super::number::Number;
use super::parser::{self, BinaryOp, Expr, UnaryOp};
use super::screen;
use std::ffi::OsStr;
use tracing::debug;

/// An evaluator bound to one immutable environment.
#[derive(Clone, Debug)]
pub struct Calculator {
    env: Environment,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Environment::standard())
    }
}

impl Calculator {
    /// An evaluator that resolves names against `env` only.
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    /// The names expressions may reference.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Evaluate one expression. Stateless: the same input always gives the
    /// same result.
    pub fn evaluate(&self, input: &str) -> Result<Number, CalcError> {
        evaluate(&self.env, input)
    }

    /// Evaluate raw command-line input, which may not be valid text.
    pub fn evaluate_os(&self, input: &OsStr) -> Result<Number, CalcError> {
        let text = input.to_str().ok_or_else(CalcError::not_text)?;
        self.evaluate(text)
    }
}

/// Evaluate `input` against `env`.
pub fn evaluate(env: &Environment, input: &str) -> Result<Number, CalcError> {
    if input.trim().is_empty() {
        return Err(CalcError::invalid("expression is empty"));
    }
    screen::check(input)?;

    let tree = parser::parse(input)?;
    let result = eval(env, &tree);
    debug!(expression = input, ?result, "Evaluated expression");
    result
}

fn eval(env: &Environment, expr: &Expr) -> Result<Number, CalcError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Name(name) => match env.get(name) {
            Some(Binding::Constant(value)) => Ok(Number::Float(*value)),
            Some(Binding::Function(_)) => Err(CalcError::invalid(format!(
                "'{}' is a function; call it as {}(...)",
                name, name
            ))),
            None => Err(undefined(name)),
        },
        Expr::Unary { op, operand } => {
            let value = eval(env, operand)?;
            Ok(match op {
                UnaryOp::Plus => value,
                UnaryOp::Minus => value.neg(),
            })
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(env, lhs)?;
            let rhs = eval(env, rhs)?;
            match op {
                BinaryOp::Add => Ok(lhs.add(rhs)),
                BinaryOp::Sub => Ok(lhs.sub(rhs)),
                BinaryOp::Mul => Ok(lhs.mul(rhs)),
                BinaryOp::Div => lhs.div(rhs),
                BinaryOp::FloorDiv => lhs.floor_div(rhs),
                BinaryOp::Mod => lhs.modulo(rhs),
                BinaryOp::Pow => lhs.pow(rhs),
            }
        }
        Expr::Call { name, args } => {
            let function = match env.get(name) {
                Some(Binding::Function(function)) => function,
                Some(Binding::Constant(_)) => {
                    return Err(CalcError::invalid(format!("'{}' is not callable", name)));
                }
                None => return Err(undefined(name)),
            };
            let args = args
                .iter()
                .map(|arg| eval(env, arg))
                .collect::<Result<Vec<_>, _>>()?;
            function.call(&args)
        }
    }
}

fn undefined(name: &str) -> CalcError {
    CalcError::invalid(format!("name '{}' is not defined", name))
}
