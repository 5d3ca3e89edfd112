//! Numeric values produced by the evaluator.
//!
//! Integers stay integers through `+ - * // %` and non-negative integer
//! powers; everything else is an IEEE-754 double. Integer overflow falls back
//! to floating point instead of wrapping.

use super::error::CalcError;
use std::cmp::Ordering;
use std::fmt;

/// The result of an evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// The value as a double, rounding integers beyond 2^53.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }

    /// The integer payload, or a type error naming the offending float.
    pub(crate) fn expect_int(self) -> Result<i64, CalcError> {
        match self {
            Self::Int(i) => Ok(i),
            Self::Float(_) => Err(CalcError::invalid(
                "'float' object cannot be interpreted as an integer",
            )),
        }
    }

    /// Convert an integral float back to an integer when it fits.
    pub(crate) fn integral(f: f64) -> Result<Number, CalcError> {
        if f.is_nan() {
            return Err(CalcError::invalid("cannot convert float NaN to integer"));
        }
        if f.is_infinite() {
            return Err(CalcError::invalid(
                "cannot convert float infinity to integer",
            ));
        }
        if f >= -9.223_372_036_854_775_808e18 && f < 9.223_372_036_854_775_808e18 {
            Ok(Self::Int(f as i64))
        } else {
            Ok(Self::Float(f))
        }
    }

    pub(crate) fn neg(self) -> Number {
        match self {
            Self::Int(i) => i.checked_neg().map_or(Self::Float(-(i as f64)), Self::Int),
            Self::Float(f) => Self::Float(-f),
        }
    }

    pub(crate) fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map_or(Self::Float(a as f64 + b as f64), Self::Int),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }

    pub(crate) fn sub(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_sub(b)
                .map_or(Self::Float(a as f64 - b as f64), Self::Int),
            (a, b) => Self::Float(a.as_f64() - b.as_f64()),
        }
    }

    pub(crate) fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_mul(b)
                .map_or(Self::Float(a as f64 * b as f64), Self::Int),
            (a, b) => Self::Float(a.as_f64() * b.as_f64()),
        }
    }

    /// True division. Always a float.
    pub(crate) fn div(self, rhs: Number) -> Result<Number, CalcError> {
        if rhs.is_zero() {
            return Err(CalcError::division("division by zero"));
        }
        Ok(Self::Float(self.as_f64() / rhs.as_f64()))
    }

    /// Floor division, rounding toward negative infinity.
    pub(crate) fn floor_div(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Self::Int(_), Self::Int(0)) => Err(CalcError::division(
                "integer division or modulo by zero",
            )),
            (Self::Int(a), Self::Int(b)) => match a.checked_div(b) {
                Some(q) if a % b != 0 && ((a < 0) != (b < 0)) => Ok(Self::Int(q - 1)),
                Some(q) => Ok(Self::Int(q)),
                None => Ok(Self::Float(-(a as f64))),
            },
            (_, b) if b.is_zero() => Err(CalcError::division("float floor division by zero")),
            (a, b) => Ok(Self::Float(float_divmod(a.as_f64(), b.as_f64()).0)),
        }
    }

    /// Modulo whose result takes the sign of the divisor.
    pub(crate) fn modulo(self, rhs: Number) -> Result<Number, CalcError> {
        match (self, rhs) {
            (Self::Int(_), Self::Int(0)) => Err(CalcError::division("integer modulo by zero")),
            (Self::Int(a), Self::Int(b)) => {
                let mut r = a.checked_rem(b).unwrap_or(0);
                if r != 0 && ((r < 0) != (b < 0)) {
                    r += b;
                }
                Ok(Self::Int(r))
            }
            (_, b) if b.is_zero() => Err(CalcError::division("float modulo by zero")),
            (a, b) => Ok(Self::Float(float_divmod(a.as_f64(), b.as_f64()).1)),
        }
    }

    /// Exponentiation, as used by both `**` and `pow(x, y)`.
    pub(crate) fn pow(self, rhs: Number) -> Result<Number, CalcError> {
        if let (Self::Int(base), Self::Int(exp)) = (self, rhs) {
            if exp >= 0 {
                if let Ok(exp) = u32::try_from(exp)
                    && let Some(value) = base.checked_pow(exp)
                {
                    return Ok(Self::Int(value));
                }
                let value = (base as f64).powf(exp as f64);
                if value.is_infinite() {
                    return Err(CalcError::invalid("integer result too large to represent"));
                }
                return Ok(Self::Float(value));
            }
        }

        let (x, y) = (self.as_f64(), rhs.as_f64());
        if x == 0.0 && y < 0.0 {
            return Err(CalcError::division(
                "0.0 cannot be raised to a negative power",
            ));
        }
        if x < 0.0 && x.is_finite() && y.is_finite() && y.fract() != 0.0 {
            return Err(CalcError::invalid(
                "negative number cannot be raised to a fractional power",
            ));
        }
        let value = x.powf(y);
        if value.is_infinite() && x.is_finite() && y.is_finite() {
            return Err(CalcError::invalid("numerical result out of range"));
        }
        Ok(Self::Float(value))
    }

    /// Ordering used by `min` and `max`. NaN compares as unordered.
    pub(crate) fn partial_cmp_value(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Render with thousands separators in the integer part.
    pub fn format_grouped(&self) -> String {
        let plain = self.to_string();
        if let Self::Float(f) = self
            && (!f.is_finite() || plain.contains('e'))
        {
            return plain;
        }

        let (sign, unsigned) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        let (int_part, frac_part) = match unsigned.find('.') {
            Some(dot) => unsigned.split_at(dot),
            None => (unsigned, ""),
        };
        format!("{}{}{}", sign, group_digits(int_part), frac_part)
    }

    /// Raw text for copying: no separators, no decoration.
    pub fn clipboard_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(value) => f.write_str(&format_float(value)),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Quotient and remainder of float division with floor semantics.
fn float_divmod(a: f64, b: f64) -> (f64, f64) {
    let mut m = a % b;
    let mut div = (a - m) / b;
    if m != 0.0 {
        if (b < 0.0) != (m < 0.0) {
            m += b;
            div -= 1.0;
        }
    } else {
        m = 0.0f64.copysign(b);
    }

    let floordiv = if div != 0.0 {
        let mut floordiv = div.floor();
        if div - floordiv > 0.5 {
            floordiv += 1.0;
        }
        floordiv
    } else {
        0.0f64.copysign(a / b)
    };
    (floordiv, m)
}

/// Shortest round-trip text, switching to scientific notation outside
/// `1e-4 <= |x| < 1e16`, with a `.0` suffix on integral values.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let positional = format!("{}", value);
    if positional.contains('.') {
        positional
    } else {
        format!("{}.0", positional)
    }
}

/// Insert a comma every three digits, counting from the right.
fn group_digits(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
