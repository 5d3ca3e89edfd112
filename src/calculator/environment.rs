//! The fixed table of names an expression may reference.
//!
//! Built once with [`Environment::standard`] and passed to the evaluator by
//! reference. Every entry is a pure numeric constant or function.

use super::error::CalcError;
use super::number::Number;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::f64::consts::{E, PI, TAU};

pub type NativeFn = fn(&[Number]) -> Result<Number, CalcError>;

/// How many arguments a function accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    /// Whether a call with `count` arguments is allowed.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Between(lo, hi) => (lo..=hi).contains(&count),
            Self::AtLeast(n) => count >= n,
        }
    }

    fn mismatch(self, name: &str, given: usize) -> CalcError {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        CalcError::invalid(match self {
            Self::Exact(n) => format!(
                "{}() takes exactly {} {} ({} given)",
                name,
                n,
                plural(n),
                given
            ),
            Self::Between(lo, hi) => {
                format!("{} expected {} to {} arguments, got {}", name, lo, hi, given)
            }
            Self::AtLeast(n) => format!(
                "{} expected at least {} {}, got {}",
                name,
                n,
                plural(n),
                given
            ),
        })
    }
}

/// Renders as `1`, `1-2` or `0+`.
impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{}", n),
            Self::Between(lo, hi) => write!(f, "{}-{}", lo, hi),
            Self::AtLeast(n) => write!(f, "{}+", n),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Kernel {
    /// Float function of one argument, with the inputs it is defined for.
    Real {
        f: fn(f64) -> f64,
        domain: fn(f64) -> bool,
    },
    /// Float function of two arguments.
    Real2(fn(f64, f64) -> f64),
    Native(NativeFn),
}

/// A callable entry in the environment.
#[derive(Clone, Copy, Debug)]
pub struct Function {
    name: &'static str,
    arity: Arity,
    kernel: Kernel,
}

impl Function {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Check the argument count, then apply the function. Float kernels turn
    /// a NaN result into a domain error and an overflow into a range error.
    pub fn call(&self, args: &[Number]) -> Result<Number, CalcError> {
        if !self.arity.accepts(args.len()) {
            return Err(self.arity.mismatch(self.name, args.len()));
        }

        match self.kernel {
            Kernel::Real { f, domain } => {
                let x = args[0].as_f64();
                if x.is_nan() {
                    return Ok(Number::Float(x));
                }
                if !domain(x) {
                    return Err(CalcError::domain());
                }
                checked_real(f(x), &[x])
            }
            Kernel::Real2(f) => {
                let (x, y) = (args[0].as_f64(), args[1].as_f64());
                checked_real(f(x, y), &[x, y])
            }
            Kernel::Native(f) => f(args),
        }
    }
}

/// Turn NaN from non-NaN inputs into a domain error and infinity from finite
/// inputs into a range error.
fn checked_real(value: f64, inputs: &[f64]) -> Result<Number, CalcError> {
    if value.is_nan() && !inputs.iter().any(|x| x.is_nan()) {
        return Err(CalcError::domain());
    }
    if value.is_infinite() && inputs.iter().all(|x| x.is_finite()) {
        return Err(CalcError::range());
    }
    Ok(Number::Float(value))
}

/// A name an expression may reference.
#[derive(Clone, Copy, Debug)]
pub enum Binding {
    Constant(f64),
    Function(Function),
}

/// Immutable mapping from identifier to constant or function.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    bindings: BTreeMap<&'static str, Binding>,
}

impl Environment {
    /// An environment with no names at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Math-library constants and functions plus `abs`, `round`, `min`,
    /// `max` and `pow`.
    pub fn standard() -> Self {
        let mut env = Self::empty();

        env.constant("pi", PI);
        env.constant("e", E);
        env.constant("tau", TAU);
        env.constant("inf", f64::INFINITY);
        env.constant("nan", f64::NAN);

        env.real("sin", f64::sin);
        env.real("cos", f64::cos);
        env.real("tan", f64::tan);
        env.real_on("asin", f64::asin, |x| (-1.0..=1.0).contains(&x));
        env.real_on("acos", f64::acos, |x| (-1.0..=1.0).contains(&x));
        env.real("atan", f64::atan);
        env.real("sinh", f64::sinh);
        env.real("cosh", f64::cosh);
        env.real("tanh", f64::tanh);
        env.real("asinh", f64::asinh);
        env.real_on("acosh", f64::acosh, |x| x >= 1.0);
        env.real_on("atanh", f64::atanh, |x| x > -1.0 && x < 1.0);
        env.real("exp", f64::exp);
        env.real("exp2", f64::exp2);
        env.real("expm1", f64::exp_m1);
        env.real_on("log2", f64::log2, |x| x > 0.0);
        env.real_on("log10", f64::log10, |x| x > 0.0);
        env.real_on("log1p", f64::ln_1p, |x| x > -1.0);
        env.real_on("sqrt", f64::sqrt, |x| x >= 0.0);
        env.real("cbrt", f64::cbrt);
        env.real("fabs", f64::abs);
        env.real("degrees", f64::to_degrees);
        env.real("radians", f64::to_radians);
        env.real("erf", libm::erf);
        env.real("erfc", libm::erfc);
        env.real_on("gamma", libm::tgamma, not_a_pole);
        env.real_on("lgamma", libm::lgamma, not_a_pole);
        env.real("ulp", ulp);

        env.real2("atan2", f64::atan2);
        env.real2("copysign", f64::copysign);
        env.real2("fmod", libm::fmod);
        env.real2("remainder", libm::remainder);
        env.real2("nextafter", libm::nextafter);

        env.native("log", Arity::Between(1, 2), log);
        env.native("floor", Arity::Exact(1), |args| to_integral(args[0], f64::floor));
        env.native("ceil", Arity::Exact(1), |args| to_integral(args[0], f64::ceil));
        env.native("trunc", Arity::Exact(1), |args| to_integral(args[0], f64::trunc));
        env.native("factorial", Arity::Exact(1), factorial);
        env.native("isqrt", Arity::Exact(1), isqrt);
        env.native("comb", Arity::Exact(2), comb);
        env.native("perm", Arity::Between(1, 2), perm);
        env.native("gcd", Arity::AtLeast(0), gcd);
        env.native("lcm", Arity::AtLeast(0), lcm);
        env.native("hypot", Arity::AtLeast(0), hypot);
        env.native("ldexp", Arity::Exact(2), ldexp);

        env.native("abs", Arity::Exact(1), abs);
        env.native("round", Arity::Between(1, 2), round);
        env.native("min", Arity::AtLeast(1), |args| extreme(args, Ordering::Less));
        env.native("max", Arity::AtLeast(1), |args| extreme(args, Ordering::Greater));
        env.native("pow", Arity::Between(2, 3), pow);

        env
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn constant(&mut self, name: &'static str, value: f64) {
        self.bindings.insert(name, Binding::Constant(value));
    }

    fn real(&mut self, name: &'static str, f: fn(f64) -> f64) {
        self.real_on(name, f, |_| true);
    }

    fn real_on(&mut self, name: &'static str, f: fn(f64) -> f64, domain: fn(f64) -> bool) {
        self.insert_function(name, Arity::Exact(1), Kernel::Real { f, domain });
    }

    fn real2(&mut self, name: &'static str, f: fn(f64, f64) -> f64) {
        self.insert_function(name, Arity::Exact(2), Kernel::Real2(f));
    }

    fn native(&mut self, name: &'static str, arity: Arity, f: NativeFn) {
        self.insert_function(name, arity, Kernel::Native(f));
    }

    fn insert_function(&mut self, name: &'static str, arity: Arity, kernel: Kernel) {
        self.bindings
            .insert(name, Binding::Function(Function { name, arity, kernel }));
    }
}

fn not_a_pole(x: f64) -> bool {
    !(x <= 0.0 && x.fract() == 0.0)
}

/// Gap between `|x|` and the next float away from zero. The largest finite
/// float measures the gap below it instead.
fn ulp(x: f64) -> f64 {
    let x = x.abs();
    if x.is_infinite() {
        return x;
    }
    if x == f64::MAX {
        return x - libm::nextafter(x, 0.0);
    }
    libm::nextafter(x, f64::INFINITY) - x
}

fn log(args: &[Number]) -> Result<Number, CalcError> {
    let ln = |n: Number| {
        let x = n.as_f64();
        if x.is_nan() {
            Ok(x)
        } else if x <= 0.0 {
            Err(CalcError::domain())
        } else {
            Ok(x.ln())
        }
    };

    let value = ln(args[0])?;
    let Some(&base) = args.get(1) else {
        return Ok(Number::Float(value));
    };
    let base = ln(base)?;
    if base == 0.0 {
        return Err(CalcError::division("float division by zero"));
    }
    Ok(Number::Float(value / base))
}

fn to_integral(x: Number, f: fn(f64) -> f64) -> Result<Number, CalcError> {
    match x {
        Number::Int(_) => Ok(x),
        Number::Float(value) => Number::integral(f(value)),
    }
}

fn non_negative(value: Number, what: &str) -> Result<i64, CalcError> {
    let n = value.expect_int()?;
    if n < 0 {
        return Err(CalcError::invalid(format!(
            "{} must be a non-negative integer",
            what
        )));
    }
    Ok(n)
}

/// Multiply `factors` exactly while it fits, then in floating point.
fn product(factors: impl Iterator<Item = i64>, what: &str) -> Result<Number, CalcError> {
    let mut exact: Option<i64> = Some(1);
    let mut approx = 1.0f64;
    for k in factors {
        exact = exact.and_then(|acc| acc.checked_mul(k));
        approx *= k as f64;
        if exact.is_none() && approx.is_infinite() {
            return Err(CalcError::invalid(format!(
                "{} result too large to represent",
                what
            )));
        }
    }
    Ok(exact.map_or(Number::Float(approx), Number::Int))
}

fn factorial(args: &[Number]) -> Result<Number, CalcError> {
    let n = args[0].expect_int()?;
    if n < 0 {
        return Err(CalcError::invalid(
            "factorial() not defined for negative values",
        ));
    }
    product(2..=n, "factorial()")
}

fn perm(args: &[Number]) -> Result<Number, CalcError> {
    let n = non_negative(args[0], "n")?;
    let k = match args.get(1) {
        Some(&k) => non_negative(k, "k")?,
        None => n,
    };
    if k > n {
        return Ok(Number::Int(0));
    }
    product((n - k + 1)..=n, "perm()")
}

fn comb(args: &[Number]) -> Result<Number, CalcError> {
    let n = non_negative(args[0], "n")?;
    let k = non_negative(args[1], "k")?;
    if k > n {
        return Ok(Number::Int(0));
    }
    let k = k.min(n - k);

    let mut exact: Option<i128> = Some(1);
    let mut approx = 1.0f64;
    for i in 0..k {
        let (numerator, denominator) = ((n - i) as i128, (i + 1) as i128);
        // Each partial product is itself a binomial coefficient, so the
        // division is exact.
        exact = exact
            .and_then(|acc| acc.checked_mul(numerator))
            .map(|acc| acc / denominator);
        approx = approx * numerator as f64 / denominator as f64;
        if exact.is_none() && approx.is_infinite() {
            return Err(CalcError::invalid("comb() result too large to represent"));
        }
    }
    Ok(match exact.and_then(|value| i64::try_from(value).ok()) {
        Some(value) => Number::Int(value),
        None => Number::Float(approx),
    })
}

fn isqrt(args: &[Number]) -> Result<Number, CalcError> {
    let n = args[0].expect_int()?;
    if n < 0 {
        return Err(CalcError::invalid("isqrt() argument must be nonnegative"));
    }
    let n = n as i128;
    let mut root = (n as f64).sqrt() as i128;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    Ok(Number::Int(root as i64))
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn unsigned_to_number(value: u64) -> Number {
    i64::try_from(value).map_or(Number::Float(value as f64), Number::Int)
}

fn gcd(args: &[Number]) -> Result<Number, CalcError> {
    let mut acc = 0u64;
    for &arg in args {
        acc = gcd_u64(acc, arg.expect_int()?.unsigned_abs());
    }
    Ok(unsigned_to_number(acc))
}

fn lcm(args: &[Number]) -> Result<Number, CalcError> {
    let mut acc = 1u64;
    for &arg in args {
        let value = arg.expect_int()?.unsigned_abs();
        if value == 0 || acc == 0 {
            acc = 0;
            continue;
        }
        acc = (acc / gcd_u64(acc, value))
            .checked_mul(value)
            .ok_or_else(|| CalcError::invalid("lcm() result too large to represent"))?;
    }
    Ok(unsigned_to_number(acc))
}

fn hypot(args: &[Number]) -> Result<Number, CalcError> {
    let inputs: Vec<f64> = args.iter().map(|n| n.as_f64()).collect();
    if inputs.iter().any(|x| x.is_infinite()) {
        return Ok(Number::Float(f64::INFINITY));
    }
    let value = inputs.iter().fold(0.0f64, |acc, &x| acc.hypot(x));
    checked_real(value, &inputs)
}

fn ldexp(args: &[Number]) -> Result<Number, CalcError> {
    let x = args[0].as_f64();
    let exponent = args[1].expect_int()?.clamp(i32::MIN.into(), i32::MAX.into()) as i32;
    checked_real(libm::scalbn(x, exponent), &[x])
}

fn abs(args: &[Number]) -> Result<Number, CalcError> {
    Ok(match args[0] {
        Number::Int(i) => i.checked_abs().map_or(Number::Float((i as f64).abs()), Number::Int),
        Number::Float(f) => Number::Float(f.abs()),
    })
}

/// `min` when `want` is `Less`, `max` when it is `Greater`. Keeps the first
/// of equal values.
fn extreme(args: &[Number], want: Ordering) -> Result<Number, CalcError> {
    let mut best = args[0];
    for &candidate in &args[1..] {
        if candidate.partial_cmp_value(best) == Some(want) {
            best = candidate;
        }
    }
    Ok(best)
}

fn round(args: &[Number]) -> Result<Number, CalcError> {
    let Some(&digits) = args.get(1) else {
        return match args[0] {
            Number::Int(_) => Ok(args[0]),
            Number::Float(f) => Number::integral(f.round_ties_even()),
        };
    };

    let digits = digits.expect_int()?;
    match args[0] {
        Number::Int(i) if digits >= 0 => Ok(Number::Int(i)),
        Number::Int(i) => Ok(round_int(i, digits.unsigned_abs())),
        Number::Float(f) => Ok(Number::Float(round_float(f, digits))),
    }
}

fn round_int(value: i64, digits: u64) -> Number {
    let Some(scale) = u32::try_from(digits).ok().and_then(|d| 10i64.checked_pow(d)) else {
        return Number::Int(0);
    };
    let (quotient, rest) = (value.div_euclid(scale), value.rem_euclid(scale));
    let rounds_up = match (2 * rest as i128).cmp(&(scale as i128)) {
        Ordering::Greater => true,
        Ordering::Equal => quotient % 2 != 0,
        Ordering::Less => false,
    };
    let quotient = if rounds_up { quotient + 1 } else { quotient };
    quotient
        .checked_mul(scale)
        .map_or(Number::Float(quotient as f64 * scale as f64), Number::Int)
}

fn round_float(value: f64, digits: i64) -> f64 {
    if !value.is_finite() || digits > 308 {
        return value;
    }
    if digits < -308 {
        return 0.0f64.copysign(value);
    }
    let digits = digits as i32;
    if digits >= 0 {
        let scale = 10f64.powi(digits);
        let scaled = value * scale;
        if scaled.is_infinite() {
            return value;
        }
        scaled.round_ties_even() / scale
    } else {
        let scale = 10f64.powi(-digits);
        (value / scale).round_ties_even() * scale
    }
}

fn pow(args: &[Number]) -> Result<Number, CalcError> {
    match *args {
        [base, exponent] => base.pow(exponent),
        [base, exponent, modulus] => modular_pow(
            base.expect_int()?,
            exponent.expect_int()?,
            modulus.expect_int()?,
        ),
        _ => unreachable!("arity checked by caller"),
    }
}

fn modular_pow(base: i64, exponent: i64, modulus: i64) -> Result<Number, CalcError> {
    if modulus == 0 {
        return Err(CalcError::invalid("pow() 3rd argument cannot be 0"));
    }
    let m = (modulus as i128).abs();
    let mut base = (base as i128).rem_euclid(m);
    if exponent < 0 {
        base = modular_inverse(base, m).ok_or_else(|| {
            CalcError::invalid("base is not invertible for the given modulus")
        })?;
    }

    let mut exponent = exponent.unsigned_abs();
    let mut result: i128 = 1 % m;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exponent >>= 1;
    }
    // The result takes the sign of the modulus.
    if modulus < 0 && result != 0 {
        result -= m;
    }
    Ok(Number::Int(result as i64))
}

fn modular_inverse(value: i128, modulus: i128) -> Option<i128> {
    let (mut old_r, mut r) = (value, modulus);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    (old_r == 1).then(|| old_s.rem_euclid(modulus))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Number]) -> Result<Number, CalcError> {
        match Environment::standard().get(name) {
            Some(Binding::Function(f)) => f.call(args),
            other => panic!("{name} is not a function: {other:?}"),
        }
    }

    #[test]
    fn test_constants_present() {
        let env = Environment::standard();
        for name in ["pi", "e", "tau", "inf", "nan"] {
            assert!(matches!(env.get(name), Some(Binding::Constant(_))), "{name}");
        }
        assert!(!env.contains("globals"));
        assert!(!env.contains("open"));
    }

    #[test]
    fn test_arity_errors() {
        let err = call("sqrt", &[Number::Int(1), Number::Int(2)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid expression: sqrt() takes exactly 1 argument (2 given)"
        );
        assert!(call("max", &[]).unwrap_err().is_invalid());
        assert!(call("log", &[Number::Int(1), Number::Int(2), Number::Int(3)])
            .unwrap_err()
            .is_invalid());
    }

    #[test]
    fn test_domain_and_range() {
        assert_eq!(
            call("sqrt", &[Number::Int(-1)]).unwrap_err().to_string(),
            "Invalid expression: math domain error"
        );
        assert_eq!(
            call("exp", &[Number::Int(1000)]).unwrap_err().to_string(),
            "Invalid expression: math range error"
        );
        assert!(call("log", &[Number::Int(0)]).unwrap_err().is_invalid());
        assert!(call("fmod", &[Number::Int(1), Number::Int(0)]).unwrap_err().is_invalid());
        assert!(call("gamma", &[Number::Int(0)]).unwrap_err().is_invalid());
    }

    #[test]
    fn test_log_with_base() {
        let value = call("log", &[Number::Int(100), Number::Int(10)]).unwrap();
        assert!((value.as_f64() - 2.0).abs() < 1e-12);
        let err = call("log", &[Number::Int(100), Number::Int(1)]).unwrap_err();
        assert!(err.is_division_by_zero());
    }

    #[test]
    fn test_integer_functions() {
        assert_eq!(call("factorial", &[Number::Int(5)]), Ok(Number::Int(120)));
        assert!(matches!(
            call("factorial", &[Number::Int(25)]),
            Ok(Number::Float(_))
        ));
        assert!(call("factorial", &[Number::Int(1000)]).unwrap_err().is_invalid());
        assert!(call("factorial", &[Number::Float(2.5)]).unwrap_err().is_invalid());
        assert_eq!(call("isqrt", &[Number::Int(17)]), Ok(Number::Int(4)));
        assert_eq!(call("comb", &[Number::Int(5), Number::Int(2)]), Ok(Number::Int(10)));
        assert_eq!(call("perm", &[Number::Int(5), Number::Int(2)]), Ok(Number::Int(20)));
        assert_eq!(call("perm", &[Number::Int(4)]), Ok(Number::Int(24)));
        assert_eq!(
            call("gcd", &[Number::Int(12), Number::Int(-18)]),
            Ok(Number::Int(6))
        );
        assert_eq!(call("gcd", &[]), Ok(Number::Int(0)));
        assert_eq!(call("lcm", &[Number::Int(4), Number::Int(6)]), Ok(Number::Int(12)));
        assert_eq!(call("lcm", &[]), Ok(Number::Int(1)));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(call("round", &[Number::Float(2.5)]), Ok(Number::Int(2)));
        assert_eq!(call("round", &[Number::Float(3.5)]), Ok(Number::Int(4)));
        assert_eq!(
            call("round", &[Number::Float(3.14159), Number::Int(2)]),
            Ok(Number::Float(3.14))
        );
        assert_eq!(
            call("round", &[Number::Int(1250), Number::Int(-2)]),
            Ok(Number::Int(1200))
        );
        assert_eq!(call("floor", &[Number::Float(-1.5)]), Ok(Number::Int(-2)));
        assert_eq!(call("ceil", &[Number::Float(1.2)]), Ok(Number::Int(2)));
        assert!(call("floor", &[Number::Float(f64::INFINITY)]).unwrap_err().is_invalid());
    }

    #[test]
    fn test_builtins_keep_argument_types() {
        assert_eq!(call("abs", &[Number::Int(-3)]), Ok(Number::Int(3)));
        assert_eq!(
            call("max", &[Number::Int(1), Number::Float(2.5), Number::Int(2)]),
            Ok(Number::Float(2.5))
        );
        assert_eq!(
            call("min", &[Number::Int(1), Number::Float(1.0)]),
            Ok(Number::Int(1))
        );
        assert_eq!(call("pow", &[Number::Int(2), Number::Int(8)]), Ok(Number::Int(256)));
        assert_eq!(
            call("pow", &[Number::Int(3), Number::Int(4), Number::Int(5)]),
            Ok(Number::Int(1))
        );
        assert_eq!(
            call("pow", &[Number::Int(3), Number::Int(-1), Number::Int(7)]),
            Ok(Number::Int(5))
        );
    }

    fn float(name: &str, args: &[f64]) -> f64 {
        let args: Vec<Number> = args.iter().copied().map(Number::Float).collect();
        call(name, &args).unwrap().as_f64()
    }

    #[test]
    fn test_float_helpers() {
        assert_eq!(float("remainder", &[5.0, 2.0]), 1.0);
        assert_eq!(float("remainder", &[7.0, 2.0]), -1.0);
        assert_eq!(float("remainder", &[-7.0, 2.0]), 1.0);
        assert!(call("remainder", &[Number::Int(1), Number::Int(0)]).unwrap_err().is_invalid());
        assert_eq!(float("fmod", &[-7.0, 3.0]), -1.0);
        assert_eq!(float("nextafter", &[1.0, 2.0]), 1.0 + f64::EPSILON);
        assert_eq!(float("ulp", &[1.0]), f64::EPSILON);
        assert_eq!(float("ulp", &[f64::INFINITY]), f64::INFINITY);
        assert_eq!(
            call("hypot", &[Number::Int(3), Number::Int(4)]),
            Ok(Number::Float(5.0))
        );
    }

    #[test]
    fn test_ldexp() {
        assert_eq!(
            call("ldexp", &[Number::Float(0.5), Number::Int(3)]),
            Ok(Number::Float(4.0))
        );
        assert_eq!(call("ldexp", &[Number::Int(0), Number::Int(2200)]), Ok(Number::Float(0.0)));
        assert_eq!(
            call("ldexp", &[Number::Float(0.0), Number::Int(3000)]),
            Ok(Number::Float(0.0))
        );
        assert_eq!(
            call("ldexp", &[Number::Float(1.0), Number::Int(-1075)]),
            Ok(Number::Float(0.0))
        );
        assert_eq!(
            call("ldexp", &[Number::Float(1.0), Number::Int(-1074)]),
            Ok(Number::Float(f64::from_bits(1)))
        );
        assert_eq!(
            call("ldexp", &[Number::Float(1.0), Number::Int(i64::MAX)])
                .unwrap_err()
                .to_string(),
            "Invalid expression: math range error"
        );
        assert_eq!(
            call("ldexp", &[Number::Float(f64::INFINITY), Number::Int(-5)]),
            Ok(Number::Float(f64::INFINITY))
        );
    }

    #[test]
    fn test_special_functions() {
        let close = |a: f64, b: f64| (a - b).abs() <= 1e-14 * b.abs().max(1.0);
        assert_eq!(float("gamma", &[5.0]), 24.0);
        assert!(close(float("gamma", &[0.5]), PI.sqrt()));
        assert!(close(float("gamma", &[-1.5]), 2.363_271_801_207_354_8));
        assert!(close(float("gamma", &[5.5]), 52.342_777_784_553_52));
        assert!(call("gamma", &[Number::Int(-3)]).unwrap_err().is_invalid());
        assert_eq!(
            call("gamma", &[Number::Int(200)]).unwrap_err().to_string(),
            "Invalid expression: math range error"
        );
        assert!(close(float("lgamma", &[0.5]), 0.572_364_942_924_700_1));
        assert!(close(float("lgamma", &[10.0]), 362_880.0f64.ln()));
        assert!(call("lgamma", &[Number::Int(0)]).unwrap_err().is_invalid());
        assert_eq!(float("erf", &[0.0]), 0.0);
        assert!(close(float("erf", &[0.5]), 0.520_499_877_813_046_5));
        assert!(close(float("erf", &[-1.0]), -0.842_700_792_949_714_9));
        assert!(close(float("erfc", &[3.0]), 2.209_049_699_858_544e-5));
    }
}
