// crates/symcalc-engine/src/number.rs
// Exact rational numbers with a floating-point fallback

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Largest exact power, in bits of numerator or denominator, that gets expanded
pub(crate) const MAX_EXACT_BITS: u64 = 1 << 18;

/// Largest `n` for which `n!` is computed exactly
pub(crate) const MAX_FACTORIAL: u64 = 10_000;

/// A numeric literal inside an expression.
///
/// Integers and fractions are exact and arbitrarily large. Anything written
/// with a decimal point becomes a float; floats that leave the `f64` range
/// continue as [`Wide`] values instead of turning into infinities.
#[derive(Debug, Clone)]
pub enum Number {
    /// Exact rational, in lowest terms with a positive denominator
    Rational(BigRational),
    /// Floating-point approximation
    Float(f64),
    /// Floating-point approximation outside the `f64` exponent range
    Wide(Wide),
}

/// `mantissa * 10^exponent`, with `1 <= |mantissa| < 10` unless the value is
/// zero or not finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wide {
    mantissa: f64,
    exponent: i64,
}

/// `v * 10^power`, in two steps so the intermediate powers stay in range
fn scale10(v: f64, power: i64) -> f64 {
    let power = power.clamp(-800, 800) as i32;
    let half = power / 2;
    v * 10f64.powi(half) * 10f64.powi(power - half)
}

impl Wide {
    pub fn new(mantissa: f64, exponent: i64) -> Self {
        if mantissa == 0.0 || !mantissa.is_finite() {
            return Wide { mantissa, exponent: 0 };
        }
        let shift = mantissa.abs().log10().floor() as i64;
        let mut m = scale10(mantissa, -shift);
        let mut e = exponent.saturating_add(shift);
        if m.abs() >= 10.0 {
            m /= 10.0;
            e += 1;
        } else if m.abs() < 1.0 {
            m *= 10.0;
            e -= 1;
        }
        Wide { mantissa: m, exponent: e }
    }

    pub fn from_f64(value: f64) -> Self {
        // LowerExp gives the shortest round-trip digits, e.g. "1.5e300"
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((m, e)) => match (m.parse::<f64>(), e.parse::<i64>()) {
                (Ok(m), Ok(e)) => Wide::new(m, e),
                _ => Wide::new(value, 0),
            },
            None => Wide::new(value, 0),
        }
    }

    /// Nearest decimal approximation of an exact rational
    pub fn from_ratio(r: &BigRational) -> Self {
        if r.is_zero() {
            return Wide::new(0.0, 0);
        }
        let (n, d) = (r.numer().abs(), r.denom());
        // log10(2) ~ 0.30103; aim for about 18 digits in the scaled quotient
        let magnitude = (n.bits() as i64 - d.bits() as i64) * 30_103 / 100_000;
        let shift = 18 - magnitude;
        let ten = BigInt::from(10);
        let q = if shift >= 0 {
            (n * ten.pow(shift as u32)) / d
        } else {
            n / (d * ten.pow(shift.unsigned_abs() as u32))
        };
        let m = q.to_f64().unwrap_or(f64::NAN);
        let sign = if r.is_negative() { -1.0 } else { 1.0 };
        Wide::new(sign * m, -shift)
    }

    pub fn mantissa(&self) -> f64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    pub fn to_f64(&self) -> f64 {
        scale10(self.mantissa, self.exponent)
    }

    fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }

    /// Integer power by repeated squaring
    pub fn powi(self, n: i64) -> Wide {
        let mut result = Wide::new(1.0, 0);
        let mut base = self;
        let mut k = n.unsigned_abs();
        while k > 0 {
            if k & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            k >>= 1;
        }
        if n < 0 {
            Wide::new(1.0, 0) / result
        } else {
            result
        }
    }

    pub fn powf(self, p: f64) -> Wide {
        if p.fract() == 0.0 && p.abs() < 9.0e15 {
            return self.powi(p as i64);
        }
        if self.mantissa < 0.0 {
            return Wide::new(f64::NAN, 0);
        }
        if self.is_zero() {
            return if p > 0.0 { self } else { Wide::new(f64::INFINITY, 0) };
        }
        let log = p * (self.mantissa.log10() + self.exponent as f64);
        if !log.is_finite() {
            return Wide::new(if log > 0.0 { f64::INFINITY } else { 0.0 }, 0);
        }
        let whole = log.floor();
        Wide::new(10f64.powf(log - whole), whole as i64)
    }

    fn cmp_value(&self, other: &Wide) -> Ordering {
        let sign = |w: &Wide| w.mantissa.partial_cmp(&0.0).unwrap_or(Ordering::Equal);
        match sign(self).cmp(&sign(other)) {
            Ordering::Equal => {}
            ord => return ord,
        }
        let magnitude = self
            .exponent
            .cmp(&other.exponent)
            .then(
                self.mantissa
                    .abs()
                    .partial_cmp(&other.mantissa.abs())
                    .unwrap_or(Ordering::Equal),
            );
        match sign(self) {
            Ordering::Less => magnitude.reverse(),
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => magnitude,
        }
    }
}

impl Neg for Wide {
    type Output = Wide;

    fn neg(self) -> Wide {
        Wide {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl Add for Wide {
    type Output = Wide;

    fn add(self, other: Wide) -> Wide {
        if self.is_zero() && other.mantissa.is_finite() {
            return other;
        }
        if other.is_zero() && self.mantissa.is_finite() {
            return self;
        }
        let top = self.exponent.max(other.exponent);
        Wide::new(
            scale10(self.mantissa, self.exponent - top)
                + scale10(other.mantissa, other.exponent - top),
            top,
        )
    }
}

impl Mul for Wide {
    type Output = Wide;

    fn mul(self, other: Wide) -> Wide {
        Wide::new(
            self.mantissa * other.mantissa,
            self.exponent.saturating_add(other.exponent),
        )
    }
}

impl Div for Wide {
    type Output = Wide;

    fn div(self, other: Wide) -> Wide {
        Wide::new(
            self.mantissa / other.mantissa,
            self.exponent.saturating_sub(other.exponent),
        )
    }
}

impl fmt::Display for Wide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mantissa.is_finite() || self.is_zero() {
            return f.write_str(&format_float(self.mantissa));
        }
        let mut exponent = self.exponent;
        let mut digits = format!("{:.14}", self.mantissa);
        // Rounding 9.999... can carry into a new leading digit
        if digits.trim_start_matches('-').starts_with("10") {
            exponent += 1;
            digits = format!("{:.14}", self.mantissa / 10.0);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{digits}e{sign}{}", exponent.unsigned_abs())
    }
}

impl Number {
    pub fn int(n: i64) -> Self {
        Number::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    /// Create a rational, reducing and normalizing the sign
    pub fn rational(num: i64, den: i64) -> Self {
        if den == 0 {
            return Self::division_by_zero(num.signum());
        }
        Number::Rational(BigRational::new(BigInt::from(num), BigInt::from(den)))
    }

    pub fn from_integer(n: BigInt) -> Self {
        Number::Rational(BigRational::from_integer(n))
    }

    pub fn from_ratio(r: BigRational) -> Self {
        Number::Rational(r)
    }

    fn division_by_zero(sign: i64) -> Self {
        Number::Float(match sign.cmp(&0) {
            Ordering::Greater => f64::INFINITY,
            Ordering::Less => f64::NEG_INFINITY,
            Ordering::Equal => f64::NAN,
        })
    }

    pub fn float(f: f64) -> Self {
        Number::Float(f)
    }

    /// Back to `Float` whenever the value fits an `f64`
    pub fn from_wide(w: Wide) -> Self {
        if !w.mantissa.is_finite() || w.is_zero() {
            return Number::Float(w.mantissa);
        }
        let v = w.to_f64();
        if v.is_finite() && v.abs() >= f64::MIN_POSITIVE {
            Number::Float(v)
        } else {
            Number::Wide(w)
        }
    }

    /// Convert a float to an exact rational when its shortest decimal form is
    /// short enough and of moderate magnitude (`0.5` becomes `1/2`, `0.1`
    /// becomes `1/10`, `1e300` stays a float).
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Number::Float(value);
        }
        let text = format!("{value:e}");
        let Some((mantissa, exponent)) = text.split_once('e') else {
            return Number::Float(value);
        };
        let Ok(exponent) = exponent.parse::<i32>() else {
            return Number::Float(value);
        };
        let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        if digits.len() > 15 || !(-15..=15).contains(&exponent) {
            return Number::Float(value);
        }
        let Ok(mut num) = digits.parse::<BigInt>() else {
            return Number::Float(value);
        };
        if mantissa.starts_with('-') {
            num = -num;
        }

        // value = digits * 10^(exponent - (len - 1))
        let shift = exponent - (digits.len() as i32 - 1);
        let ten = BigInt::from(10);
        if shift >= 0 {
            Number::from_integer(num * ten.pow(shift as u32))
        } else {
            Number::Rational(BigRational::new(num, ten.pow(shift.unsigned_abs())))
        }
    }

    /// `n!` exactly, or `None` above [`MAX_FACTORIAL`]
    pub fn factorial(n: u64) -> Option<Self> {
        if n > MAX_FACTORIAL {
            return None;
        }
        let value = (2..=n).fold(BigInt::one(), |acc, k| acc * k);
        Some(Number::from_integer(value))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => *f == 0.0,
            Number::Wide(w) => w.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_one())
    }

    pub fn is_neg_one(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_integer() && (-r.numer()).is_one())
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_negative(),
            Number::Float(f) => *f < 0.0,
            Number::Wide(w) => w.mantissa < 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_positive(),
            Number::Float(f) => *f > 0.0,
            Number::Wide(w) => w.mantissa > 0.0,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Rational(_))
    }

    pub fn is_float(&self) -> bool {
        !self.is_exact()
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_integer())
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Number::Rational(_) => true,
            Number::Float(f) => f.is_finite(),
            Number::Wide(w) => w.mantissa.is_finite(),
        }
    }

    /// The value as an exact integer, if it is one and fits in `i64`
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Number::Rational(r) if r.is_integer() => r.numer().to_i64(),
            _ => None,
        }
    }

    /// Numerator and denominator, if exact and both fit in `i64`
    pub fn as_rational(&self) -> Option<(i64, i64)> {
        match self {
            Number::Rational(r) => Some((r.numer().to_i64()?, r.denom().to_i64()?)),
            _ => None,
        }
    }

    pub fn as_ratio(&self) -> Option<&BigRational> {
        match self {
            Number::Rational(r) => Some(r),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
            Number::Wide(w) => w.to_f64(),
        }
    }

    /// The value as a normal `f64`, if it is one
    fn as_f64(&self) -> Option<f64> {
        let v = self.to_f64();
        match self {
            Number::Float(_) => Some(v),
            Number::Rational(r) if r.is_zero() => Some(0.0),
            Number::Rational(_) if v.is_finite() && v.abs() >= f64::MIN_POSITIVE => Some(v),
            _ => None,
        }
    }

    pub fn to_wide(&self) -> Wide {
        match self {
            Number::Rational(r) => Wide::from_ratio(r),
            Number::Float(f) => Wide::from_f64(*f),
            Number::Wide(w) => *w,
        }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() { -self.clone() } else { self.clone() }
    }

    pub fn recip(&self) -> Self {
        Number::int(1) / self.clone()
    }

    /// Raise to an integer power. `None` when the base is exact and the result
    /// would exceed [`MAX_EXACT_BITS`], or for `0` to a negative power.
    pub fn pow_int(&self, exp: i64) -> Option<Self> {
        self.pow_big(&BigInt::from(exp))
    }

    pub fn pow_big(&self, exp: &BigInt) -> Option<Self> {
        if exp.is_zero() {
            return Some(Number::int(1));
        }
        match self {
            Number::Rational(r) => {
                if r.is_zero() {
                    return exp.is_positive().then(|| self.clone());
                }
                if r.is_one() {
                    return Some(self.clone());
                }
                if self.is_neg_one() {
                    return Some(Number::int(if exp.is_even() { 1 } else { -1 }));
                }
                let e = exp.abs().to_u32()?;
                let size = r.numer().bits().max(r.denom().bits()).saturating_mul(u64::from(e));
                if size > MAX_EXACT_BITS {
                    return None;
                }
                let (n, d) = (r.numer().pow(e), r.denom().pow(e));
                Some(Number::Rational(if exp.is_negative() {
                    BigRational::new(d, n)
                } else {
                    BigRational::new(n, d)
                }))
            }
            _ => Some(self.powf(exp.to_f64()?)),
        }
    }

    /// Floating-point power, widening instead of overflowing
    pub fn powf(&self, exp: f64) -> Self {
        if let Some(x) = self.as_f64() {
            let v = x.powf(exp);
            if v.is_nan() || (v.is_finite() && (v != 0.0 || x == 0.0)) {
                return Number::Float(v);
            }
            if x == 0.0 {
                return Number::Float(v);
            }
        }
        Number::from_wide(self.to_wide().powf(exp))
    }

    /// Numeric ordering; NaN compares equal to everything
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => self.to_wide().cmp_value(&other.to_wide()),
            },
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Number::Wide(a), Number::Wide(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::int(n)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::from_integer(n)
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Self::Output {
        match self {
            Number::Rational(r) => Number::Rational(-r),
            Number::Float(f) => Number::Float(-f),
            Number::Wide(w) => Number::Wide(-w),
        }
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a + b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) if (x + y).is_finite() || !(x.is_finite() && y.is_finite()) => {
                    Number::Float(x + y)
                }
                _ => Number::from_wide(a.to_wide() + b.to_wide()),
            },
        }
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a * b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y))
                    if fits(x * y, x.is_finite() && y.is_finite(), x == 0.0 || y == 0.0) =>
                {
                    Number::Float(x * y)
                }
                _ => Number::from_wide(a.to_wide() * b.to_wide()),
            },
        }
    }
}

impl Div for Number {
    type Output = Number;

    fn div(self, rhs: Self) -> Self::Output {
        if rhs.is_zero() {
            let sign = if self.is_positive() {
                1
            } else if self.is_negative() {
                -1
            } else {
                0
            };
            return Self::division_by_zero(sign);
        }
        match (self, rhs) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a / b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) if fits(x / y, x.is_finite() && y.is_finite(), x == 0.0) => {
                    Number::Float(x / y)
                }
                _ => Number::from_wide(a.to_wide() / b.to_wide()),
            },
        }
    }
}

/// Whether a product or quotient of finite inputs came out without overflow
/// or underflow
fn fits(v: f64, finite_inputs: bool, zero_input: bool) -> bool {
    !finite_inputs || (v.is_finite() && (v != 0.0 || zero_input))
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Rational(r) if r.is_integer() => write!(f, "{}", r.numer()),
            Number::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Number::Float(v) => f.write_str(&format_float(*v)),
            Number::Wide(w) => write!(f, "{w}"),
        }
    }
}

/// Render a float with 15 significant digits, the precision `evalf` reports.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "oo" } else { "-oo" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let exponent = v.abs().log10().floor() as i32;
    if (-5..15).contains(&exponent) {
        let decimals = (14 - exponent).max(0) as usize;
        format!("{:.*}", decimals, v)
    } else {
        let s = format!("{:.14e}", v);
        match s.split_once('e') {
            Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
            Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
            None => s,
        }
    }
}

/// Exact integer k-th root of a non-negative integer
pub(crate) fn exact_root(n: &BigInt, k: u32) -> Option<BigInt> {
    if n.is_negative() || k == 0 {
        return None;
    }
    let r = n.nth_root(k);
    (r.pow(k) == *n).then_some(r)
}

/// Whether `p^k <= n`, without building `p^k` when it clearly is not
fn power_fits(p: u32, k: u32, n: &BigInt) -> bool {
    if f64::from(k) * f64::from(p).log2() > n.bits() as f64 + 1.0 {
        return false;
    }
    BigInt::from(p).pow(k) <= *n
}

/// Split `n >= 0` into `(outside, inside)` with `n = outside^k * inside`,
/// pulling out every small perfect k-th power factor.
pub(crate) fn extract_root(n: &BigInt, k: u32) -> (BigInt, BigInt) {
    let mut outside = BigInt::one();
    let mut inside = BigInt::one();
    let mut rest = n.clone();
    let mut p: u32 = 2;

    while p <= 10_000 && power_fits(p, k, &rest) {
        let factor = BigInt::from(p);
        let mut mult = 0u32;
        while (&rest % &factor).is_zero() {
            rest /= &factor;
            mult += 1;
        }
        if mult > 0 {
            outside *= factor.pow(mult / k);
            inside *= factor.pow(mult % k);
        }
        p += 1;
    }

    (outside, inside * rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(text: &str) -> BigInt {
        text.parse().unwrap()
    }

    #[test]
    fn test_rational_arithmetic() {
        let a = Number::rational(1, 2);
        let b = Number::rational(1, 3);

        // 1/2 + 1/3 = 5/6
        assert_eq!(a.clone() + b.clone(), Number::rational(5, 6));
        // 1/2 * 1/3 = 1/6
        assert_eq!(a.clone() * b.clone(), Number::rational(1, 6));
        // 1/2 / 1/3 = 3/2
        assert_eq!(a / b, Number::rational(3, 2));
    }

    #[test]
    fn test_reduction_and_sign() {
        assert_eq!(Number::rational(4, 6), Number::rational(2, 3));
        assert_eq!(Number::rational(3, -6).as_rational(), Some((-1, 2)));
    }

    #[test]
    fn test_large_integers_stay_exact() {
        let big_int = Number::int(i64::MAX);
        let square = big_int.clone() * big_int;
        assert!(square.is_exact());
        assert_eq!(square.to_string(), "85070591730234615847396907784232501249");
        assert_eq!(square.as_integer(), None);

        let googol = Number::int(10).pow_int(100).unwrap();
        assert_eq!(googol.to_string(), format!("1{}", "0".repeat(100)));
        assert_eq!(Number::int(10).pow_int(-2), Some(Number::rational(1, 100)));
    }

    #[test]
    fn test_exact_power_size_limit() {
        assert!(Number::int(2).pow_int(1_000_000).is_none());
        assert_eq!(Number::int(1).pow_int(i64::MAX), Some(Number::int(1)));
        assert_eq!(Number::int(-1).pow_int(i64::MAX), Some(Number::int(-1)));
        assert_eq!(Number::int(0).pow_int(-1), None);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Number::from_f64(0.5), Number::rational(1, 2));
        assert_eq!(Number::from_f64(-0.25), Number::rational(-1, 4));
        assert_eq!(Number::from_f64(3.0), Number::int(3));
        assert_eq!(Number::from_f64(0.1), Number::rational(1, 10));
        assert_eq!(Number::from_f64(0.0), Number::int(0));
        assert!(Number::from_f64(std::f64::consts::PI).is_float());
        assert!(Number::from_f64(1.0e300).is_float());
    }

    #[test]
    fn test_power() {
        let a = Number::rational(2, 3);
        assert_eq!(a.pow_int(2), Some(Number::rational(4, 9)));
        assert_eq!(a.pow_int(-1), Some(Number::rational(3, 2)));
        assert_eq!(Number::int(-1).pow_int(7), Some(Number::int(-1)));
    }

    #[test]
    fn test_float_overflow_widens() {
        let v = Number::float(2.0e300) * Number::float(2.0e300);
        assert!(matches!(v, Number::Wide(_)));
        assert_eq!(v.to_string(), "4.00000000000000e+600");

        let variance = v / Number::int(12);
        assert_eq!(variance.to_string(), "3.33333333333333e+599");
        assert!(variance.is_finite());

        // Back in range
        let back = variance / Number::float(1.0e300);
        assert!(matches!(back, Number::Float(_)));
        assert!((back.to_f64() / 3.333_333_333_333_333e299 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_float_underflow_widens() {
        let tiny = Number::float(1.0e-200) * Number::float(1.0e-200);
        assert_eq!(tiny.to_string(), "1.00000000000000e-400");
        assert!(!tiny.is_zero());
        assert!(tiny.is_positive());
    }

    #[test]
    fn test_wide_from_ratio() {
        let r = BigRational::from_integer(big("10").pow(400));
        assert_eq!(Wide::from_ratio(&r).to_string(), "1.00000000000000e+400");

        let third = BigRational::new(BigInt::one(), big("3") * big("10").pow(400));
        assert_eq!(Wide::from_ratio(&third).to_string(), "3.33333333333333e-401");
    }

    #[test]
    fn test_wide_power_and_order() {
        let w = Number::float(1.0e200).powf(3.0);
        assert_eq!(w.to_string(), "1.00000000000000e+600");
        assert_eq!(w.cmp_value(&Number::float(1.0e300)), Ordering::Greater);
        assert_eq!((-w.clone()).cmp_value(&Number::int(0)), Ordering::Less);
        assert_eq!(
            Number::from_integer(big("10").pow(400)).cmp_value(&w),
            Ordering::Less
        );
    }

    #[test]
    fn test_factorial() {
        assert_eq!(Number::factorial(0), Some(Number::int(1)));
        assert_eq!(Number::factorial(20), Some(Number::int(2_432_902_008_176_640_000)));
        let f200 = Number::factorial(200).unwrap();
        let digits = f200.to_string();
        assert_eq!(digits.len(), 375);
        assert!(digits.starts_with("788657867364790503552363"));
        assert!(digits.ends_with(&"0".repeat(49)));
        assert!(Number::factorial(MAX_FACTORIAL + 1).is_none());
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(14.0), "14.0000000000000");
        assert_eq!(format_float(std::f64::consts::SQRT_2), "1.41421356237310");
        assert_eq!(format_float(-0.5), "-0.500000000000000");
        assert_eq!(format_float(1.0e20), "1.00000000000000e+20");
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(f64::from_bits(1)), "4.94065645841247e-324");
    }

    #[test]
    fn test_roots() {
        assert_eq!(exact_root(&big("27"), 3), Some(big("3")));
        assert_eq!(exact_root(&big("8"), 2), None);
        assert_eq!(extract_root(&big("8"), 2), (big("2"), big("2")));
        assert_eq!(extract_root(&big("72"), 2), (big("6"), big("2")));
        assert_eq!(extract_root(&big("7"), 2), (big("1"), big("7")));
        assert_eq!(
            extract_root(&big("99999999999999999996"), 2),
            (big("2"), big("24999999999999999999"))
        );
        assert_eq!(
            exact_root(&big("10").pow(400), 2),
            Some(big("10").pow(200))
        );
    }
}
