// crates/symcalc-engine/src/eval.rs
// Numeric evaluation to 15 significant digits

use crate::error::{EngineError, Result};
use crate::expr::{Constant, Expr, Func, Symbol};
use crate::number::{Number, Wide};
use num_complex::Complex64;
use num_traits::Signed;

/// Relative size below which one part of a complex result is treated as noise
const CHOP_RATIO: f64 = 1e-13;

/// ln(10) split so that `k * LN10_HI` is exact for the exponents `exp` can reach
const LN10_HI: f64 = 2.302_585_092_373_192_3;
const LN10_LO: f64 = 6.208_533_736_847_395e-10;

impl Expr {
    /// Evaluate numerically.
    ///
    /// Real results become a float, complex ones `re + im*I`. Real values
    /// beyond the `f64` range keep a wide exponent (`1.00000000000000e+400`).
    /// Infinities pass through unchanged; `nan`, free symbols and results too
    /// large even for a wide exponent are errors.
    pub fn evalf(&self) -> Result<Expr> {
        if self.contains_undefined() {
            return Err(EngineError::Undefined(format!("{self} is not a number")));
        }
        if self.contains_infinity() {
            return Ok(self.clone());
        }

        let z = self.eval_complex(&[]);
        match &z {
            Ok(z) if in_f64_range(*z) => return Ok(complex_to_expr(chop(*z))),
            Ok(_) | Err(EngineError::Overflow(_)) => {
                let wide = self.eval_wide().filter(|v| v.is_finite() && !v.is_zero());
                if let Some(v) = wide {
                    return Ok(Expr::number(Number::from_wide(v.to_wide())));
                }
            }
            Err(_) => {}
        }
        match z {
            Ok(z) => Ok(complex_to_expr(chop(z))),
            Err(EngineError::Overflow(_)) => Err(EngineError::Overflow(format!(
                "{self} is too large to evaluate"
            ))),
            Err(err) => Err(err),
        }
    }

    /// Real evaluation on [`Number`] arithmetic, which widens instead of
    /// overflowing. `None` for anything complex or outside the supported forms.
    fn eval_wide(&self) -> Option<Number> {
        match self {
            Expr::Number(n) => Some(n.clone()),
            Expr::Constant(Constant::Pi) => Some(Number::float(std::f64::consts::PI)),
            Expr::Constant(Constant::E) => Some(Number::float(std::f64::consts::E)),
            Expr::Add(ts) => ts
                .iter()
                .try_fold(Number::int(0), |acc, t| Some(acc + t.eval_wide()?)),
            Expr::Mul(fs) => fs
                .iter()
                .try_fold(Number::int(1), |acc, f| Some(acc * f.eval_wide()?)),
            Expr::Pow(b, e) => {
                let base = b.eval_wide()?;
                let exp = e.eval_wide()?;
                if let Some(k) = exp.as_ratio().filter(|r| r.is_integer()) {
                    if base.is_zero() && k.is_negative() {
                        return None;
                    }
                    return base.pow_big(k.numer()).or_else(|| {
                        let k = exp.as_integer()?;
                        Some(Number::from_wide(base.to_wide().powi(k)))
                    });
                }
                if base.is_negative() {
                    return None;
                }
                Some(base.powf(exp.to_f64()))
            }
            Expr::Func(Func::Exp, a) => Some(wide_exp(a.eval_wide()?.to_f64())),
            Expr::Func(Func::Log, a) => {
                let v = a.eval_wide()?;
                if !v.is_positive() {
                    return None;
                }
                let w = v.to_wide();
                Some(Number::float(
                    w.mantissa().ln() + w.exponent() as f64 * std::f64::consts::LN_10,
                ))
            }
            Expr::Func(f, a) => f.eval_real(a.eval_wide()?.to_f64()).map(Number::float),
            _ => None,
        }
    }

    /// Value of a symbol-free expression, if it is real
    pub fn real_value(&self) -> Option<f64> {
        if !self.is_symbol_free() || self.contains_infinity() {
            return None;
        }
        let z = self.eval_complex(&[]).ok()?;
        (z.im.abs() <= 1e-12 * z.re.abs().max(1.0)).then_some(z.re)
    }

    /// Real value with `x` bound to `t`, `None` if non-real or non-finite
    pub fn eval_real_at(&self, x: &Symbol, t: f64) -> Option<f64> {
        let z = self.eval_complex(&[(x, Complex64::new(t, 0.0))]).ok()?;
        (z.im.abs() <= 1e-12 * z.re.abs().max(1.0)).then_some(z.re)
    }

    pub(crate) fn eval_complex(&self, bindings: &[(&Symbol, Complex64)]) -> Result<Complex64> {
        let z = match self {
            Expr::Number(Number::Wide(w)) => {
                return Err(EngineError::Overflow(format!("{w} is outside the f64 range")));
            }
            Expr::Number(n) => Complex64::new(n.to_f64(), 0.0),
            Expr::Symbol(s) => bindings
                .iter()
                .find(|(b, _)| *b == s)
                .map(|(_, v)| *v)
                .ok_or_else(|| {
                    EngineError::Unsupported(format!(
                        "cannot evaluate free symbol {s} numerically"
                    ))
                })?,
            Expr::Constant(c) => match c {
                Constant::Pi => Complex64::new(std::f64::consts::PI, 0.0),
                Constant::E => Complex64::new(std::f64::consts::E, 0.0),
                Constant::ImaginaryUnit => Complex64::new(0.0, 1.0),
                Constant::Infinity | Constant::ComplexInfinity => {
                    return Err(EngineError::Undefined("infinite value".to_string()));
                }
                Constant::Undefined => {
                    return Err(EngineError::Undefined("nan".to_string()));
                }
            },
            Expr::Add(ts) => {
                let mut acc = Complex64::new(0.0, 0.0);
                for t in ts {
                    acc += t.eval_complex(bindings)?;
                }
                acc
            }
            Expr::Mul(fs) => {
                let mut acc = Complex64::new(1.0, 0.0);
                for f in fs {
                    acc *= f.eval_complex(bindings)?;
                }
                acc
            }
            Expr::Pow(b, e) => {
                let base = b.eval_complex(bindings)?;
                match e.as_integer().and_then(|n| i32::try_from(n).ok()) {
                    Some(n) => {
                        if base == Complex64::new(0.0, 0.0) && n < 0 {
                            return Err(EngineError::Undefined("division by zero".to_string()));
                        }
                        base.powi(n)
                    }
                    None => complex_pow(base, e.eval_complex(bindings)?)?,
                }
            }
            Expr::Func(f, a) => eval_func(*f, a.eval_complex(bindings)?)?,
        };

        if z.re.is_nan() || z.im.is_nan() {
            return Err(EngineError::Undefined(format!("{self} is not a number")));
        }
        if !z.re.is_finite() || !z.im.is_finite() {
            return Err(EngineError::Overflow(format!("{self} is not finite")));
        }
        Ok(z)
    }
}

/// Whether each part is zero or a normal `f64`
fn in_f64_range(z: Complex64) -> bool {
    let normal = |v: f64| v.is_finite() && (v == 0.0 || v.abs() >= f64::MIN_POSITIVE);
    normal(z.re) && normal(z.im) && !(z.re == 0.0 && z.im == 0.0)
}

/// `e^x` for any finite `x`, as `10^k * e^r` with `x = k*ln(10) + r`
fn wide_exp(x: f64) -> Number {
    let direct = x.exp();
    if direct.is_finite() && direct >= f64::MIN_POSITIVE {
        return Number::float(direct);
    }
    if x.is_nan() {
        return Number::float(f64::NAN);
    }
    let k = (x * std::f64::consts::LOG10_E).floor();
    let r = (x - k * LN10_HI) - k * LN10_LO;
    Number::from_wide(Wide::new(r.exp(), k as i64))
}

fn complex_pow(base: Complex64, exp: Complex64) -> Result<Complex64> {
    if base.norm() == 0.0 {
        return if exp.re > 0.0 {
            Ok(Complex64::new(0.0, 0.0))
        } else {
            Err(EngineError::Undefined("division by zero".to_string()))
        };
    }
    if base.im == 0.0 && exp.im == 0.0 && base.re > 0.0 {
        return Ok(Complex64::new(base.re.powf(exp.re), 0.0));
    }
    Ok(base.powc(exp))
}

fn eval_func(f: Func, z: Complex64) -> Result<Complex64> {
    if z.im == 0.0 {
        if let Some(r) = f.eval_real(z.re) {
            return Ok(Complex64::new(r, 0.0));
        }
    }
    let r = match f {
        Func::Sin => z.sin(),
        Func::Cos => z.cos(),
        Func::Tan => z.tan(),
        Func::Asin => z.asin(),
        Func::Acos => z.acos(),
        Func::Atan => z.atan(),
        Func::Sinh => z.sinh(),
        Func::Cosh => z.cosh(),
        Func::Tanh => z.tanh(),
        Func::Exp => z.exp(),
        Func::Log => {
            if z.norm() == 0.0 {
                return Err(EngineError::Undefined("log(0)".to_string()));
            }
            z.ln()
        }
        Func::Abs => Complex64::new(z.norm(), 0.0),
    };
    Ok(r)
}

fn chop(z: Complex64) -> Complex64 {
    let (mut re, mut im) = (z.re, z.im);
    if re != 0.0 && im != 0.0 {
        if im.abs() < CHOP_RATIO * re.abs() {
            im = 0.0;
        } else if re.abs() < CHOP_RATIO * im.abs() {
            re = 0.0;
        }
    }
    Complex64::new(re, im)
}

fn complex_to_expr(z: Complex64) -> Expr {
    if z.im == 0.0 {
        return Expr::float(z.re);
    }
    let imag = Expr::product(vec![Expr::float(z.im), Expr::i()]);
    if z.re == 0.0 {
        imag
    } else {
        Expr::sum(vec![Expr::float(z.re), imag])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Symbol {
        Symbol::new("x").unwrap()
    }

    #[test]
    fn test_evalf_real() {
        let e = Expr::sqrt(Expr::int(2));
        assert_eq!(e.evalf().unwrap().to_string(), "1.41421356237310");
        assert_eq!(Expr::int(14).evalf().unwrap().to_string(), "14.0000000000000");
    }

    #[test]
    fn test_evalf_complex() {
        let e = Expr::sqrt(Expr::int(-4));
        assert_eq!(e.evalf().unwrap().to_string(), "2.00000000000000*I");
    }

    #[test]
    fn test_evalf_infinity_passes_through() {
        assert_eq!(Expr::infinity().evalf().unwrap(), Expr::infinity());
    }

    #[test]
    fn test_evalf_rejects_free_symbols_and_nan() {
        assert!(Expr::symbol(&x()).evalf().is_err());
        assert!(Expr::undefined().evalf().is_err());
    }

    #[test]
    fn test_evalf_beyond_f64_range() {
        let googol_cubed = Expr::power(Expr::int(10), Expr::int(400));
        assert_eq!(googol_cubed.evalf().unwrap().to_string(), "1.00000000000000e+400");

        let tiny = Expr::power(Expr::int(10), Expr::int(-400));
        assert_eq!(tiny.evalf().unwrap().to_string(), "1.00000000000000e-400");

        let scaled = Expr::power(Expr::int(10), Expr::int(400)) * Expr::pi();
        assert_eq!(scaled.evalf().unwrap().to_string(), "3.14159265358979e+400");

        let fact = Expr::number(Number::factorial(200).unwrap());
        assert_eq!(fact.evalf().unwrap().to_string(), "7.88657867364791e+374");

        let exp = Expr::apply(Func::Exp, Expr::int(1000));
        assert_eq!(exp.evalf().unwrap().to_string(), "1.97007111401705e+434");
    }

    #[test]
    fn test_evalf_refuses_overflow() {
        let tower = Expr::power(
            Expr::int(2),
            Expr::power(Expr::int(3), Expr::power(Expr::int(4), Expr::int(5))),
        );
        let err = tower.evalf().unwrap_err();
        assert!(matches!(err, EngineError::Overflow(_)), "{err}");
    }

    #[test]
    fn test_evalf_complex_infinity_passes_through() {
        let e = Expr::one() / Expr::zero();
        assert_eq!(e.evalf().unwrap().to_string(), "zoo");
    }

    #[test]
    fn test_exact_zero_stays_zero() {
        assert_eq!(Expr::zero().evalf().unwrap().to_string(), "0");
        let e = Expr::apply(Func::Sin, Expr::int(1)) - Expr::apply(Func::Sin, Expr::int(1));
        assert_eq!(e.evalf().unwrap().to_string(), "0");
    }

    #[test]
    fn test_eval_real_at() {
        let e = Expr::power(Expr::symbol(&x()), Expr::int(2));
        assert_eq!(e.eval_real_at(&x(), 3.0), Some(9.0));
        let log = Expr::apply(Func::Log, Expr::symbol(&x()));
        assert_eq!(log.eval_real_at(&x(), -1.0), None);
    }

    #[test]
    fn test_real_value_of_constants() {
        let v = (Expr::pi() / Expr::int(2)).real_value().unwrap();
        assert!((v - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert_eq!(Expr::i().real_value(), None);
    }
}
