// crates/symcalc-engine/src/expr.rs
// Expression tree with canonicalizing constructors

use crate::error::{EngineError, Result};
use crate::number::{self, Number, MAX_EXACT_BITS};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A named variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: String,
}

impl Symbol {
    /// Create a symbol, checking that the name is a valid identifier
    pub fn new(name: &str) -> Result<Self> {
        let mut chars = name.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_');
        if !valid {
            return Err(EngineError::InvalidSymbol(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub(crate) fn unchecked(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Named constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    Pi,
    E,
    Infinity,
    Undefined,
    ImaginaryUnit,
    /// Unsigned infinity, the value of `1/0`
    ComplexInfinity,
}

impl Constant {
    pub fn text(&self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::Infinity => "oo",
            Constant::Undefined => "nan",
            Constant::ImaginaryUnit => "I",
            Constant::ComplexInfinity => "zoo",
        }
    }
}

/// Elementary functions of one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Abs,
}

impl Func {
    pub fn name(&self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Abs => "Abs",
        }
    }

    /// Look up a function by any of its accepted spellings
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "asin" | "arcsin" => Func::Asin,
            "acos" | "arccos" => Func::Acos,
            "atan" | "arctan" => Func::Atan,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            "exp" => Func::Exp,
            "log" | "ln" => Func::Log,
            "Abs" | "abs" => Func::Abs,
            _ => return None,
        };
        Some(func)
    }

    /// Real evaluation, `None` outside the real domain
    pub(crate) fn eval_real(&self, v: f64) -> Option<f64> {
        let r = match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Asin if v.abs() <= 1.0 => v.asin(),
            Func::Acos if v.abs() <= 1.0 => v.acos(),
            Func::Atan => v.atan(),
            Func::Sinh => v.sinh(),
            Func::Cosh => v.cosh(),
            Func::Tanh => v.tanh(),
            Func::Exp => v.exp(),
            Func::Log if v > 0.0 => v.ln(),
            Func::Abs => v.abs(),
            _ => return None,
        };
        r.is_finite().then_some(r)
    }
}

/// A symbolic expression.
///
/// Values are only built through the constructors on `Expr` (`sum`, `product`,
/// `power`, `apply`), which keep every node in canonical form: sums and products
/// are flattened, numeric parts folded, like terms collected and operands
/// sorted. Structural equality therefore doubles as mathematical equality for
/// the forms the engine produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    Symbol(Symbol),
    Constant(Constant),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(Func, Box<Expr>),
}

impl Expr {
    // ========================================================================
    // Leaf constructors
    // ========================================================================

    pub fn int(n: i64) -> Self {
        Expr::Number(Number::int(n))
    }

    pub fn rational(num: i64, den: i64) -> Self {
        Expr::number(Number::rational(num, den))
    }

    pub fn float(v: f64) -> Self {
        Expr::number(Number::Float(v))
    }

    /// Wrap a number; NaN becomes the undefined constant
    pub fn number(n: Number) -> Self {
        match n {
            Number::Float(v) if v.is_nan() => Expr::undefined(),
            Number::Float(v) if v.is_infinite() => {
                if v > 0.0 {
                    Expr::infinity()
                } else {
                    Expr::neg_infinity()
                }
            }
            _ => Expr::Number(n),
        }
    }

    pub fn zero() -> Self {
        Expr::int(0)
    }

    pub fn one() -> Self {
        Expr::int(1)
    }

    pub fn symbol(s: &Symbol) -> Self {
        Expr::Symbol(s.clone())
    }

    pub fn pi() -> Self {
        Expr::Constant(Constant::Pi)
    }

    pub fn e() -> Self {
        Expr::Constant(Constant::E)
    }

    pub fn i() -> Self {
        Expr::Constant(Constant::ImaginaryUnit)
    }

    pub fn infinity() -> Self {
        Expr::Constant(Constant::Infinity)
    }

    pub fn neg_infinity() -> Self {
        Expr::Mul(vec![Expr::int(-1), Expr::infinity()])
    }

    pub fn undefined() -> Self {
        Expr::Constant(Constant::Undefined)
    }

    pub fn complex_infinity() -> Self {
        Expr::Constant(Constant::ComplexInfinity)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Expr::Number(n) => Some(n.clone()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_integer())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(n) if n.is_one())
    }

    pub fn is_neg_one(&self) -> bool {
        matches!(self, Expr::Number(n) if n.is_neg_one())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Expr::Constant(Constant::Undefined))
    }

    /// True if `nan` appears anywhere in the tree
    pub fn contains_undefined(&self) -> bool {
        self.any(&|e| e.is_undefined())
    }

    pub fn is_complex_infinity(&self) -> bool {
        matches!(self, Expr::Constant(Constant::ComplexInfinity))
    }

    /// True if `oo` or `zoo` appears anywhere in the tree
    pub fn contains_infinity(&self) -> bool {
        self.any(&|e| {
            matches!(
                e,
                Expr::Constant(Constant::Infinity | Constant::ComplexInfinity)
            )
        })
    }

    /// Neither `nan` nor an infinity anywhere in the tree
    pub fn is_finite_value(&self) -> bool {
        !self.contains_undefined() && !self.contains_infinity()
    }

    /// `Some(1)` for `oo`, `Some(-1)` for `-oo`
    pub fn infinity_sign(&self) -> Option<i8> {
        match self {
            Expr::Constant(Constant::Infinity) => Some(1),
            Expr::Mul(fs) if fs.len() == 2 => match (&fs[0], &fs[1]) {
                (Expr::Number(c), Expr::Constant(Constant::Infinity)) if c.is_negative() => {
                    Some(-1)
                }
                (Expr::Number(c), Expr::Constant(Constant::Infinity)) if c.is_positive() => {
                    Some(1)
                }
                _ => None,
            },
            _ => None,
        }
    }

    pub fn has_symbol(&self, s: &Symbol) -> bool {
        self.any(&|e| matches!(e, Expr::Symbol(t) if t == s))
    }

    pub fn is_symbol_free(&self) -> bool {
        !self.any(&|e| matches!(e, Expr::Symbol(_)))
    }

    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Symbol(s) => {
                out.insert(s.clone());
            }
            _ => self.children().for_each(|c| c.collect_symbols(out)),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = &Expr> + '_> {
        match self {
            Expr::Add(xs) | Expr::Mul(xs) => Box::new(xs.iter()),
            Expr::Pow(b, e) => Box::new([b.as_ref(), e.as_ref()].into_iter()),
            Expr::Func(_, a) => Box::new(std::iter::once(a.as_ref())),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn any(&self, pred: &dyn Fn(&Expr) -> bool) -> bool {
        pred(self) || self.children().any(|c| c.any(pred))
    }

    /// True for a product with a negative leading coefficient or a negative number
    pub fn could_extract_minus_sign(&self) -> bool {
        match self {
            Expr::Number(n) => n.is_negative(),
            Expr::Mul(fs) => matches!(fs.first(), Some(Expr::Number(n)) if n.is_negative()),
            _ => false,
        }
    }

    /// Split a term into its numeric coefficient and the remaining factors
    pub fn split_coefficient(&self) -> (Number, Expr) {
        match self {
            Expr::Number(n) => (n.clone(), Expr::one()),
            Expr::Mul(fs) => match fs.split_first() {
                Some((Expr::Number(c), rest)) if rest.len() == 1 => (c.clone(), rest[0].clone()),
                Some((Expr::Number(c), rest)) => (c.clone(), Expr::Mul(rest.to_vec())),
                _ => (Number::int(1), self.clone()),
            },
            _ => (Number::int(1), self.clone()),
        }
    }

    /// Base and exponent, treating any non-power as `self ** 1`
    pub fn base_exp(&self) -> (&Expr, Expr) {
        match self {
            Expr::Pow(b, e) => (b.as_ref(), e.as_ref().clone()),
            _ => (self, Expr::one()),
        }
    }

    // ========================================================================
    // Canonical constructors
    // ========================================================================

    /// Canonical sum
    pub fn sum(terms: Vec<Expr>) -> Expr {
        let mut flat = Vec::with_capacity(terms.len());
        for t in terms {
            match t {
                Expr::Add(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        let mut constant = Number::int(0);
        let mut groups: Vec<(Expr, Number)> = Vec::new();
        let mut pos_inf = false;
        let mut neg_inf = false;
        let mut unsigned_inf = 0usize;

        for term in flat {
            if term.is_undefined() {
                return Expr::undefined();
            }
            if term.is_complex_infinity() {
                unsigned_inf += 1;
                continue;
            }
            if let Expr::Number(n) = term {
                constant = constant + n;
                continue;
            }
            match term.infinity_sign() {
                Some(s) if s > 0 => {
                    pos_inf = true;
                    continue;
                }
                Some(_) => {
                    neg_inf = true;
                    continue;
                }
                None => {}
            }
            let (coeff, rest) = term.split_coefficient();
            match groups.iter_mut().find(|(r, _)| *r == rest) {
                Some((_, c)) => *c = c.clone() + coeff,
                None => groups.push((rest, coeff)),
            }
        }

        if !constant.is_finite() {
            return Expr::number(constant);
        }
        if (pos_inf && neg_inf) || unsigned_inf > 1 || (unsigned_inf == 1 && (pos_inf || neg_inf)) {
            return Expr::undefined();
        }
        if unsigned_inf == 1 {
            if groups.iter().all(|(r, _)| r.is_symbol_free()) {
                return Expr::complex_infinity();
            }
            groups.push((Expr::complex_infinity(), Number::int(1)));
        }
        if pos_inf || neg_inf {
            let inf = if pos_inf {
                Expr::infinity()
            } else {
                Expr::neg_infinity()
            };
            if groups.iter().all(|(r, _)| r.is_symbol_free()) {
                return inf;
            }
            groups.push((inf, Number::int(1)));
        }

        let mut out: Vec<Expr> = groups
            .into_iter()
            .filter(|(_, c)| !c.is_zero())
            .map(|(rest, c)| Expr::scaled(c, rest))
            .collect();
        if out.is_empty() {
            return Expr::Number(constant);
        }
        if !constant.is_zero() {
            out.push(Expr::Number(constant));
        }

        sort_canonical(&mut out);
        if out.len() == 1 {
            out.remove(0)
        } else {
            Expr::Add(out)
        }
    }

    /// Canonical product
    pub fn product(factors: Vec<Expr>) -> Expr {
        let mut flat = Vec::with_capacity(factors.len());
        for f in factors {
            match f {
                Expr::Mul(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        let mut coeff = Number::int(1);
        let mut groups: Vec<(Expr, Expr)> = Vec::new();

        for factor in flat {
            match factor {
                Expr::Constant(Constant::Undefined) => return Expr::undefined(),
                Expr::Number(n) => coeff = coeff * n,
                Expr::Pow(b, e) => merge_power(&mut groups, *b, *e),
                Expr::Func(Func::Exp, arg) => merge_power(&mut groups, Expr::e(), *arg),
                other => merge_power(&mut groups, other, Expr::one()),
            }
        }

        if !coeff.is_finite() {
            return Expr::number(coeff);
        }

        // Rebuild each group; a merged power may collapse into a number or a product
        let mut rest = Vec::with_capacity(groups.len());
        let mut needs_pass = false;
        for (base, exp) in groups {
            let p = if exp.is_one() {
                base
            } else {
                Expr::power(base, exp)
            };
            match p {
                Expr::Number(n) => coeff = coeff * n,
                Expr::Constant(Constant::Undefined) => return Expr::undefined(),
                Expr::Mul(_) => {
                    rest.push(p);
                    needs_pass = true;
                }
                other => rest.push(other),
            }
        }
        if needs_pass {
            rest.push(Expr::Number(coeff));
            return Expr::product(rest);
        }

        if coeff.is_zero() {
            if rest
                .iter()
                .any(|f| f.infinity_sign().is_some() || f.is_complex_infinity())
            {
                return Expr::undefined();
            }
            return Expr::Number(coeff);
        }

        // zoo absorbs every other constant factor
        if rest.iter().any(Expr::is_complex_infinity)
            && rest
                .iter()
                .all(|f| f.is_complex_infinity() || f.is_symbol_free())
        {
            return Expr::complex_infinity();
        }

        if let Some(pos) = rest
            .iter()
            .position(|f| matches!(f, Expr::Constant(Constant::Infinity)))
        {
            if let Some(sign) = infinity_product_sign(&coeff, &rest, pos) {
                return if sign > 0.0 {
                    Expr::infinity()
                } else {
                    Expr::neg_infinity()
                };
            }
        }

        // A numeric coefficient distributes over a lone sum
        if rest.len() == 1 && !coeff.is_one() {
            if let Expr::Add(terms) = &rest[0] {
                return Expr::sum(
                    terms
                        .iter()
                        .map(|t| Expr::product(vec![Expr::Number(coeff.clone()), t.clone()]))
                        .collect(),
                );
            }
        }

        sort_canonical(&mut rest);
        match (rest.len(), coeff.is_one()) {
            (0, _) => Expr::Number(coeff),
            (1, true) => rest.remove(0),
            (_, true) => Expr::Mul(rest),
            (_, false) => {
                rest.insert(0, Expr::Number(coeff));
                Expr::Mul(rest)
            }
        }
    }

    /// Multiply an already canonical expression by a number without regrouping
    pub(crate) fn scaled(c: Number, e: Expr) -> Expr {
        if c.is_one() {
            return e;
        }
        match e {
            Expr::Number(n) => Expr::Number(c * n),
            Expr::Mul(mut fs) => {
                if let Some(Expr::Number(n)) = fs.first().cloned() {
                    let k = c * n;
                    if k.is_one() {
                        fs.remove(0);
                        if fs.len() == 1 {
                            return fs.remove(0);
                        }
                    } else {
                        fs[0] = Expr::Number(k);
                    }
                } else {
                    fs.insert(0, Expr::Number(c));
                }
                Expr::Mul(fs)
            }
            other => Expr::Mul(vec![Expr::Number(c), other]),
        }
    }

    /// Canonical power
    pub fn power(base: Expr, exp: Expr) -> Expr {
        if base.is_undefined() || exp.is_undefined() {
            return Expr::undefined();
        }
        if exp.is_zero() {
            return Expr::one();
        }
        if exp.is_one() {
            return base;
        }
        if base.is_one() {
            return Expr::one();
        }
        if matches!(base, Expr::Constant(Constant::E)) {
            return Expr::apply(Func::Exp, exp);
        }
        if let (Expr::Number(b), Expr::Number(e)) = (&base, &exp) {
            return pow_numbers(b, e);
        }
        if let (true, Expr::Number(e)) = (base.is_complex_infinity(), &exp) {
            return if e.is_negative() {
                Expr::zero()
            } else {
                Expr::complex_infinity()
            };
        }

        if let (Some(sign), Expr::Number(e)) = (base.infinity_sign(), &exp) {
            if e.is_negative() {
                return Expr::zero();
            }
            if sign > 0 {
                return Expr::infinity();
            }
            if let Some(n) = e.as_integer() {
                return if n % 2 == 0 {
                    Expr::infinity()
                } else {
                    Expr::neg_infinity()
                };
            }
        }

        if let Some(n) = exp.as_integer() {
            match &base {
                Expr::Constant(Constant::ImaginaryUnit) => {
                    return match n.rem_euclid(4) {
                        0 => Expr::one(),
                        1 => Expr::i(),
                        2 => Expr::int(-1),
                        _ => Expr::Mul(vec![Expr::int(-1), Expr::i()]),
                    };
                }
                Expr::Pow(b, e) => {
                    return Expr::power(
                        b.as_ref().clone(),
                        Expr::product(vec![e.as_ref().clone(), exp.clone()]),
                    );
                }
                Expr::Func(Func::Exp, arg) => {
                    return Expr::apply(
                        Func::Exp,
                        Expr::product(vec![arg.as_ref().clone(), exp.clone()]),
                    );
                }
                Expr::Mul(fs) => {
                    return Expr::product(
                        fs.iter()
                            .map(|f| Expr::power(f.clone(), exp.clone()))
                            .collect(),
                    );
                }
                _ => {}
            }
        }

        // (c*u)**q with c > 0 pulls the number out
        if let (Expr::Mul(fs), Expr::Number(q)) = (&base, &exp) {
            if let Some(Expr::Number(c)) = fs.first() {
                if c.is_positive() && q.is_exact() {
                    let rest = if fs.len() == 2 {
                        fs[1].clone()
                    } else {
                        Expr::Mul(fs[1..].to_vec())
                    };
                    return Expr::product(vec![
                        pow_numbers(c, q),
                        Expr::Pow(Box::new(rest), Box::new(exp.clone())),
                    ]);
                }
            }
        }

        Expr::Pow(Box::new(base), Box::new(exp))
    }

    /// Canonical function application
    pub fn apply(f: Func, arg: Expr) -> Expr {
        if arg.is_undefined() {
            return Expr::undefined();
        }
        if arg.is_complex_infinity() {
            return match f {
                Func::Log => Expr::complex_infinity(),
                Func::Abs => Expr::infinity(),
                _ => Expr::undefined(),
            };
        }
        if let Expr::Number(Number::Float(v)) = arg {
            if let Some(r) = f.eval_real(v) {
                return Expr::float(r);
            }
        }
        if let Some(special) = crate::functions::special_value(f, &arg) {
            return special;
        }
        if arg.could_extract_minus_sign() {
            let flipped = -arg.clone();
            match f {
                Func::Sin | Func::Tan | Func::Asin | Func::Atan | Func::Sinh | Func::Tanh => {
                    return -Expr::apply(f, flipped);
                }
                Func::Cos | Func::Cosh | Func::Abs => return Expr::apply(f, flipped),
                _ => {}
            }
        }
        Expr::Func(f, Box::new(arg))
    }

    pub fn sqrt(arg: Expr) -> Expr {
        Expr::power(arg, Expr::rational(1, 2))
    }

    /// Replace every occurrence of `s` with `value`, re-canonicalizing on the way up
    pub fn substitute(&self, s: &Symbol, value: &Expr) -> Expr {
        match self {
            Expr::Symbol(t) if t == s => value.clone(),
            Expr::Add(ts) => Expr::sum(ts.iter().map(|t| t.substitute(s, value)).collect()),
            Expr::Mul(fs) => Expr::product(fs.iter().map(|f| f.substitute(s, value)).collect()),
            Expr::Pow(b, e) => Expr::power(b.substitute(s, value), e.substitute(s, value)),
            Expr::Func(f, a) => Expr::apply(*f, a.substitute(s, value)),
            _ => self.clone(),
        }
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Total order used to sort the operands of sums and products
    pub fn cmp_canonical(&self, other: &Expr) -> Ordering {
        sort_class(self)
            .cmp(&sort_class(other))
            .then_with(|| match (self, other) {
                (Expr::Number(a), Expr::Number(b)) => a
                    .cmp_value(b)
                    .then_with(|| a.is_float().cmp(&b.is_float())),
                (Expr::Symbol(a), Expr::Symbol(b)) => a.cmp(b),
                (Expr::Constant(a), Expr::Constant(b)) => a.cmp(b),
                (Expr::Func(f, a), Expr::Func(g, b)) => f.cmp(g).then_with(|| a.cmp_canonical(b)),
                (Expr::Add(a), Expr::Add(b)) | (Expr::Mul(a), Expr::Mul(b)) => cmp_slices(a, b),
                _ => {
                    let (ba, ea) = self.base_exp();
                    let (bb, eb) = other.base_exp();
                    ba.cmp_canonical(bb).then_with(|| ea.cmp_canonical(&eb))
                }
            })
    }
}

fn sort_class(e: &Expr) -> u8 {
    match e {
        Expr::Number(_) => 0,
        Expr::Pow(b, _) if matches!(b.as_ref(), Expr::Number(_)) => 1,
        Expr::Constant(Constant::ImaginaryUnit) => 8,
        Expr::Constant(_) => 2,
        Expr::Symbol(_) => 3,
        Expr::Mul(_) => 4,
        Expr::Add(_) => 5,
        Expr::Func(..) => 7,
        Expr::Pow(b, _) => sort_class(b).max(2),
    }
}

fn cmp_slices(a: &[Expr], b: &[Expr]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = x.cmp_canonical(y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

pub(crate) fn sort_canonical(v: &mut [Expr]) {
    v.sort_by(|a, b| a.cmp_canonical(b));
}

fn merge_power(groups: &mut Vec<(Expr, Expr)>, base: Expr, exp: Expr) {
    match groups.iter_mut().find(|(b, _)| *b == base) {
        Some((_, e)) => *e = Expr::sum(vec![e.clone(), exp]),
        None => groups.push((base, exp)),
    }
}

/// Sign of `coeff * oo * others` when every other factor is a nonzero real constant
fn infinity_product_sign(coeff: &Number, rest: &[Expr], inf_pos: usize) -> Option<f64> {
    let mut sign = coeff.to_f64().signum();
    for (i, f) in rest.iter().enumerate() {
        if i == inf_pos {
            continue;
        }
        if !f.is_symbol_free() {
            return None;
        }
        match f.real_value() {
            Some(v) if v != 0.0 => sign *= v.signum(),
            _ => return None,
        }
    }
    Some(sign)
}

/// Power of two numbers, keeping exact radicals in simplest form
fn pow_numbers(b: &Number, e: &Number) -> Expr {
    let (Some(br), Some(er)) = (b.as_ratio(), e.as_ratio()) else {
        return pow_floats(b, e);
    };
    if br.is_zero() {
        return if er.is_negative() {
            Expr::complex_infinity()
        } else {
            Expr::zero()
        };
    }
    let raw = || Expr::Pow(Box::new(Expr::Number(b.clone())), Box::new(Expr::Number(e.clone())));

    if er.is_integer() {
        return match b.pow_big(er.numer()) {
            Some(v) => Expr::number(v),
            None => raw(),
        };
    }
    if br.is_negative() {
        // (-q)**(k/2) = q**(k/2) * I**k
        if *er.denom() == BigInt::from(2) {
            let quarter = er.numer().mod_floor(&BigInt::from(4)).to_i64().unwrap_or(0);
            return Expr::product(vec![
                pow_numbers(&-b.clone(), e),
                Expr::power(Expr::i(), Expr::int(quarter)),
            ]);
        }
        return raw();
    }

    // Split off the integer part of the exponent: en/ed = k + r/ed
    let Some(q) = er.denom().to_u32() else {
        return raw();
    };
    let (k, r) = er.numer().div_mod_floor(er.denom());
    match b.pow_big(&k) {
        Some(whole) => Expr::scaled(whole, rational_root(br, &r, q)),
        None => raw(),
    }
}

/// Power with a float on either side; `0.0**-1` is still `zoo`
fn pow_floats(b: &Number, e: &Number) -> Expr {
    let ef = e.to_f64();
    if b.is_zero() && ef < 0.0 {
        return Expr::complex_infinity();
    }
    if b.is_negative() && ef.fract() != 0.0 {
        let magnitude = b.abs().powf(ef);
        let angle = std::f64::consts::PI * ef;
        return Expr::sum(vec![
            Expr::number(magnitude.clone() * Number::float(angle.cos())),
            Expr::product(vec![
                Expr::number(magnitude * Number::float(angle.sin())),
                Expr::i(),
            ]),
        ]);
    }
    Expr::number(b.powf(ef))
}

/// `base**(p/q)` for positive `base` and `0 < p < q`
fn rational_root(base: &BigRational, p: &BigInt, q: u32) -> Expr {
    let raw = || {
        Expr::Pow(
            Box::new(Expr::Number(Number::from_ratio(base.clone()))),
            Box::new(Expr::Number(Number::from_ratio(BigRational::new(
                p.clone(),
                BigInt::from(q),
            )))),
        )
    };
    let (n, d) = (base.numer(), base.denom());

    if let (Some(rn), Some(rd)) = (number::exact_root(n, q), number::exact_root(d, q)) {
        return match Number::from_ratio(BigRational::new(rn, rd)).pow_big(p) {
            Some(v) => Expr::Number(v),
            None => raw(),
        };
    }
    if !p.is_one() {
        return raw();
    }

    // (n/d)**(1/q) = (n * d**(q-1))**(1/q) / d
    if !d.is_one() && d.bits().saturating_mul(u64::from(q - 1)) > MAX_EXACT_BITS {
        return raw();
    }
    let radicand = n * d.pow(q - 1);
    let (outside, inside) = number::extract_root(&radicand, q);
    let coeff = Number::from_ratio(BigRational::new(outside, d.clone()));
    if inside.is_one() {
        return Expr::Number(coeff);
    }
    let radical = Expr::Pow(
        Box::new(Expr::Number(Number::from_integer(inside))),
        Box::new(Expr::Number(Number::rational(1, i64::from(q)))),
    );
    Expr::scaled(coeff, radical)
}

// ============================================================================
// Operator sugar
// ============================================================================

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, rhs])
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, -rhs])
    }
}

impl std::ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, rhs])
    }
}

impl std::ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, Expr::power(rhs, Expr::int(-1))])
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::product(vec![Expr::int(-1), self])
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        Expr::symbol(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::Symbol(Symbol::new("x").unwrap())
    }

    fn y() -> Expr {
        Expr::Symbol(Symbol::new("y").unwrap())
    }

    // ========================================================================
    // Symbols
    // ========================================================================

    #[test]
    fn test_symbol_validation() {
        assert!(Symbol::new("x").is_ok());
        assert!(Symbol::new("theta_1").is_ok());
        assert!(Symbol::new("").is_err());
        assert!(Symbol::new("2x").is_err());
        assert!(Symbol::new("x y").is_err());
    }

    // ========================================================================
    // Sums and products
    // ========================================================================

    #[test]
    fn test_collect_like_terms() {
        let e = x() + x() + Expr::int(2) * x();
        assert_eq!(e, Expr::int(4) * x());
        assert_eq!(x() - x(), Expr::zero());
    }

    #[test]
    fn test_sum_is_order_independent() {
        assert_eq!(x() + y() + Expr::one(), Expr::one() + y() + x());
    }

    #[test]
    fn test_product_merges_powers() {
        let e = x() * x() * x();
        assert_eq!(e, Expr::power(x(), Expr::int(3)));
        assert_eq!(x() / x(), Expr::one());
    }

    #[test]
    fn test_coefficient_distributes_over_sum() {
        let e = Expr::int(2) * (x() + Expr::one());
        assert_eq!(e, Expr::int(2) * x() + Expr::int(2));
    }

    #[test]
    fn test_exp_products_combine() {
        let e = Expr::apply(Func::Exp, x()) * Expr::apply(Func::Exp, -x());
        assert_eq!(e, Expr::one());
    }

    #[test]
    fn test_infinity_arithmetic() {
        assert_eq!(Expr::infinity() + Expr::one(), Expr::infinity());
        assert_eq!(Expr::infinity() - Expr::infinity(), Expr::undefined());
        assert_eq!(Expr::zero() * Expr::infinity(), Expr::undefined());
        assert_eq!(-Expr::infinity(), Expr::neg_infinity());
        assert_eq!(Expr::power(Expr::infinity(), Expr::int(-1)), Expr::zero());
    }

    // ========================================================================
    // Powers
    // ========================================================================

    #[test]
    fn test_radical_simplification() {
        let sqrt8 = Expr::sqrt(Expr::int(8));
        assert_eq!(sqrt8, Expr::int(2) * Expr::sqrt(Expr::int(2)));
        assert_eq!(Expr::sqrt(Expr::int(9)), Expr::int(3));
        assert_eq!(Expr::sqrt(Expr::int(2)) * Expr::sqrt(Expr::int(2)), Expr::int(2));
    }

    #[test]
    fn test_negative_radicand_is_imaginary() {
        assert_eq!(Expr::sqrt(Expr::int(-4)), Expr::int(2) * Expr::i());
        assert_eq!(Expr::i() * Expr::i(), Expr::int(-1));
    }

    #[test]
    fn test_reciprocal_radical_is_rationalized() {
        let e = Expr::one() / Expr::sqrt(Expr::int(2));
        assert_eq!(e, Expr::rational(1, 2) * Expr::sqrt(Expr::int(2)));
    }

    #[test]
    fn test_division_by_zero_is_complex_infinity() {
        assert!(Expr::power(Expr::zero(), Expr::int(-1)).is_complex_infinity());
        assert!(Expr::power(Expr::float(0.0), Expr::int(-2)).is_complex_infinity());
        assert!((Expr::one() / Expr::zero()).is_complex_infinity());
        assert!((Expr::zero() / Expr::zero()).is_undefined());
    }

    #[test]
    fn test_complex_infinity_arithmetic() {
        let zoo = Expr::complex_infinity();
        assert_eq!(zoo.clone() + Expr::one(), zoo);
        assert_eq!(Expr::int(3) * zoo.clone(), zoo);
        assert!((zoo.clone() + Expr::infinity()).is_undefined());
        assert!((zoo.clone() + zoo.clone()).is_undefined());
        assert_eq!(Expr::power(zoo.clone(), Expr::int(-1)), Expr::zero());
        assert_eq!(Expr::apply(Func::Abs, zoo.clone()), Expr::infinity());
        assert!(Expr::apply(Func::Sin, zoo).is_undefined());
    }

    #[test]
    fn test_large_powers_stay_exact() {
        let e = Expr::power(Expr::int(10), Expr::int(400));
        assert_eq!(e.to_string(), format!("1{}", "0".repeat(400)));

        // 3**1024 is exact, 2**(3**1024) is left unevaluated
        let tower = Expr::power(
            Expr::int(2),
            Expr::power(Expr::int(3), Expr::power(Expr::int(4), Expr::int(5))),
        );
        match &tower {
            Expr::Pow(b, e) => {
                assert_eq!(b.as_integer(), Some(2));
                assert!(e.as_number().is_some_and(|n| n.is_integer()));
            }
            other => panic!("expected an unevaluated power, got {other}"),
        }
    }

    #[test]
    fn test_large_radical() {
        let n = Expr::power(Expr::int(10), Expr::int(40));
        assert_eq!(Expr::sqrt(n), Expr::power(Expr::int(10), Expr::int(20)));
        let e = Expr::sqrt(Expr::power(Expr::int(2), Expr::int(101)));
        assert_eq!(
            e,
            Expr::power(Expr::int(2), Expr::int(50)) * Expr::sqrt(Expr::int(2))
        );
    }

    #[test]
    fn test_substitute() {
        let e = Expr::power(x(), Expr::int(2)) + x();
        assert_eq!(e.substitute(&Symbol::new("x").unwrap(), &Expr::int(3)), Expr::int(12));
    }
}
