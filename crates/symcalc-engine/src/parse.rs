// crates/symcalc-engine/src/parse.rs
// Tokenizer and recursive-descent parser for expression strings

use crate::error::{EngineError, Result};
use crate::expr::{Expr, Func, Symbol};
use crate::number::{Number, Wide};
use num_bigint::BigInt;

/// Parentheses nested deeper than this are rejected instead of overflowing the stack
const MAX_NESTING: usize = 200;

/// Highest order accepted by an inline `diff(f, x, n)`
const MAX_INLINE_ORDER: i64 = 1000;

/// Parser options
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Treat `^` as exponentiation instead of rejecting it
    pub convert_xor: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { convert_xor: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(s) | Token::Ident(s) => format!("'{s}'"),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::DoubleStar => "'**'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Comma => "','".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            _ if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    text.push(chars[i]);
                    i += 1;
                }
                // Exponent suffix only when digits follow
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        text.extend(&chars[i..j]);
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            text.push(chars[i]);
                            i += 1;
                        }
                    }
                }
                if text == "." || text.matches('.').count() > 1 {
                    return Err(EngineError::parse(format!("malformed number '{text}'"), start));
                }
                tokens.push((Token::Number(text), start));
                continue;
            }
            _ if c.is_alphabetic() || c == '_' => {
                let mut text = String::new();
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    text.push(chars[i]);
                    i += 1;
                }
                tokens.push((Token::Ident(text), start));
                continue;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push((Token::DoubleStar, start));
                i += 2;
                continue;
            }
            '+' => tokens.push((Token::Plus, start)),
            '-' => tokens.push((Token::Minus, start)),
            '*' => tokens.push((Token::Star, start)),
            '/' => tokens.push((Token::Slash, start)),
            '^' => tokens.push((Token::Caret, start)),
            '(' => tokens.push((Token::LParen, start)),
            ')' => tokens.push((Token::RParen, start)),
            ',' => tokens.push((Token::Comma, start)),
            other => {
                return Err(EngineError::parse(
                    format!("unexpected character '{other}'"),
                    start,
                ));
            }
        }
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
    depth: usize,
    options: ParseOptions,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(_, p)| *p).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        t
    }

    fn expect(&mut self, want: Token) -> Result<()> {
        let at = self.offset();
        match self.advance() {
            Some(t) if t == want => Ok(()),
            Some(t) => Err(EngineError::parse(
                format!("expected {} but found {}", want.describe(), t.describe()),
                at,
            )),
            None => Err(EngineError::parse(
                format!("expected {} but reached end of input", want.describe()),
                at,
            )),
        }
    }

    /// expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Expr> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    acc = acc + self.term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    acc = acc - self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    /// term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<Expr> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    acc = acc * self.unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    acc = acc / self.unary()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    /// unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                self.nested(|p| p.unary()).map(|e| -e)
            }
            Some(Token::Plus) => {
                self.advance();
                self.nested(|p| p.unary())
            }
            _ => self.power(),
        }
    }

    /// power := atom (('**' | '^') unary)?, right associative
    fn power(&mut self) -> Result<Expr> {
        let base = self.atom()?;
        match self.peek() {
            Some(Token::DoubleStar) => {
                self.advance();
                let exp = self.nested(|p| p.unary())?;
                Ok(Expr::power(base, exp))
            }
            Some(Token::Caret) if self.options.convert_xor => {
                self.advance();
                let exp = self.nested(|p| p.unary())?;
                Ok(Expr::power(base, exp))
            }
            Some(Token::Caret) => Err(EngineError::parse(
                "'^' is not exponentiation here; use '**'",
                self.offset(),
            )),
            _ => Ok(base),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(EngineError::parse("expression is nested too deeply", self.offset()));
        }
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn atom(&mut self) -> Result<Expr> {
        let at = self.offset();
        match self.advance() {
            Some(Token::Number(text)) => parse_number(&text, at),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.advance();
                    let args = self.nested(|p| p.arguments())?;
                    call(&name, args, at)
                } else {
                    named_value(&name)
                }
            }
            Some(Token::LParen) => {
                let inner = self.nested(|p| p.expr())?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(t) => Err(EngineError::parse(format!("unexpected {}", t.describe()), at)),
            None => Err(EngineError::parse("unexpected end of input", at)),
        }
    }

    /// Comma-separated arguments up to and including the closing parenthesis
    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = vec![self.expr()?];
        while self.peek() == Some(&Token::Comma) {
            self.advance();
            args.push(self.expr()?);
        }
        self.expect(Token::RParen)?;
        Ok(args)
    }
}

fn parse_number(text: &str, at: usize) -> Result<Expr> {
    let malformed = || EngineError::parse(format!("malformed number '{text}'"), at);
    let is_float = text.contains(['.', 'e', 'E']);
    if !is_float {
        return text
            .parse::<BigInt>()
            .map(|n| Expr::Number(Number::from_integer(n)))
            .map_err(|_| malformed());
    }

    let value = text.parse::<f64>().map_err(|_| malformed())?;
    let has_digits = text
        .split(['e', 'E'])
        .next()
        .is_some_and(|m| m.chars().any(|c| c.is_ascii_digit() && c != '0'));
    if value.is_finite() && (value != 0.0 || !has_digits) {
        return Ok(Expr::float(value));
    }

    // Outside the f64 range, e.g. 1e400
    let (mantissa, exponent) = text.split_once(['e', 'E']).ok_or_else(malformed)?;
    let mantissa = mantissa.parse::<f64>().map_err(|_| malformed())?;
    let exponent = exponent.parse::<i64>().map_err(|_| malformed())?;
    Ok(Expr::number(Number::from_wide(Wide::new(mantissa, exponent))))
}

fn named_value(name: &str) -> Result<Expr> {
    Ok(match name {
        "pi" => Expr::pi(),
        "E" => Expr::e(),
        "I" => Expr::i(),
        "oo" => Expr::infinity(),
        "zoo" => Expr::complex_infinity(),
        "nan" => Expr::undefined(),
        _ => Expr::Symbol(Symbol::new(name)?),
    })
}

fn arity_error(name: &str, expected: &str, got: usize, at: usize) -> EngineError {
    EngineError::parse(format!("{name}() takes {expected}, got {got}"), at)
}

/// The integration or differentiation variable of an inline calculus call
fn variable_argument(name: &str, arg: &Expr, at: usize) -> Result<Symbol> {
    match arg {
        Expr::Symbol(s) => Ok(s.clone()),
        other => Err(EngineError::parse(
            format!("{name}() needs a variable as its second argument, got {other}"),
            at,
        )),
    }
}

fn call(name: &str, mut args: Vec<Expr>, at: usize) -> Result<Expr> {
    match name {
        "sqrt" => {
            if args.len() != 1 {
                return Err(arity_error(name, "1 argument", args.len(), at));
            }
            Ok(Expr::sqrt(args.remove(0)))
        }
        "log" | "ln" if args.len() == 2 => {
            let base = args.remove(1);
            let value = args.remove(0);
            Ok(Expr::apply(Func::Log, value) / Expr::apply(Func::Log, base))
        }
        "factorial" => {
            if args.len() != 1 {
                return Err(arity_error(name, "1 argument", args.len(), at));
            }
            crate::functions::factorial(&args[0])
        }
        "limit" => {
            if args.len() != 3 {
                return Err(arity_error(name, "3 arguments", args.len(), at));
            }
            let x = variable_argument(name, &args[1], at)?;
            crate::limit::limit(&args[0], &x, &args[2])
        }
        "diff" => {
            if !(2..=3).contains(&args.len()) {
                return Err(arity_error(name, "2 or 3 arguments", args.len(), at));
            }
            let x = variable_argument(name, &args[1], at)?;
            let order = match args.get(2) {
                None => 1,
                Some(n) => n
                    .as_integer()
                    .filter(|k| (0..=MAX_INLINE_ORDER).contains(k))
                    .ok_or_else(|| {
                        EngineError::parse(
                            format!("diff() order must be an integer from 0 to {MAX_INLINE_ORDER}, got {n}"),
                            at,
                        )
                    })?,
            };
            // Bounded by MAX_INLINE_ORDER
            Ok(crate::diff::diff(&args[0], &x, order as u32))
        }
        "integrate" => {
            if args.len() != 2 {
                return Err(arity_error(name, "2 arguments", args.len(), at));
            }
            let x = variable_argument(name, &args[1], at)?;
            crate::integrate::integrate(&args[0], &x)
        }
        _ => {
            let func =
                Func::from_name(name).ok_or_else(|| EngineError::UnknownFunction(name.to_string()))?;
            if args.len() != 1 {
                return Err(arity_error(name, "1 argument", args.len(), at));
            }
            Ok(Expr::apply(func, args.remove(0)))
        }
    }
}

/// Parse an expression string
pub fn parse(input: &str, options: ParseOptions) -> Result<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EngineError::parse("empty expression", 0));
    }
    let end = input.chars().count();
    let mut parser = Parser {
        tokens,
        pos: 0,
        end,
        depth: 0,
        options,
    };
    let expr = parser.expr()?;
    if let Some(t) = parser.peek() {
        let hint = match t {
            Token::RParen => "unbalanced parentheses: unexpected ')'".to_string(),
            Token::Ident(_) | Token::Number(_) | Token::LParen => format!(
                "unexpected {}; use '*' for multiplication",
                t.describe()
            ),
            _ => format!("unexpected {}", t.describe()),
        };
        return Err(EngineError::parse(hint, parser.offset()));
    }
    Ok(expr)
}

/// Parse a variable name
pub fn parse_symbol(name: &str) -> Result<Symbol> {
    Symbol::new(name.trim())
}
