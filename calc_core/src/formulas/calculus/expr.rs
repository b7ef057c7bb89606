//! Safe single-variable expression language.
//!
//! User-typed functions (`3x^2 + sin(x)`) are parsed into an [`Expr`] tree
//! by a small recursive-descent parser. Nothing outside this grammar is
//! ever evaluated:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary | <implicit> power)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?          right-associative
//! primary := number | 'x' | 'pi' | 'e' | func '(' expr ')' | '(' expr ')'
//! func    := sin | cos | tan | exp | ln | log | sqrt | abs
//! ```
//!
//! Implicit multiplication applies when a factor is directly followed by an
//! identifier or an opening parenthesis: `2x`, `3(x+1)`, `(x+1)(x-1)`.
//! `**` is accepted as an alias for `^`.
//!
//! Input is capped at [`MAX_TOKENS`] tokens and [`MAX_NESTING`] levels of
//! brackets, calls, exponents and signs, so the parser and every recursive
//! walk over the tree run in bounded stack.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::numeric::fmt_num;

/// Whitelisted functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    /// Base-10 logarithm
    Log,
    Sqrt,
    Abs,
}

impl Func {
    fn from_name(name: &str) -> Option<Func> {
        match name {
            "sin" | "sen" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" | "tg" => Some(Func::Tan),
            "exp" => Some(Func::Exp),
            "ln" => Some(Func::Ln),
            "log" => Some(Func::Log),
            "sqrt" | "raiz" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
        }
    }
}

/// Named constants kept symbolic for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

/// Expression tree over the single variable `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Num(f64),
    Const(Constant),
    Var,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

// ============================================================================
// Simplifying constructors
// ============================================================================

impl Expr {
    fn is_num(&self, v: f64) -> bool {
        matches!(self, Expr::Num(n) if *n == v)
    }

    pub fn neg(a: Expr) -> Expr {
        match a {
            Expr::Num(n) => Expr::Num(-n),
            Expr::Neg(inner) => *inner,
            a => Expr::Neg(Box::new(a)),
        }
    }

    pub fn add(a: Expr, b: Expr) -> Expr {
        match (a, b) {
            (a, b) if a.is_num(0.0) => b,
            (a, b) if b.is_num(0.0) => a,
            (Expr::Num(x), Expr::Num(y)) => Expr::Num(x + y),
            (a, b) => Expr::Add(Box::new(a), Box::new(b)),
        }
    }

    pub fn sub(a: Expr, b: Expr) -> Expr {
        match (a, b) {
            (a, b) if b.is_num(0.0) => a,
            (a, b) if a.is_num(0.0) => Expr::neg(b),
            (Expr::Num(x), Expr::Num(y)) => Expr::Num(x - y),
            (a, b) => Expr::Sub(Box::new(a), Box::new(b)),
        }
    }

    pub fn mul(a: Expr, b: Expr) -> Expr {
        match (a, b) {
            (a, b) if a.is_num(0.0) || b.is_num(0.0) => Expr::Num(0.0),
            (a, b) if a.is_num(1.0) => b,
            (a, b) if b.is_num(1.0) => a,
            (Expr::Num(x), Expr::Num(y)) => Expr::Num(x * y),
            (Expr::Num(x), Expr::Mul(l, r)) if matches!(*l, Expr::Num(_)) => match *l {
                Expr::Num(y) => Expr::mul(Expr::Num(x * y), *r),
                l => Expr::Mul(Box::new(Expr::Num(x)), Box::new(Expr::Mul(Box::new(l), r))),
            },
            // Constants to the front so they fold with their neighbours
            (a, Expr::Num(y)) => Expr::mul(Expr::Num(y), a),
            (a, b) => Expr::Mul(Box::new(a), Box::new(b)),
        }
    }

    pub fn div(a: Expr, b: Expr) -> Expr {
        match (a, b) {
            (a, _) if a.is_num(0.0) => Expr::Num(0.0),
            (a, b) if b.is_num(1.0) => a,
            (Expr::Num(x), Expr::Num(y)) if y != 0.0 => Expr::Num(x / y),
            (a, b) => Expr::Div(Box::new(a), Box::new(b)),
        }
    }

    pub fn pow(a: Expr, b: Expr) -> Expr {
        match (a, b) {
            (_, b) if b.is_num(0.0) => Expr::Num(1.0),
            (a, b) if b.is_num(1.0) => a,
            (Expr::Num(x), Expr::Num(y)) if x.powf(y).is_finite() => Expr::Num(x.powf(y)),
            (a, b) => Expr::Pow(Box::new(a), Box::new(b)),
        }
    }

    pub fn call(f: Func, a: Expr) -> Expr {
        Expr::Call(f, Box::new(a))
    }

    /// True when the subtree does not mention `x`
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Num(_) | Expr::Const(_) => true,
            Expr::Var => false,
            Expr::Neg(a) | Expr::Call(_, a) => a.is_constant(),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
                a.is_constant() && b.is_constant()
            }
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

impl Expr {
    /// Evaluate at `x`.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` for a zero divisor, `DomainError` for logarithms of
    /// non-positive numbers, square roots of negatives, and any other
    /// operation that would produce NaN or infinity.
    pub fn eval(&self, x: f64) -> CalcResult<f64> {
        let value = match self {
            Expr::Num(n) => *n,
            Expr::Const(c) => c.value(),
            Expr::Var => x,
            Expr::Neg(a) => -a.eval(x)?,
            Expr::Add(a, b) => a.eval(x)? + b.eval(x)?,
            Expr::Sub(a, b) => a.eval(x)? - b.eval(x)?,
            Expr::Mul(a, b) => a.eval(x)? * b.eval(x)?,
            Expr::Div(a, b) => {
                let d = b.eval(x)?;
                if d == 0.0 {
                    return Err(CalcError::division_by_zero("expression", b.to_string()));
                }
                a.eval(x)? / d
            }
            Expr::Pow(a, b) => a.eval(x)?.powf(b.eval(x)?),
            Expr::Call(f, a) => {
                let v = a.eval(x)?;
                match f {
                    Func::Sin => v.sin(),
                    Func::Cos => v.cos(),
                    Func::Tan => v.tan(),
                    Func::Exp => v.exp(),
                    Func::Ln | Func::Log if v <= 0.0 => {
                        return Err(CalcError::domain(
                            "expression",
                            format!("{}({}) is undefined for {}", f.name(), a, fmt_num(v, 6)),
                        ))
                    }
                    Func::Ln => v.ln(),
                    Func::Log => v.log10(),
                    Func::Sqrt if v < 0.0 => {
                        return Err(CalcError::domain(
                            "expression",
                            format!("sqrt({}) is undefined for {}", a, fmt_num(v, 6)),
                        ))
                    }
                    Func::Sqrt => v.sqrt(),
                    Func::Abs => v.abs(),
                }
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CalcError::domain("expression", format!("{} is not a finite number at x = {}", self, fmt_num(x, 6))))
        }
    }
}

// ============================================================================
// Symbolic differentiation
// ============================================================================

impl Expr {
    /// d/dx of the expression, lightly simplified.
    pub fn derivative(&self) -> Expr {
        use Expr as E;
        match self {
            E::Num(_) | E::Const(_) => E::Num(0.0),
            E::Var => E::Num(1.0),
            E::Neg(a) => E::neg(a.derivative()),
            E::Add(a, b) => E::add(a.derivative(), b.derivative()),
            E::Sub(a, b) => E::sub(a.derivative(), b.derivative()),
            E::Mul(a, b) => E::add(
                E::mul(a.derivative(), (**b).clone()),
                E::mul((**a).clone(), b.derivative()),
            ),
            E::Div(a, b) => E::div(
                E::sub(
                    E::mul(a.derivative(), (**b).clone()),
                    E::mul((**a).clone(), b.derivative()),
                ),
                E::pow((**b).clone(), E::Num(2.0)),
            ),
            E::Pow(a, b) if b.is_constant() => {
                // n * a^(n-1) * a'
                E::mul(
                    E::mul((**b).clone(), E::pow((**a).clone(), E::sub((**b).clone(), E::Num(1.0)))),
                    a.derivative(),
                )
            }
            E::Pow(a, b) if a.is_constant() => {
                // a^b * ln(a) * b'
                E::mul(
                    E::mul(self.clone(), E::call(Func::Ln, (**a).clone())),
                    b.derivative(),
                )
            }
            E::Pow(a, b) => {
                // a^b * (b' ln a + b a' / a)
                E::mul(
                    self.clone(),
                    E::add(
                        E::mul(b.derivative(), E::call(Func::Ln, (**a).clone())),
                        E::div(E::mul((**b).clone(), a.derivative()), (**a).clone()),
                    ),
                )
            }
            E::Call(f, a) => {
                let inner = (**a).clone();
                let da = a.derivative();
                let outer = match f {
                    Func::Sin => E::call(Func::Cos, inner),
                    Func::Cos => E::neg(E::call(Func::Sin, inner)),
                    Func::Tan => E::div(E::Num(1.0), E::pow(E::call(Func::Cos, inner), E::Num(2.0))),
                    Func::Exp => E::call(Func::Exp, inner),
                    Func::Ln => E::div(E::Num(1.0), inner),
                    Func::Log => E::div(E::Num(1.0), E::mul(inner, E::Num(std::f64::consts::LN_10))),
                    Func::Sqrt => E::div(E::Num(1.0), E::mul(E::Num(2.0), E::call(Func::Sqrt, inner))),
                    Func::Abs => E::div(inner.clone(), E::call(Func::Abs, inner)),
                };
                E::mul(outer, da)
            }
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(_) => 3,
            Expr::Num(n) if *n < 0.0 => 3,
            Expr::Pow(..) => 4,
            _ => 5,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        if self.precedence() < min_prec {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Shortest round-trip form; never scientific, so it parses back
            Expr::Num(n) if *n == 0.0 => write!(f, "0"),
            Expr::Num(n) => write!(f, "{}", n),
            Expr::Const(Constant::Pi) => write!(f, "pi"),
            Expr::Const(Constant::E) => write!(f, "e"),
            Expr::Var => write!(f, "x"),
            Expr::Neg(a) => {
                write!(f, "-")?;
                a.fmt_child(f, 3)
            }
            Expr::Add(a, b) => {
                a.fmt_child(f, 1)?;
                write!(f, " + ")?;
                b.fmt_child(f, 1)
            }
            Expr::Sub(a, b) => {
                a.fmt_child(f, 1)?;
                write!(f, " - ")?;
                b.fmt_child(f, 2)
            }
            Expr::Mul(a, b) => {
                a.fmt_child(f, 2)?;
                write!(f, "*")?;
                b.fmt_child(f, 3)
            }
            Expr::Div(a, b) => {
                a.fmt_child(f, 2)?;
                write!(f, "/")?;
                b.fmt_child(f, 4)
            }
            Expr::Pow(a, b) => {
                a.fmt_child(f, 5)?;
                write!(f, "^")?;
                b.fmt_child(f, 4)
            }
            Expr::Call(func, a) => write!(f, "{}({})", func.name(), a),
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> CalcResult<Vec<(usize, Token)>> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let mut seen_dot = false;
                while i < chars.len() && (chars[i].is_ascii_digit() || (chars[i] == '.' && !seen_dot)) {
                    seen_dot |= chars[i] == '.';
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::parse_error(src, start, format!("'{}' is not a number", text)))?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            c if c.is_alphabetic() && c != 'π' => {
                while i < chars.len() && chars[i].is_alphabetic() && chars[i] != 'π' {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect::<String>().to_lowercase();
                tokens.push((start, Token::Ident(name)));
                continue;
            }
            'π' => tokens.push((start, Token::Ident("pi".to_string()))),
            '+' => tokens.push((start, Token::Plus)),
            '-' | '−' => tokens.push((start, Token::Minus)),
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push((start, Token::Caret));
                i += 1;
            }
            '*' | '·' | '×' => tokens.push((start, Token::Star)),
            '/' | '÷' => tokens.push((start, Token::Slash)),
            '^' => tokens.push((start, Token::Caret)),
            '(' => tokens.push((start, Token::LParen)),
            ')' => tokens.push((start, Token::RParen)),
            other => {
                return Err(CalcError::parse_error(src, start, format!("unexpected character '{}'", other)));
            }
        }
        i += 1;
    }

    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// Deepest bracket, function or sign nesting `parse` accepts
pub const MAX_NESTING: usize = 128;

/// Longest expression `parse` accepts, in tokens
pub const MAX_TOKENS: usize = 1024;

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(o, _)| *o)
            .unwrap_or_else(|| self.src.chars().count())
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        t
    }

    fn error(&self, reason: impl Into<String>) -> CalcError {
        CalcError::parse_error(self.src, self.offset(), reason)
    }

    fn expr(&mut self) -> CalcResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next();
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.next();
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> CalcResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Slash) => {
                    self.next();
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Ident(_)) | Some(Token::LParen) => {
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.power()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> CalcResult<Expr> {
        // Every recursive path (brackets, calls, exponents, signs) passes here
        if self.depth >= MAX_NESTING {
            return Err(self.error("expression nested too deeply"));
        }
        self.depth += 1;
        let result = self.unary_inner();
        self.depth -= 1;
        result
    }

    fn unary_inner(&mut self) -> CalcResult<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.next();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> CalcResult<Expr> {
        let base = self.primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.next();
            let exponent = self.unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> CalcResult<Expr> {
        let at = self.offset();
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Num(n)),
            Some(Token::Ident(name)) => match name.as_str() {
                "x" => Ok(Expr::Var),
                "pi" => Ok(Expr::Const(Constant::Pi)),
                "e" => Ok(Expr::Const(Constant::E)),
                other => {
                    let func = Func::from_name(other)
                        .ok_or_else(|| CalcError::parse_error(self.src, at, format!("unknown name '{}'", other)))?;
                    match self.next() {
                        Some(Token::LParen) => {}
                        _ => return Err(self.error(format!("expected '(' after {}", func.name()))),
                    }
                    let arg = self.expr()?;
                    match self.next() {
                        Some(Token::RParen) => Ok(Expr::Call(func, Box::new(arg))),
                        _ => Err(self.error("expected ')'")),
                    }
                }
            },
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(self.error("expected ')'")),
                }
            }
            Some(other) => Err(CalcError::parse_error(self.src, at, format!("unexpected {:?}", other))),
            None => Err(CalcError::parse_error(self.src, at, "unexpected end of expression")),
        }
    }
}

/// Parse a user-supplied expression in `x`.
pub fn parse(src: &str) -> CalcResult<Expr> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(CalcError::parse_error(src, 0, "empty expression"));
    }
    if let Some((at, _)) = tokens.get(MAX_TOKENS) {
        return Err(CalcError::parse_error(
            src,
            *at,
            format!("expression longer than {} tokens", MAX_TOKENS),
        ));
    }
    let mut parser = Parser {
        src,
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(src: &str, x: f64) -> f64 {
        parse(src).unwrap().eval(x).unwrap()
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval("1 + 2 * 3", 0.0), 7.0);
        assert_eq!(eval("2^3^2", 0.0), 512.0);
        assert_eq!(eval("-x^2", 3.0), -9.0);
        assert_eq!(eval("(1 + 2) * 3", 0.0), 9.0);
        assert_eq!(eval("8 / 4 / 2", 0.0), 1.0);
        assert_eq!(eval("2^-1", 0.0), 0.5);
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(eval("3x^2 + 2x", 2.0), 16.0);
        assert_eq!(eval("2(x + 1)", 1.0), 4.0);
        assert_eq!(eval("(x + 1)(x - 1)", 3.0), 8.0);
        assert_eq!(eval("x(x+1)", 2.0), 6.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_relative_eq!(eval("sin(pi/2)", 0.0), 1.0, max_relative = 1e-12);
        assert_relative_eq!(eval("ln(e)", 0.0), 1.0, max_relative = 1e-12);
        assert_relative_eq!(eval("log(1000)", 0.0), 3.0, max_relative = 1e-12);
        assert_eq!(eval("sqrt(16) + abs(-2)", 0.0), 6.0);
        assert_eq!(eval("x**2", 5.0), 25.0);
    }

    #[test]
    fn test_parse_errors_report_position() {
        match parse("2 + $").unwrap_err() {
            CalcError::ParseError { position, .. } => assert_eq!(position, 4),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(parse("").is_err());
        assert!(parse("2 +").is_err());
        assert!(parse("(x + 1").is_err());
        assert!(parse("sin x").is_err());
        assert!(parse("system(x)").is_err());
        assert!(parse("x 2").is_err());
    }

    #[test]
    fn test_eval_domain_errors() {
        assert_eq!(parse("1/x").unwrap().eval(0.0).unwrap_err().error_code(), "DIVISION_BY_ZERO");
        assert_eq!(parse("ln(x)").unwrap().eval(-1.0).unwrap_err().error_code(), "DOMAIN_ERROR");
        assert_eq!(parse("sqrt(x)").unwrap().eval(-4.0).unwrap_err().error_code(), "DOMAIN_ERROR");
        assert!(parse("x^0.5").unwrap().eval(-4.0).is_err());
    }

    #[test]
    fn test_derivative_display() {
        assert_eq!(parse("x^2").unwrap().derivative().to_string(), "2*x");
        assert_eq!(parse("3x^2 + 2x").unwrap().derivative().to_string(), "6*x + 2");
        assert_eq!(parse("sin(x)").unwrap().derivative().to_string(), "cos(x)");
    }

    #[test]
    fn test_tiny_coefficients_survive_display() {
        let d = parse("0.0000001x^2").unwrap().derivative();
        assert_eq!(d.to_string(), "0.0000002*x");
        assert_eq!(parse(&d.to_string()).unwrap(), d);
        assert_eq!(parse("0 * x").unwrap().derivative().to_string(), "0");
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let n = MAX_NESTING + 10;
        let nested = format!("{}x{}", "(".repeat(n), ")".repeat(n));
        match parse(&nested).unwrap_err() {
            CalcError::ParseError { reason, .. } => assert!(reason.contains("nested too deeply"), "{}", reason),
            other => panic!("unexpected {:?}", other),
        }

        let signs = format!("{}x", "-".repeat(n));
        assert_eq!(parse(&signs).unwrap_err().error_code(), "PARSE_ERROR");

        let calls = format!("{}x{}", "sin(".repeat(n), ")".repeat(n));
        assert_eq!(parse(&calls).unwrap_err().error_code(), "PARSE_ERROR");

        let towers = vec!["x"; n].join("^");
        assert_eq!(parse(&towers).unwrap_err().error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_nesting_below_limit_parses() {
        let n = MAX_NESTING - 10;
        let nested = format!("{}x{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(parse(&nested).unwrap(), Expr::Var);
    }

    #[test]
    fn test_huge_input_is_an_error() {
        let huge = format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(parse(&huge).unwrap_err().error_code(), "PARSE_ERROR");

        let chain = vec!["x"; MAX_TOKENS].join("+");
        match parse(&chain).unwrap_err() {
            CalcError::ParseError { reason, .. } => assert!(reason.contains("tokens"), "{}", reason),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_derivative_values() {
        let cases = [
            ("x^3", 2.0, 12.0),
            ("exp(2x)", 0.0, 2.0),
            ("ln(x)", 4.0, 0.25),
            ("1/x", 2.0, -0.25),
            ("2^x", 0.0, std::f64::consts::LN_2),
            ("x^x", 1.0, 1.0),
            ("sqrt(x)", 4.0, 0.25),
            ("cos(x)", 0.0, 0.0),
        ];
        for (src, x, expected) in cases {
            let d = parse(src).unwrap().derivative().eval(x).unwrap();
            assert!((d - expected).abs() < 1e-12, "{}' at {} = {}, expected {}", src, x, d, expected);
        }
    }

    #[test]
    fn test_display_roundtrips_through_parser() {
        for src in ["x - (x - 1)", "2/(x*3)", "(-x)^2", "x^(1/2)", "-(x + 1)"] {
            let e = parse(src).unwrap();
            let reparsed = parse(&e.to_string()).unwrap();
            for x in [0.5, 1.5, 3.0] {
                assert_relative_eq!(e.eval(x).unwrap(), reparsed.eval(x).unwrap(), max_relative = 1e-12);
            }
        }
    }
}
