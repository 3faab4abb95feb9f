//! Arithmetic on expanded placeholder text.
//!
//! Supports `+ - * / ^`, unary signs, parentheses, the constant `PI` and the
//! functions `sqrt abs exp ln log sin cos tan`. `^` is right-associative and
//! binds tighter than unary minus on its left operand, as in `-2^2 == -4`.

use crate::error::TemplateError;
use crate::render::{placeholders, render};
use crate::value::VarBag;

/// Evaluates an arithmetic expression with no placeholders left in it.
///
/// # Errors
///
/// Returns [`TemplateError::Syntax`] for malformed input or a non-finite
/// result, and [`TemplateError::DivisionByZero`] when a divisor is zero.
pub fn evaluate(expression: &str) -> Result<f64, TemplateError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        source: expression,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    if !value.is_finite() {
        return Err(parser.error("result is not a finite number"));
    }
    Ok(value)
}

/// Expands `text` against `vars`, then evaluates it.
///
/// # Errors
///
/// Returns [`TemplateError::Unresolved`] naming the first placeholder that
/// has no binding, or any error of [`evaluate`].
pub fn evaluate_with(text: &str, vars: &VarBag) -> Result<f64, TemplateError> {
    let expanded = render(text, vars);
    if let Some(name) = placeholders(&expanded).first() {
        return Err(TemplateError::Unresolved((*name).to_owned()));
    }
    evaluate(&expanded)
}

/// Rounds to `digits` decimal places.
#[must_use]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Num(f64),
    Ident(String),
    Op(char),
    Open,
    Close,
}

fn tokenize(source: &str) -> Result<Vec<Tok>, TemplateError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' | '-' | '*' | '/' | '^' => {
                tokens.push(Tok::Op(c));
                i += 1;
            }
            '(' => {
                tokens.push(Tok::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Tok::Close);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|_| TemplateError::Syntax {
                    expression: source.to_owned(),
                    reason: format!("bad number `{text}`"),
                })?;
                tokens.push(Tok::Num(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Tok::Ident(chars[start..i].iter().collect()));
            }
            other => {
                return Err(TemplateError::Syntax {
                    expression: source.to_owned(),
                    reason: format!("unexpected character `{other}`"),
                })
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Tok],
    pos: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> TemplateError {
        TemplateError::Syntax {
            expression: self.source.to_owned(),
            reason: reason.to_owned(),
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expr(&mut self) -> Result<f64, TemplateError> {
        let mut acc = self.term()?;
        while let Some(Tok::Op(op @ ('+' | '-'))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == '+' { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, TemplateError> {
        let mut acc = self.unary()?;
        while let Some(Tok::Op(op @ ('*' | '/'))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.unary()?;
            if op == '*' {
                acc *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(TemplateError::DivisionByZero(self.source.to_owned()));
                }
                acc /= rhs;
            }
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<f64, TemplateError> {
        match self.peek() {
            Some(Tok::Op('-')) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Tok::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, TemplateError> {
        let base = self.atom()?;
        if let Some(Tok::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, TemplateError> {
        match self.next() {
            Some(Tok::Num(v)) => Ok(v),
            Some(Tok::Open) => {
                let v = self.expr()?;
                match self.next() {
                    Some(Tok::Close) => Ok(v),
                    _ => Err(self.error("missing `)`")),
                }
            }
            Some(Tok::Ident(name)) => {
                if let Some(Tok::Open) = self.peek() {
                    self.pos += 1;
                    let arg = self.expr()?;
                    match self.next() {
                        Some(Tok::Close) => {}
                        _ => return Err(self.error("missing `)` after function argument")),
                    }
                    apply(&name, arg)
                        .ok_or_else(|| self.error(&format!("unknown function `{name}`")))
                } else if name == "PI" {
                    Ok(std::f64::consts::PI)
                } else {
                    Err(self.error(&format!("unknown name `{name}`")))
                }
            }
            Some(Tok::Op(op)) => Err(self.error(&format!("unexpected operator `{op}`"))),
            Some(Tok::Close) => Err(self.error("unexpected `)`")),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}

fn apply(function: &str, arg: f64) -> Option<f64> {
    let v = match function {
        "sqrt" => arg.sqrt(),
        "abs" => arg.abs(),
        "exp" => arg.exp(),
        "ln" => arg.ln(),
        "log" => arg.log10(),
        "sin" => arg.sin(),
        "cos" => arg.cos(),
        "tan" => arg.tan(),
        _ => return None,
    };
    Some(v)
}
