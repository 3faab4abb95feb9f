//! `${name}` placeholder expansion.
//!
//! Placeholders bound to [`Value::Str`] are expanded recursively, up to a
//! fixed depth. Unbound placeholders are left untouched so that the engine
//! can resolve them at its own runtime. `\$` emits a literal `$` that is
//! never treated as the start of a placeholder.

use crate::value::{Value, VarBag};

/// Nesting limit for recursive expansion of string bindings.
pub const MAX_DEPTH: usize = 16;

/// Expands every bound `${name}` in `template`.
#[must_use]
pub fn render(template: &str, vars: &VarBag) -> String {
    expand(template, vars, 0)
}

/// Renders a single value the way it would appear in place of a placeholder.
#[must_use]
pub fn render_value(value: &Value, vars: &VarBag) -> String {
    substitute(value, vars, 0)
}

/// Names of the `${name}` placeholders still present in `text`.
#[must_use]
pub fn placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    scan(text, |token| {
        if let Token::Placeholder(name, _) = token {
            found.push(name);
        }
    });
    found
}

/// Turns `%` comment markers at the start of a line into `#`.
#[must_use]
pub fn comment_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('%') {
            out.push_str(&line[..line.len() - trimmed.len()]);
            out.push('#');
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Drops blank lines and `#` comment lines.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

enum Token<'a> {
    Text(&'a str),
    Dollar,
    /// Placeholder name and its full `${name}` source text.
    Placeholder(&'a str, &'a str),
}

fn scan<'a>(text: &'a str, mut emit: impl FnMut(Token<'a>)) {
    let mut rest = text;
    while let Some(pos) = rest.find(['$', '\\']) {
        emit(Token::Text(&rest[..pos]));
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("\\$") {
            emit(Token::Dollar);
            rest = after;
            continue;
        }
        if tail.starts_with('\\') {
            emit(Token::Text("\\"));
            rest = &tail[1..];
            continue;
        }
        // tail starts with '$'
        if let Some(body) = tail.strip_prefix("${") {
            if let Some(end) = body.find('}') {
                let name = &body[..end];
                if is_identifier(name) {
                    emit(Token::Placeholder(name, &tail[..end + 3]));
                    rest = &body[end + 1..];
                    continue;
                }
            }
        }
        emit(Token::Dollar);
        rest = &tail[1..];
    }
    emit(Token::Text(rest));
}

fn expand(text: &str, vars: &VarBag, depth: usize) -> String {
    let mut out = String::with_capacity(text.len());
    scan(text, |token| match token {
        Token::Text(t) => out.push_str(t),
        Token::Dollar => out.push('$'),
        Token::Placeholder(name, source) => match vars.get(name) {
            Some(value) => out.push_str(&substitute(value, vars, depth)),
            None => out.push_str(source),
        },
    });
    out
}

fn substitute(value: &Value, vars: &VarBag, depth: usize) -> String {
    match value {
        Value::Verbatim(s) => s.clone(),
        Value::Str(s) if depth >= MAX_DEPTH => s.clone(),
        Value::Str(s) => expand(s, vars, depth + 1),
        Value::List(items) => items
            .iter()
            .map(|item| substitute(item, vars, depth))
            .collect::<Vec<_>>()
            .join(" "),
        Value::Int(_) | Value::Float(_) => value.to_string(),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
