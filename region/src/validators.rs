//! Canonicalization of keyword arguments appended to `region` and
//! `fix move` commands.
//!
//! Each validator returns the exact text to splice into the command, with
//! a leading space when non-empty, e.g. `" side out"`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use regionkit_template::{evaluate_with, render_value, round_to, Value, VarBag};

use crate::error::{RegionError, Result};

/// Decimal digits kept when a placeholder expression is evaluated.
pub const EVAL_DIGITS: i32 = 6;

/// `side in|out`.
///
/// # Errors
///
/// Returns [`RegionError::Validation`] for anything but `in`, `out`, empty
/// or `none`.
pub fn side_keyword(side: Option<&str>) -> Result<String> {
    match side.map(str::trim) {
        None | Some("" | "none") => Ok(String::new()),
        Some(v @ ("in" | "out")) => Ok(format!(" side {v}")),
        Some(other) => Err(RegionError::validation(
            "side",
            format!("expected \"in\" or \"out\", got \"{other}\""),
        )),
    }
}

/// `units lattice|box`.
///
/// # Errors
///
/// Returns [`RegionError::Validation`] for anything but `lattice`, `box` or
/// empty.
pub fn units_keyword(units: Option<&str>) -> Result<String> {
    match units.map(str::trim) {
        None | Some("") => Ok(String::new()),
        Some(v @ ("lattice" | "box")) => Ok(format!(" units {v}")),
        Some(other) => Err(RegionError::validation(
            "units",
            format!("expected \"lattice\" or \"box\", got \"{other}\""),
        )),
    }
}

/// One component of a transform vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Component {
    /// Emitted as `NULL`.
    Null,
    /// A bound numeric literal.
    Number(f64),
    /// A placeholder expression, an engine variable, or a declared name.
    Text(String),
}

impl From<f64> for Component {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Component {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Component {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl<T: Into<Component>> From<Option<T>> for Component {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A `move` or `rotate` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformArg {
    /// Emitted verbatim after the keyword.
    Raw(String),
    /// Canonicalized component by component.
    Components(Vec<Component>),
}

impl<T: Into<Component>> From<Vec<T>> for TransformArg {
    fn from(v: Vec<T>) -> Self {
        Self::Components(v.into_iter().map(Into::into).collect())
    }
}

/// An `open` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenArg {
    /// One face index.
    Face(i64),
    /// Several face indices.
    Faces(Vec<i64>),
    /// Always rejected.
    Text(String),
}

/// `fix move` styles and their argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveStyle {
    /// `Vx Vy Vz`
    Linear,
    /// `Ax Ay Az period`
    Wiggle,
    /// `Px Py Pz Rx Ry Rz period`
    Rotate,
    /// `Vx Vy Vz Px Py Pz Rx Ry Rz period`
    Transrot,
    /// `v_dx v_dy v_dz v_vx v_vy v_vz`
    Variable,
}

impl MoveStyle {
    /// Returns the LAMMPS keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Wiggle => "wiggle",
            Self::Rotate => "rotate",
            Self::Transrot => "transrot",
            Self::Variable => "variable",
        }
    }

    /// Number of arguments the style takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Linear => 3,
            Self::Wiggle => 4,
            Self::Rotate => 7,
            Self::Transrot => 10,
            Self::Variable => 6,
        }
    }
}

/// Pads or truncates `components` to `arity` and resolves each one.
///
/// Padding uses `NULL`. Both padding and truncation log a warning and are
/// never errors.
///
/// # Errors
///
/// Returns [`RegionError::Validation`] when a component cannot be resolved.
pub fn canonical_components(
    argument: &str,
    components: &[Component],
    arity: usize,
    statics: &VarBag,
    dynamics: &VarBag,
) -> Result<Vec<String>> {
    if components.len() < arity {
        warn!(
            argument,
            given = components.len(),
            expected = arity,
            "padding with NULL"
        );
    } else if components.len() > arity {
        warn!(
            argument,
            given = components.len(),
            expected = arity,
            "dropping extra components"
        );
    }
    let mut out = Vec::with_capacity(arity);
    for component in components.iter().take(arity) {
        out.push(resolve(argument, component, statics, dynamics)?);
    }
    out.resize(arity, "NULL".to_owned());
    Ok(out)
}

/// ` move x y z`, or empty.
///
/// # Errors
///
/// See [`canonical_components`].
pub fn move_keyword(
    arg: Option<&TransformArg>,
    statics: &VarBag,
    dynamics: &VarBag,
) -> Result<String> {
    transform_keyword("move", 3, arg, statics, dynamics)
}

/// ` rotate theta Px Py Pz Rx Ry Rz`, or empty.
///
/// # Errors
///
/// See [`canonical_components`].
pub fn rotate_keyword(
    arg: Option<&TransformArg>,
    statics: &VarBag,
    dynamics: &VarBag,
) -> Result<String> {
    transform_keyword("rotate", 7, arg, statics, dynamics)
}

fn transform_keyword(
    keyword: &str,
    arity: usize,
    arg: Option<&TransformArg>,
    statics: &VarBag,
    dynamics: &VarBag,
) -> Result<String> {
    match arg {
        None => Ok(String::new()),
        Some(TransformArg::Raw(text)) if text.trim().is_empty() => Ok(String::new()),
        Some(TransformArg::Raw(text)) => Ok(format!(" {keyword} {}", text.trim())),
        Some(TransformArg::Components(c)) if c.is_empty() => Ok(String::new()),
        Some(TransformArg::Components(c)) => {
            let parts = canonical_components(keyword, c, arity, statics, dynamics)?;
            Ok(format!(" {keyword} {}", parts.join(" ")))
        }
    }
}

/// One ` open N` per face, or empty.
///
/// # Errors
///
/// Returns [`RegionError::Validation`] for a face outside `1..=6` and for
/// any text argument.
pub fn open_keyword(arg: Option<&OpenArg>) -> Result<String> {
    let faces: &[i64] = match arg {
        None => return Ok(String::new()),
        Some(OpenArg::Face(face)) => std::slice::from_ref(face),
        Some(OpenArg::Faces(faces)) => faces,
        Some(OpenArg::Text(text)) => {
            return Err(RegionError::validation(
                "open",
                format!("expected a face index in 1..=6, got text \"{text}\""),
            ))
        }
    };
    let mut out = String::new();
    for face in faces {
        if !(1..=6).contains(face) {
            return Err(RegionError::validation(
                "open",
                format!("face index {face} is outside 1..=6"),
            ));
        }
        out.push_str(&format!(" open {face}"));
    }
    Ok(out)
}

/// Arguments of `fix ID group move <style> <args>`.
///
/// # Errors
///
/// See [`canonical_components`].
pub fn fix_move_args(
    style: MoveStyle,
    components: &[Component],
    statics: &VarBag,
    dynamics: &VarBag,
) -> Result<String> {
    let parts = canonical_components(style.as_str(), components, style.arity(), statics, dynamics)?;
    Ok(parts.join(" "))
}

fn resolve(
    argument: &str,
    component: &Component,
    statics: &VarBag,
    dynamics: &VarBag,
) -> Result<String> {
    let text = match component {
        Component::Null => return Ok("NULL".to_owned()),
        Component::Number(v) => return Ok(number(*v)),
        Component::Text(text) => text.trim(),
    };
    if text.is_empty() || text == "NULL" {
        return Ok("NULL".to_owned());
    }
    if text.contains('$') {
        return evaluate(argument, text, statics);
    }
    if text.starts_with("v_") {
        return Ok(text.to_owned());
    }
    if let Ok(v) = text.parse::<f64>() {
        return Ok(number(v));
    }
    if dynamics.contains(text) {
        return Ok(format!("v_{text}"));
    }
    if let Some(value) = statics.get(text) {
        return match value {
            Value::Int(_) | Value::Float(_) => Ok(value.to_string()),
            other => evaluate(argument, &render_value(other, statics), statics),
        };
    }
    Err(RegionError::validation(
        argument,
        format!("\"{text}\" is not a number or a declared variable"),
    ))
}

fn evaluate(argument: &str, text: &str, statics: &VarBag) -> Result<String> {
    let v = evaluate_with(text, statics)
        .map_err(|e| RegionError::validation(argument, format!("\"{text}\": {e}")))?;
    Ok(number(round_to(v, EVAL_DIGITS)))
}

fn number(v: f64) -> String {
    Value::Float(v).to_string()
}
