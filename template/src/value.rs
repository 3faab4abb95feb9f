//! Values and variable bags fed to templates.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A literal bound to a placeholder name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer literal.
    Int(i64),
    /// Floating-point literal, printed in its shortest round-trip form.
    Float(f64),
    /// Text that may itself contain `${name}` placeholders.
    Str(String),
    /// Text emitted as-is, never expanded.
    #[serde(skip_deserializing)]
    Verbatim(String),
    /// Space-separated sequence.
    List(Vec<Value>),
}

impl Value {
    /// Builds a [`Value::Verbatim`].
    #[must_use]
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self::Verbatim(text.into())
    }

    /// Returns the numeric content, if this is a number or a numeric string.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Str(s) | Self::Verbatim(s) => s.trim().parse().ok(),
            Self::List(_) => None,
        }
    }

    /// Returns `true` for [`Value::Int`] and [`Value::Float`].
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Returns `true` if the value prints as an empty string.
    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        match self {
            Self::Str(s) | Self::Verbatim(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Int(_) | Self::Float(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) | Self::Verbatim(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

/// An insertion-ordered set of placeholder bindings.
///
/// Merging keeps the receiver's key order and lets the other bag win on
/// collisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarBag(IndexMap<String, Value>);

impl VarBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`VarBag::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Binds `key`, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks a binding up.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is bound.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a binding, preserving the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the bag has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlays `other` onto `self`.
    pub fn extend_from(&mut self, other: &VarBag) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Returns `self` overlaid with `other`.
    #[must_use]
    pub fn merged(&self, other: &VarBag) -> VarBag {
        let mut out = self.clone();
        out.extend_from(other);
        out
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for VarBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = VarBag::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}
