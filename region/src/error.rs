//! Error taxonomy for region objects and the registry.

use regionkit_template::TemplateError;

/// Errors raised by sectioned objects, validators and the registry.
///
/// Every variant is raised before any registry state changes, with the
/// documented exception of `+=` on objects.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// A keyword argument is malformed or out of range.
    #[error("invalid {argument}: {reason}")]
    Validation {
        /// The offending argument, e.g. `"side"` or `"move"`.
        argument: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A name is already registered, or an operand appears twice.
    #[error("the name \"{0}\" is already used")]
    NameCollision(String),

    /// A name or index does not resolve.
    #[error("{what} \"{key}\" does not exist")]
    NotFound {
        /// What kind of key was looked up.
        what: &'static str,
        /// The key itself.
        key: String,
    },

    /// An entry of the wrong kind was supplied.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// The kind required.
        expected: &'static str,
        /// The kind supplied.
        found: &'static str,
    },

    /// A composite object was copied.
    #[error("\"{0}\" is a composite and cannot be copied; regenerate it from its constituents")]
    CompositeCopy(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration text is not valid TOML for [`crate::RegionConfig`].
    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A placeholder expression failed to evaluate.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl RegionError {
    pub(crate) fn validation(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            key: key.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegionError>;
