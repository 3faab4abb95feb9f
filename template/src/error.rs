//! Errors raised while expanding or evaluating templates.

/// Failure to turn a template into a literal value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    /// A `${name}` placeholder had no binding where a literal was required.
    #[error("unresolved placeholder `${{{0}}}`")]
    Unresolved(String),

    /// The expression could not be parsed.
    #[error("cannot evaluate `{expression}`: {reason}")]
    Syntax {
        /// The expression after placeholder expansion.
        expression: String,
        /// What the parser choked on.
        reason: String,
    },

    /// The expression divides by zero.
    #[error("division by zero in `{0}`")]
    DivisionByZero(String),
}
