//! A single command family: template text plus default bindings.

use crate::render::{comment_lines, render, render_value};
use crate::value::VarBag;

/// An immutable template unit emitting one family of commands.
///
/// `defaults` sit underneath whatever bindings the caller supplies. A
/// fragment that declares variables also emits one
/// `variable NAME equal EXPR` line per dynamic binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    userid: String,
    position: i32,
    template: String,
    defaults: VarBag,
    declares_variables: bool,
}

impl Fragment {
    /// Creates a fragment with no defaults.
    #[must_use]
    pub fn new(userid: impl Into<String>, position: i32, template: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            position,
            template: template.into(),
            defaults: VarBag::new(),
            declares_variables: false,
        }
    }

    /// Sets the default bindings.
    #[must_use]
    pub fn with_defaults(mut self, defaults: VarBag) -> Self {
        self.defaults = defaults;
        self
    }

    /// Marks the fragment as emitting dynamic variable declarations.
    #[must_use]
    pub fn declaring_variables(mut self) -> Self {
        self.declares_variables = true;
        self
    }

    /// Section identifier, e.g. `"region"`.
    #[must_use]
    pub fn userid(&self) -> &str {
        &self.userid
    }

    /// Emission priority.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Raw template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Default bindings.
    #[must_use]
    pub fn defaults(&self) -> &VarBag {
        &self.defaults
    }

    /// Whether dynamic bindings are declared by this fragment.
    #[must_use]
    pub fn declares_variables(&self) -> bool {
        self.declares_variables
    }

    /// Renders the fragment with `statics` over its defaults.
    ///
    /// The result has no leading or trailing blank lines.
    #[must_use]
    pub fn render(&self, statics: &VarBag, dynamics: &VarBag) -> String {
        let vars = self.defaults.merged(statics);
        let mut text = render(&self.template, &vars).trim_matches('\n').to_owned();
        if self.declares_variables {
            for (name, value) in dynamics.iter() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&format!("variable {name} equal {}", render_value(value, &vars)));
            }
        }
        comment_lines(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn caller_bindings_override_defaults() {
        let f = Fragment::new("create", 4, "create_atoms ${beadtype} region ${ID}")
            .with_defaults(VarBag::new().with("beadtype", 1));
        let statics = VarBag::new().with("ID", Value::verbatim("S1")).with("beadtype", 3);
        assert_eq!(f.render(&statics, &VarBag::new()), "create_atoms 3 region S1");
        let statics = VarBag::new().with("ID", Value::verbatim("S2"));
        assert_eq!(f.render(&statics, &VarBag::new()), "create_atoms 1 region S2");
    }

    #[test]
    fn declarations_follow_the_header() {
        let f =
            Fragment::new("variables", 2, "% variables to be used for ${ID}").declaring_variables();
        let statics = VarBag::new().with("ID", "B1");
        let dynamics = VarBag::new().with("vx", "0.1*${k}").with("k", 2);
        assert_eq!(
            f.render(&statics.with("k", 5), &dynamics),
            "# variables to be used for B1\nvariable vx equal 0.1*5\nvariable k equal 2"
        );
    }

    #[test]
    fn plain_fragments_ignore_dynamics() {
        let f = Fragment::new("region", 3, "\nregion ${ID}\n");
        let out = f.render(&VarBag::new().with("ID", "A"), &VarBag::new().with("x", 1));
        assert_eq!(out, "region A");
    }
}
