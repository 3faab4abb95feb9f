//! Fused and chained sequences of fragments.
//!
//! A [`Script`] is a list of stages, each holding one or more parts. `+`
//! fuses two single-stage scripts into one stage. `|` keeps the stages apart
//! so that each remains an independent, re-executable unit.

use std::ops::{Add, AddAssign, BitOr};

use crate::fragment::Fragment;
use crate::value::{Value, VarBag};

/// Bindings captured from the object a part came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    /// Placeholder values.
    pub statics: VarBag,
    /// Values declared as engine-side variables.
    pub dynamics: VarBag,
}

/// A fragment, optionally pinned to the bindings of its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    fragment: Fragment,
    binding: Option<Binding>,
}

impl Part {
    /// The fragment rendered by this part.
    #[must_use]
    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// Captured bindings, if the part was bound.
    #[must_use]
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }
}

/// Parts rendered together, sharing one set of overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stage {
    parts: Vec<Part>,
    overrides: VarBag,
}

impl Stage {
    /// Parts in emission order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Values applied on top of every part's bindings.
    #[must_use]
    pub fn overrides(&self) -> &VarBag {
        &self.overrides
    }

    fn render_into(&self, out: &mut String, statics: &VarBag, dynamics: &VarBag) {
        for part in &self.parts {
            let text = match &part.binding {
                Some(binding) => {
                    let vars = statics.merged(&binding.statics).merged(&self.overrides);
                    part.fragment.render(&vars, &binding.dynamics)
                }
                None => part.fragment.render(&statics.merged(&self.overrides), dynamics),
            };
            if !text.is_empty() {
                out.push_str(&text);
                out.push('\n');
            }
        }
    }
}

/// A sequence of stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    stages: Vec<Stage>,
}

impl From<Fragment> for Script {
    fn from(fragment: Fragment) -> Self {
        Self {
            stages: vec![Stage {
                parts: vec![Part {
                    fragment,
                    binding: None,
                }],
                overrides: VarBag::new(),
            }],
        }
    }
}

impl Script {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chains every script in order.
    #[must_use]
    pub fn join(scripts: impl IntoIterator<Item = Script>) -> Script {
        let mut out = Script::new();
        for script in scripts {
            out.stages.extend(script.stages);
        }
        out
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if there is nothing to render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.iter().all(|s| s.parts.is_empty())
    }

    /// Returns `true` for a script made of more than one stage.
    #[must_use]
    pub fn is_chained(&self) -> bool {
        self.stages.len() > 1
    }

    /// Every fragment, stage by stage.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.stages
            .iter()
            .flat_map(|s| s.parts.iter().map(|p| &p.fragment))
    }

    /// Pins every unbound part to the given bindings.
    ///
    /// Parts that are already bound keep their own bindings, so nested
    /// combinations render each constituent with its own values.
    #[must_use]
    pub fn bind(&self, statics: &VarBag, dynamics: &VarBag) -> Script {
        let mut out = self.clone();
        for stage in &mut out.stages {
            for part in &mut stage.parts {
                if part.binding.is_none() {
                    part.binding = Some(Binding {
                        statics: statics.clone(),
                        dynamics: dynamics.clone(),
                    });
                }
            }
        }
        out
    }

    /// Sets `key` on every stage, above all part bindings.
    pub fn override_all(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        for stage in &mut self.stages {
            stage.overrides.insert(key, value.clone());
        }
    }

    /// Fuses two single-stage scripts into one stage; chains otherwise.
    #[must_use]
    pub fn fuse(&self, other: &Script) -> Script {
        if self.stages.is_empty() {
            return other.clone();
        }
        if other.stages.is_empty() {
            return self.clone();
        }
        if let ([a], [b]) = (self.stages.as_slice(), other.stages.as_slice()) {
            let mut parts = a.parts.clone();
            parts.extend(b.parts.iter().cloned());
            return Script {
                stages: vec![Stage {
                    parts,
                    overrides: a.overrides.merged(&b.overrides),
                }],
            };
        }
        self.chain(other)
    }

    /// Appends `other`'s stages after `self`'s.
    #[must_use]
    pub fn chain(&self, other: &Script) -> Script {
        let mut out = self.clone();
        out.stages.extend(other.stages.iter().cloned());
        out
    }

    /// Renders every stage. Each non-empty part ends with a newline.
    ///
    /// `statics` and `dynamics` apply to parts that were never bound.
    #[must_use]
    pub fn render(&self, statics: &VarBag, dynamics: &VarBag) -> String {
        let mut out = String::new();
        for stage in &self.stages {
            stage.render_into(&mut out, statics, dynamics);
        }
        out
    }
}

impl Add<&Script> for &Script {
    type Output = Script;

    fn add(self, rhs: &Script) -> Script {
        self.fuse(rhs)
    }
}

impl BitOr<&Script> for &Script {
    type Output = Script;

    fn bitor(self, rhs: &Script) -> Script {
        self.chain(rhs)
    }
}

impl AddAssign<&Script> for Script {
    fn add_assign(&mut self, rhs: &Script) {
        *self = self.fuse(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Script {
        Script::from(Fragment::new("region", 3, "region ${ID} ${style}"))
    }

    #[test]
    fn fuse_makes_one_stage() {
        let s = &region() + &region();
        assert_eq!(s.len(), 1);
        assert_eq!(s.stages()[0].parts().len(), 2);
        assert!(!s.is_chained());
    }

    #[test]
    fn chain_keeps_stages() {
        let s = &region() | &region();
        assert_eq!(s.len(), 2);
        assert!(s.is_chained());
        // fusing a chained script chains again
        assert_eq!((&s + &region()).len(), 3);
    }

    #[test]
    fn bound_parts_keep_their_values() {
        let none = VarBag::new();
        let a = region().bind(&VarBag::new().with("ID", "A").with("style", "sphere"), &none);
        let b = region().bind(&VarBag::new().with("ID", "B").with("style", "block"), &none);
        let fused = &a + &b;
        let shared = VarBag::new().with("ID", "A+B");
        assert_eq!(
            fused.render(&shared, &VarBag::new()),
            "region A sphere\nregion B block\n"
        );
    }

    #[test]
    fn unbound_parts_use_caller_values() {
        let vars = VarBag::new().with("ID", "S1").with("style", "sphere");
        assert_eq!(region().render(&vars, &VarBag::new()), "region S1 sphere\n");
    }

    #[test]
    fn overrides_beat_bindings() {
        let create =
            Script::from(Fragment::new("create", 4, "create_atoms ${beadtype} region ${ID}"));
        let a = create.bind(&VarBag::new().with("ID", "A").with("beadtype", 1), &VarBag::new());
        let b = create.bind(&VarBag::new().with("ID", "B").with("beadtype", 2), &VarBag::new());
        let mut piped = &a | &b;
        piped.override_all("beadtype", 7);
        assert_eq!(
            piped.render(&VarBag::new(), &VarBag::new()),
            "create_atoms 7 region A\ncreate_atoms 7 region B\n"
        );
    }

    #[test]
    fn join_and_empty() {
        assert!(Script::new().is_empty());
        let joined = Script::join(vec![region(), Script::new(), region()]);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.fragments().count(), 2);
    }
}
