//! Section slots of a region object and their activation rules.
//!
//! Flags are never read raw: [`SectionSet::is_active`] folds in the
//! cross-section rules.
//!
//! - `create` is off in space-filling mode, since atoms come from the fill.
//! - `setgroup` needs `group` active and `create` inactive.

use serde::{Deserialize, Serialize};

use regionkit_template::Script;

/// One slot of a [`SectionSet`], listed in global emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// `variable NAME equal EXPR` declarations.
    Variables,
    /// The `region` definition.
    Region,
    /// `create_atoms` inside the region.
    Create,
    /// `group` over the region, plus an atom count.
    Group,
    /// `set group … type …` reassignment.
    SetGroup,
    /// `fix … move`.
    Move,
}

impl SectionKind {
    /// All kinds in emission order.
    pub const ORDER: [SectionKind; 6] = [
        Self::Variables,
        Self::Region,
        Self::Create,
        Self::Group,
        Self::SetGroup,
        Self::Move,
    ];

    /// Returns the section identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Variables => "variables",
            Self::Region => "region",
            Self::Create => "create",
            Self::Group => "group",
            Self::SetGroup => "setgroup",
            Self::Move => "move",
        }
    }

    /// First letter of [`SectionKind::as_str`].
    #[must_use]
    pub const fn short(self) -> char {
        match self {
            Self::Variables => 'v',
            Self::Region => 'r',
            Self::Create => 'c',
            Self::Group => 'g',
            Self::SetGroup => 's',
            Self::Move => 'm',
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Scripts and enable flags for every [`SectionKind`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionSet {
    scripts: [Option<Script>; 6],
    flags: [bool; 6],
    spacefilling: bool,
}

impl SectionSet {
    /// Creates a set with no scripts and the default flags for the given
    /// fill mode.
    #[must_use]
    pub fn new(spacefilling: bool) -> Self {
        let mut set = Self {
            spacefilling,
            ..Self::default()
        };
        set.flags[SectionKind::Variables.slot()] = true;
        set.flags[SectionKind::Region.slot()] = true;
        set.flags[SectionKind::Create.slot()] = !spacefilling;
        set.flags[SectionKind::SetGroup.slot()] = spacefilling;
        set
    }

    /// Installs the script of a slot.
    pub fn set_script(&mut self, kind: SectionKind, script: Script) {
        self.scripts[kind.slot()] = Some(script);
    }

    /// Returns the script of a slot.
    #[must_use]
    pub fn script(&self, kind: SectionKind) -> Option<&Script> {
        self.scripts[kind.slot()].as_ref()
    }

    /// Mutable access to the script of a slot.
    pub fn script_mut(&mut self, kind: SectionKind) -> Option<&mut Script> {
        self.scripts[kind.slot()].as_mut()
    }

    /// The raw enable flag. Use [`SectionSet::is_active`] to decide emission.
    #[must_use]
    pub fn flag(&self, kind: SectionKind) -> bool {
        self.flags[kind.slot()]
    }

    /// Sets the raw enable flag.
    pub fn set_flag(&mut self, kind: SectionKind, on: bool) {
        self.flags[kind.slot()] = on;
    }

    /// Whether atoms are created by a registry-wide fill.
    #[must_use]
    pub fn is_spacefilling(&self) -> bool {
        self.spacefilling
    }

    /// Flag, script presence, and the cross-section rule of `kind`.
    #[must_use]
    pub fn is_active(&self, kind: SectionKind) -> bool {
        if !self.flag(kind) || self.script(kind).map_or(true, Script::is_empty) {
            return false;
        }
        match kind {
            SectionKind::Create => !self.spacefilling,
            SectionKind::SetGroup => {
                self.is_active(SectionKind::Group) && !self.is_active(SectionKind::Create)
            }
            SectionKind::Variables
            | SectionKind::Region
            | SectionKind::Group
            | SectionKind::Move => true,
        }
    }

    /// Active kinds in emission order.
    #[must_use]
    pub fn flags(&self) -> Vec<SectionKind> {
        SectionKind::ORDER
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }

    /// One letter per active kind, e.g. `"vrc"`.
    #[must_use]
    pub fn short_flags(&self) -> String {
        self.flags().into_iter().map(SectionKind::short).collect()
    }

    /// Slot-wise fusion; flags are OR'd.
    #[must_use]
    pub fn fuse(&self, other: &SectionSet) -> SectionSet {
        self.combine(other, Script::fuse)
    }

    /// Slot-wise chaining; flags are OR'd.
    #[must_use]
    pub fn chain(&self, other: &SectionSet) -> SectionSet {
        self.combine(other, Script::chain)
    }

    /// Pins every unbound part of every slot to the given bags.
    #[must_use]
    pub fn bind(
        &self,
        statics: &regionkit_template::VarBag,
        dynamics: &regionkit_template::VarBag,
    ) -> SectionSet {
        let mut out = self.clone();
        for script in out.scripts.iter_mut().flatten() {
            *script = script.bind(statics, dynamics);
        }
        out
    }

    fn combine(&self, other: &SectionSet, op: fn(&Script, &Script) -> Script) -> SectionSet {
        let mut out = SectionSet {
            spacefilling: self.spacefilling || other.spacefilling,
            ..SectionSet::default()
        };
        for kind in SectionKind::ORDER {
            let i = kind.slot();
            out.scripts[i] = match (&self.scripts[i], &other.scripts[i]) {
                (Some(a), Some(b)) => Some(op(a, b)),
                (Some(a), None) => Some(a.clone()),
                (None, Some(b)) => Some(b.clone()),
                (None, None) => None,
            };
            out.flags[i] = self.flags[i] || other.flags[i];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regionkit_template::Fragment;

    fn full(spacefilling: bool) -> SectionSet {
        let mut set = SectionSet::new(spacefilling);
        for kind in SectionKind::ORDER {
            set.set_script(kind, Script::from(Fragment::new(kind.as_str(), 0, kind.as_str())));
        }
        set
    }

    #[test]
    fn default_flags() {
        let set = full(false);
        assert_eq!(set.short_flags(), "vrc");
        let filled = full(true);
        // setgroup is flagged but needs an active group
        assert!(filled.flag(SectionKind::SetGroup));
        assert_eq!(filled.short_flags(), "vr");
    }

    #[test]
    fn create_is_suppressed_by_fill() {
        let mut set = full(true);
        set.set_flag(SectionKind::Create, true);
        assert!(!set.is_active(SectionKind::Create));
    }

    #[test]
    fn setgroup_needs_group_and_no_create() {
        let mut set = full(false);
        set.set_flag(SectionKind::SetGroup, true);
        set.set_flag(SectionKind::Group, true);
        assert!(!set.is_active(SectionKind::SetGroup));
        set.set_flag(SectionKind::Create, false);
        assert!(set.is_active(SectionKind::SetGroup));
        assert_eq!(set.short_flags(), "vrgs");
    }

    #[test]
    fn missing_script_is_inactive() {
        let set = SectionSet::new(false);
        assert!(set.flag(SectionKind::Region));
        assert!(!set.is_active(SectionKind::Region));
        assert!(set.flags().is_empty());
    }

    #[test]
    fn combination_ors_flags() {
        let mut a = full(false);
        let mut b = full(false);
        a.set_flag(SectionKind::Group, true);
        b.set_flag(SectionKind::Move, true);
        let fused = a.fuse(&b);
        assert!(fused.is_active(SectionKind::Group));
        assert!(fused.is_active(SectionKind::Move));
        assert_eq!(fused.script(SectionKind::Region).map(Script::len), Some(1));
        let chained = a.chain(&b);
        assert_eq!(chained.script(SectionKind::Region).map(Script::len), Some(2));
    }
}
