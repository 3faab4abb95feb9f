//! Sectioned region objects and their algebra.
//!
//! A [`SectionedObject`] owns one script per [`SectionKind`] plus two bags:
//! `statics` fill placeholders before output, `dynamics` are declared as
//! engine-side `variable NAME equal EXPR` lines.
//!
//! `&a + &b` fuses section by section, `&a | &b` chains, and `a += &b` is
//! the only operation that mutates an operand. Each operand's sections are
//! bound to its own bags before combining, so every constituent keeps
//! emitting its own commands.

use std::ops::{Add, AddAssign, BitOr};

use regionkit_template::{strip_comments, Fragment, Script, Value, VarBag};

use crate::config::LatticeStyle;
use crate::error::{RegionError, Result};
use crate::geometry::{Alike, Geometry, Kind};
use crate::sections::{SectionKind, SectionSet};
use crate::validators::{
    fix_move_args, move_keyword, open_keyword, rotate_keyword, side_keyword, units_keyword,
    Component, MoveStyle, OpenArg, TransformArg,
};

/// Prefix of group IDs derived from object names.
pub const GROUP_PREFIX: &str = "GRP";

/// Prefix of fix IDs derived from object names.
pub const FIX_MOVE_PREFIX: &str = "FM";

const VARIABLES_TEMPLATE: &str = "% variables to be used for ${ID} ${style}";

const REGION_TEMPLATE: &str = "\
% Create region ${ID} ${style} args ... (URL: https://docs.lammps.org/region.html)
% keywords: side, units, move, rotate, open
region ${ID} ${style} ${args}${side}${units}${move}${rotate}${open}";

const CREATE_TEMPLATE: &str = "\
% Create atoms of type ${beadtype} for ${ID} ${style} (https://docs.lammps.org/create_atoms.html)
create_atoms ${beadtype} region ${ID}";

const GROUP_TEMPLATE: &str = "\
% Create group ${groupID} region ${ID} (URL: https://docs.lammps.org/group.html)
group ${groupID} region ${ID}
variable ${countgroupID} equal count(${groupID})
print \"Number of atoms in ${groupID}: \\${${countgroupID}}\"";

const SETGROUP_TEMPLATE: &str = "\
% Reassign atom type to ${beadtype} for the group ${groupID} associated with region ${ID} (https://docs.lammps.org/set.html)
set group ${groupID} type ${beadtype}";

const MOVE_TEMPLATE: &str = "\
% Move atoms of group ${groupID} with fix ${moveID} (https://docs.lammps.org/fix_move.html)
fix ${moveID} ${groupID} move ${movestyle} ${moveargs}";

fn section_defaults() -> VarBag {
    VarBag::new()
        .with("beadtype", 1)
        .with("groupID", format!("{GROUP_PREFIX}${{ID}}"))
        .with("moveID", format!("{FIX_MOVE_PREFIX}${{ID}}"))
        .with("countgroupID", "count${groupID}")
}

fn default_sections(spacefilling: bool) -> SectionSet {
    let defaults = section_defaults();
    let mut set = SectionSet::new(spacefilling);
    let fragments = [
        (
            SectionKind::Variables,
            Fragment::new("variables", 2, VARIABLES_TEMPLATE).declaring_variables(),
        ),
        (SectionKind::Region, Fragment::new("region", 3, REGION_TEMPLATE)),
        (SectionKind::Create, Fragment::new("create", 4, CREATE_TEMPLATE)),
        (SectionKind::Group, Fragment::new("group", 5, GROUP_TEMPLATE)),
        (SectionKind::SetGroup, Fragment::new("setgroup", 4, SETGROUP_TEMPLATE)),
        (SectionKind::Move, Fragment::new("move", 6, MOVE_TEMPLATE)),
    ];
    for (kind, fragment) in fragments {
        set.set_script(kind, Script::from(fragment.with_defaults(defaults.clone())));
    }
    set
}

/// Keyword arguments accepted by the registry factories.
#[derive(Debug, Clone, Default)]
pub struct ObjectOptions {
    /// Object name; defaults to `<kind><NNN>`.
    pub name: Option<String>,
    /// Bead type used by `create_atoms` and `set group`.
    pub beadtype: Option<i64>,
    /// Forced global index.
    pub index: Option<usize>,
    /// Forced per-kind index.
    pub subindex: Option<usize>,
    /// Mass; defaults to the registry's.
    pub mass: Option<f64>,
    /// Density; defaults to the registry's.
    pub density: Option<f64>,
    /// `side` keyword.
    pub side: Option<String>,
    /// `units` keyword.
    pub units: Option<String>,
    /// `move` keyword.
    pub moving: Option<TransformArg>,
    /// `rotate` keyword.
    pub rotate: Option<TransformArg>,
    /// `open` keyword.
    pub open: Option<OpenArg>,
    /// Extra placeholder values.
    pub statics: VarBag,
    /// Engine-side variables.
    pub dynamics: VarBag,
    /// Enable the `group` section from the start.
    pub group: bool,
}

impl ObjectOptions {
    /// Options with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the bead type.
    #[must_use]
    pub fn beadtype(mut self, beadtype: i64) -> Self {
        self.beadtype = Some(beadtype);
        self
    }

    /// Sets the `side` keyword.
    #[must_use]
    pub fn side(mut self, side: impl Into<String>) -> Self {
        self.side = Some(side.into());
        self
    }

    /// Sets the `units` keyword.
    #[must_use]
    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Sets the `move` keyword.
    #[must_use]
    pub fn moving(mut self, arg: impl Into<TransformArg>) -> Self {
        self.moving = Some(arg.into());
        self
    }

    /// Sets the `rotate` keyword.
    #[must_use]
    pub fn rotate(mut self, arg: impl Into<TransformArg>) -> Self {
        self.rotate = Some(arg.into());
        self
    }

    /// Sets the `open` keyword.
    #[must_use]
    pub fn open(mut self, arg: OpenArg) -> Self {
        self.open = Some(arg);
        self
    }

    /// Adds a placeholder value.
    #[must_use]
    pub fn with_static(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(key, value);
        self
    }

    /// Adds an engine-side variable.
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.dynamics.insert(key, value);
        self
    }

    /// Enables the `group` section.
    #[must_use]
    pub fn with_group(mut self) -> Self {
        self.group = true;
        self
    }
}

/// Registry-side settings applied when an object is built.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuildContext {
    pub index: usize,
    pub subindex: usize,
    pub spacefilling: bool,
    pub force_box_units: bool,
    pub mass: f64,
    pub density: f64,
    pub lattice_style: LatticeStyle,
    pub lattice_scale: f64,
}

/// How a composite was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// By `+` or `+=`: one stage per section.
    Fused,
    /// By `|`: one stage per operand.
    Chained,
}

/// A named geometry with its sections and variable bags.
///
/// There is no `Clone`: use [`SectionedObject::try_copy`], which refuses
/// composites.
#[derive(Debug, PartialEq)]
pub struct SectionedObject {
    name: String,
    kind: Kind,
    alike: Alike,
    beadtype: i64,
    index: usize,
    subindex: usize,
    statics: VarBag,
    dynamics: VarBag,
    sections: SectionSet,
    mass: f64,
    density: f64,
    lattice_style: LatticeStyle,
    lattice_scale: f64,
    geometry: Option<Geometry>,
    composition: Option<Composition>,
    parts: Vec<String>,
}

impl SectionedObject {
    /// Builds a primitive object from a preset and validated keywords.
    pub(crate) fn build(
        geometry: &Geometry,
        name: String,
        options: &ObjectOptions,
        ctx: BuildContext,
    ) -> Result<Self> {
        let units = match options.units.as_deref() {
            None if ctx.force_box_units => Some("box"),
            other => other,
        };
        let keywords = [
            ("side", side_keyword(options.side.as_deref())?),
            ("units", units_keyword(units)?),
            (
                "move",
                move_keyword(options.moving.as_ref(), &options.statics, &options.dynamics)?,
            ),
            (
                "rotate",
                rotate_keyword(options.rotate.as_ref(), &options.statics, &options.dynamics)?,
            ),
            ("open", open_keyword(options.open.as_ref())?),
        ];
        let beadtype = options.beadtype.unwrap_or(1);
        let mut statics = options.statics.clone();
        statics.insert("ID", Value::verbatim(name.clone()));
        statics.insert("style", Value::verbatim(geometry.kind().as_str()));
        statics.insert("args", Value::Str(join_args(&geometry.args())));
        for (key, text) in keywords {
            statics.insert(key, Value::verbatim(text));
        }
        statics.insert("beadtype", beadtype);

        let mut sections = default_sections(ctx.spacefilling);
        sections.set_flag(SectionKind::Group, options.group);
        Ok(Self {
            name,
            kind: geometry.kind(),
            alike: geometry.kind().alike(),
            beadtype,
            index: ctx.index,
            subindex: ctx.subindex,
            statics,
            dynamics: options.dynamics.clone(),
            sections,
            mass: options.mass.unwrap_or(ctx.mass),
            density: options.density.unwrap_or(ctx.density),
            lattice_style: ctx.lattice_style,
            lattice_scale: ctx.lattice_scale,
            geometry: Some(geometry.clone()),
            composition: None,
            parts: Vec::new(),
        })
    }

    /// Builds a `union` or `intersect` over existing region IDs.
    pub(crate) fn boolean(
        kind: Kind,
        name: String,
        operands: &[String],
        beadtype: i64,
        ctx: BuildContext,
    ) -> Self {
        let mut args = vec![operands.len().to_string()];
        args.extend(operands.iter().cloned());
        let mut statics = VarBag::new()
            .with("ID", Value::verbatim(name.clone()))
            .with("style", Value::verbatim(kind.as_str()))
            .with("args", Value::verbatim(args.join(" ")))
            .with("beadtype", beadtype);
        for key in ["side", "units", "move", "rotate", "open"] {
            statics.insert(key, Value::verbatim(""));
        }
        Self {
            name,
            kind,
            alike: kind.alike(),
            beadtype,
            index: ctx.index,
            subindex: ctx.subindex,
            statics,
            dynamics: VarBag::new(),
            sections: default_sections(ctx.spacefilling),
            mass: ctx.mass,
            density: ctx.density,
            lattice_style: ctx.lattice_style,
            lattice_scale: ctx.lattice_scale,
            geometry: None,
            composition: None,
            parts: Vec::new(),
        }
    }

    /// Wraps an expression as an `eval` object. Every stage gets the same
    /// bead type: `beadtype` if given, else the expression's.
    pub(crate) fn adopt(
        expression: &SectionedObject,
        name: &str,
        index: usize,
        subindex: usize,
        beadtype: Option<i64>,
    ) -> Self {
        let mut adopted = expression.duplicate();
        adopted.rename(name);
        adopted.kind = Kind::Eval;
        adopted.alike = Alike::Eval;
        adopted.reindex(index, subindex);
        adopted.set_beadtype(beadtype.unwrap_or(expression.beadtype));
        adopted
    }

    pub(crate) fn duplicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            alike: self.alike,
            beadtype: self.beadtype,
            index: self.index,
            subindex: self.subindex,
            statics: self.statics.clone(),
            dynamics: self.dynamics.clone(),
            sections: self.sections.clone(),
            mass: self.mass,
            density: self.density,
            lattice_style: self.lattice_style,
            lattice_scale: self.lattice_scale,
            geometry: self.geometry.clone(),
            composition: self.composition,
            parts: self.parts.clone(),
        }
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.to_owned();
        self.statics.insert("ID", Value::verbatim(name));
    }

    pub(crate) fn reindex(&mut self, index: usize, subindex: usize) {
        self.index = index;
        self.subindex = subindex;
    }

    fn override_all(&mut self, key: &str, value: impl Into<Value> + Clone) {
        for kind in SectionKind::ORDER {
            if let Some(script) = self.sections.script_mut(kind) {
                script.override_all(key, value.clone());
            }
        }
    }

    /// Object name; unique within a registry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text emitted for `${ID}`.
    #[must_use]
    pub fn id(&self) -> String {
        self.statics
            .get("ID")
            .map_or_else(|| self.name.clone(), ToString::to_string)
    }

    /// Region IDs this object defines: its own, or every constituent's
    /// for a composite.
    #[must_use]
    pub fn region_ids(&self) -> Vec<String> {
        if self.is_composite() {
            self.parts.clone()
        } else {
            vec![self.id()]
        }
    }

    /// Group IDs emitted by the `group` section, one per region ID.
    #[must_use]
    pub fn group_ids(&self) -> Vec<String> {
        self.region_ids()
            .into_iter()
            .map(|id| format!("{GROUP_PREFIX}{id}"))
            .collect()
    }

    /// Registry kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Similarity tag.
    #[must_use]
    pub fn alike(&self) -> Alike {
        self.alike
    }

    /// Bead type.
    #[must_use]
    pub fn beadtype(&self) -> i64 {
        self.beadtype
    }

    /// Global index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Per-kind index.
    #[must_use]
    pub fn subindex(&self) -> usize {
        self.subindex
    }

    /// Placeholder values.
    #[must_use]
    pub fn statics(&self) -> &VarBag {
        &self.statics
    }

    /// Engine-side variables.
    #[must_use]
    pub fn dynamics(&self) -> &VarBag {
        &self.dynamics
    }

    /// Section scripts and flags.
    #[must_use]
    pub fn sections(&self) -> &SectionSet {
        &self.sections
    }

    /// Mass.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Density.
    #[must_use]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// The preset this object was built from; `None` for operators and
    /// composites.
    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// How the object was combined, if it is a composite.
    #[must_use]
    pub fn composition(&self) -> Option<Composition> {
        self.composition
    }

    /// Returns `true` for objects produced by `+`, `+=` or `|`.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.composition.is_some()
    }

    /// Returns `true` for objects produced by `|`.
    #[must_use]
    pub fn is_chained(&self) -> bool {
        self.composition == Some(Composition::Chained)
    }

    /// See [`SectionSet::is_active`].
    #[must_use]
    pub fn is_active(&self, kind: SectionKind) -> bool {
        self.sections.is_active(kind)
    }

    /// Active sections in emission order.
    #[must_use]
    pub fn flags(&self) -> Vec<SectionKind> {
        self.sections.flags()
    }

    /// One letter per active section.
    #[must_use]
    pub fn short_flags(&self) -> String {
        self.sections.short_flags()
    }

    /// Changes the bead type, including every bound constituent.
    pub fn set_beadtype(&mut self, beadtype: i64) {
        self.beadtype = beadtype;
        self.statics.insert("beadtype", beadtype);
        if self.is_composite() {
            self.override_all("beadtype", beadtype);
        }
    }

    /// Enables or disables a section flag directly.
    pub fn set_flag(&mut self, kind: SectionKind, on: bool) {
        self.sections.set_flag(kind, on);
    }

    /// Enables the `group` section.
    pub fn create_group(&mut self) {
        self.sections.set_flag(SectionKind::Group, true);
    }

    /// Disables the `group` section.
    pub fn remove_group(&mut self) {
        self.sections.set_flag(SectionKind::Group, false);
    }

    /// Enables the `set group` section.
    pub fn set_group(&mut self) {
        self.sections.set_flag(SectionKind::SetGroup, true);
    }

    /// Configures and enables `fix … move`; the group it acts on is
    /// enabled too.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Validation`] if a component cannot be resolved.
    pub fn set_fix_move(&mut self, style: MoveStyle, components: &[Component]) -> Result<()> {
        let args = fix_move_args(style, components, &self.statics, &self.dynamics)?;
        self.statics.insert("movestyle", Value::verbatim(style.as_str()));
        self.statics.insert("moveargs", Value::verbatim(args));
        self.sections.set_flag(SectionKind::Move, true);
        self.sections.set_flag(SectionKind::Group, true);
        Ok(())
    }

    /// Disables `fix … move`.
    pub fn remove_move(&mut self) {
        self.sections.set_flag(SectionKind::Move, false);
    }

    /// Independent deep copy.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::CompositeCopy`] for composites.
    pub fn try_copy(&self) -> Result<Self> {
        if self.alike == Alike::Composite {
            return Err(RegionError::CompositeCopy(self.name.clone()));
        }
        Ok(self.duplicate())
    }

    /// Copy with a new name and, optionally, a new bead type.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::CompositeCopy`] for composites.
    pub fn copy_as(&self, name: &str, beadtype: Option<i64>) -> Result<Self> {
        let mut copy = self.try_copy()?;
        copy.rename(name);
        if let Some(beadtype) = beadtype {
            copy.set_beadtype(beadtype);
        }
        Ok(copy)
    }

    /// Enclosed volume, when the preset arguments are numeric.
    #[must_use]
    pub fn volume(&self) -> Option<f64> {
        self.geometry.as_ref()?.volume()
    }

    /// Estimated number of lattice sites inside the object.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn natoms(&self) -> Option<u64> {
        let volume = self.volume()?;
        let cells = volume / self.lattice_scale.powi(3);
        Some((cells * self.lattice_style.packing()).round() as u64)
    }

    /// Renders one section if it is active.
    #[must_use]
    pub fn render_section(&self, kind: SectionKind, verbose: bool) -> Option<String> {
        if !self.sections.is_active(kind) {
            return None;
        }
        let text = self
            .sections
            .script(kind)?
            .render(&self.statics, &self.dynamics);
        Some(if verbose { text } else { strip_comments(&text) })
    }

    /// All active sections in order, with no header or footer.
    #[must_use]
    pub fn code(&self, verbose: bool) -> String {
        SectionKind::ORDER
            .into_iter()
            .filter_map(|kind| self.render_section(kind, verbose))
            .collect()
    }

    fn combine(&self, other: &SectionedObject, how: Composition) -> SectionedObject {
        let separator = match how {
            Composition::Fused => "+",
            Composition::Chained => "|",
        };
        let left = self.sections.bind(&self.statics, &self.dynamics);
        let right = other.sections.bind(&other.statics, &other.dynamics);
        let sections = match how {
            Composition::Fused => left.fuse(&right),
            Composition::Chained => left.chain(&right),
        };
        let mut statics = self.statics.merged(&other.statics);
        statics.insert(
            "ID",
            Value::verbatim(format!(
                "{}{separator}{}",
                clean(&self.id()),
                clean(&other.id())
            )),
        );
        let chained = how == Composition::Chained || self.is_chained() || other.is_chained();
        let mut parts = self.region_ids();
        parts.extend(other.region_ids());
        SectionedObject {
            name: format!("{}{separator}{}", clean(&self.name), clean(&other.name)),
            kind: self.kind,
            alike: Alike::Composite,
            beadtype: self.beadtype,
            index: self.index,
            subindex: self.subindex,
            statics,
            dynamics: self.dynamics.merged(&other.dynamics),
            sections,
            mass: self.mass,
            density: self.density,
            lattice_style: self.lattice_style,
            lattice_scale: self.lattice_scale,
            geometry: None,
            composition: Some(if chained {
                Composition::Chained
            } else {
                Composition::Fused
            }),
            parts,
        }
    }
}

impl Add<&SectionedObject> for &SectionedObject {
    type Output = SectionedObject;

    fn add(self, rhs: &SectionedObject) -> SectionedObject {
        self.combine(rhs, Composition::Fused)
    }
}

impl BitOr<&SectionedObject> for &SectionedObject {
    type Output = SectionedObject;

    fn bitor(self, rhs: &SectionedObject) -> SectionedObject {
        self.combine(rhs, Composition::Chained)
    }
}

/// In-place merge: the only operator that mutates its left operand.
impl AddAssign<&SectionedObject> for SectionedObject {
    fn add_assign(&mut self, rhs: &SectionedObject) {
        *self = self.combine(rhs, Composition::Fused);
    }
}

fn clean(text: &str) -> String {
    text.replace('$', "")
}

fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ctx(index: usize) -> BuildContext {
        BuildContext {
            index,
            subindex: index,
            spacefilling: false,
            force_box_units: false,
            mass: 1.0,
            density: 1.0,
            lattice_style: LatticeStyle::Fcc,
            lattice_scale: 0.8442,
        }
    }

    pub(crate) fn sphere(name: &str, x: i32, r: i32) -> SectionedObject {
        SectionedObject::build(
            &Geometry::sphere(x, 0, 0, r),
            name.to_owned(),
            &ObjectOptions::default(),
            ctx(1),
        )
        .unwrap()
    }

    #[test]
    fn primitive_code() {
        let s = sphere("S1", 0, 3);
        assert_eq!(s.code(false), "region S1 sphere 0 0 0 3\ncreate_atoms 1 region S1\n");
        assert_eq!(s.short_flags(), "vrc");
    }

    #[test]
    fn keywords_follow_args_in_order() {
        let options = ObjectOptions::named("B1")
            .side("out")
            .units("box")
            .moving(vec!["v_x"])
            .open(OpenArg::Face(2));
        let b = SectionedObject::build(
            &Geometry::block(-5, 5, -5, 5, -5, 5),
            "B1".into(),
            &options,
            ctx(1),
        )
        .unwrap();
        let region = b.render_section(SectionKind::Region, false).unwrap();
        assert_eq!(
            region,
            "region B1 block -5 5 -5 5 -5 5 side out units box move v_x NULL NULL open 2\n"
        );
    }

    #[test]
    fn si_units_force_box() {
        let mut c = ctx(1);
        c.force_box_units = true;
        let s = SectionedObject::build(
            &Geometry::sphere(0, 0, 0, 1),
            "S".into(),
            &ObjectOptions::default(),
            c,
        )
        .unwrap();
        assert!(s.code(false).contains("region S sphere 0 0 0 1 units box\n"));
    }

    #[test]
    fn bad_keyword_is_rejected() {
        let options = ObjectOptions::default().side("sideways");
        let err =
            SectionedObject::build(&Geometry::sphere(0, 0, 0, 1), "S".into(), &options, ctx(1));
        assert!(matches!(err, Err(RegionError::Validation { .. })));
    }

    #[test]
    fn placeholder_args_resolve_from_statics() {
        let options = ObjectOptions::default().with_static("r", 2.5);
        let s = SectionedObject::build(
            &Geometry::sphere(0, 0, 0, "${r}"),
            "S".into(),
            &options,
            ctx(1),
        )
        .unwrap();
        assert!(s.code(false).starts_with("region S sphere 0 0 0 2.5\n"));
    }

    #[test]
    fn group_and_variables() {
        let options = ObjectOptions::default().with_group().with_variable("vx", "0.1*step");
        let s = SectionedObject::build(&Geometry::sphere(0, 0, 0, 1), "A".into(), &options, ctx(1))
            .unwrap();
        assert_eq!(
            s.code(false),
            "variable vx equal 0.1*step\n\
             region A sphere 0 0 0 1\n\
             create_atoms 1 region A\n\
             group GRPA region A\n\
             variable countGRPA equal count(GRPA)\n\
             print \"Number of atoms in GRPA: ${countGRPA}\"\n"
        );
    }

    #[test]
    fn fix_move_enables_group() {
        let mut s = sphere("S1", 0, 1);
        s.set_fix_move(MoveStyle::Linear, &[Component::from(1.0)]).unwrap();
        assert!(s.is_active(SectionKind::Group));
        assert!(s
            .code(false)
            .ends_with("fix FMS1 GRPS1 move linear 1 NULL NULL\n"));
        s.remove_move();
        assert!(!s.is_active(SectionKind::Move));
    }

    #[test]
    fn merge_keeps_each_constituent() {
        let a = sphere("S1", 0, 3);
        let b = sphere("S2", 5, 2);
        let c = &a + &b;
        assert_eq!(c.name(), "S1+S2");
        assert_eq!(c.id(), "S1+S2");
        assert!(c.is_composite());
        assert!(!c.is_chained());
        assert_eq!(
            c.code(false),
            "region S1 sphere 0 0 0 3\nregion S2 sphere 5 0 0 2\n\
             create_atoms 1 region S1\ncreate_atoms 1 region S2\n"
        );
        assert_eq!(a.name(), "S1");
        assert_eq!(a.code(false), sphere("S1", 0, 3).code(false));
    }

    #[test]
    fn pipe_chains_stages() {
        let a = sphere("S1", 0, 3);
        let b = sphere("S2", 5, 2);
        let p = &a | &b;
        assert_eq!(p.name(), "S1|S2");
        assert!(p.is_chained());
        let region = p.sections().script(SectionKind::Region).unwrap();
        assert_eq!(region.len(), 2);
    }

    #[test]
    fn in_place_merge_mutates_left() {
        let mut a = sphere("S1", 0, 3);
        let mut b = sphere("S2", 5, 2);
        b.create_group();
        a += &b;
        assert_eq!(a.name(), "S1+S2");
        assert!(a.is_active(SectionKind::Group));
        assert_eq!(b.name(), "S2");
    }

    #[test]
    fn composites_refuse_copy() {
        let a = sphere("S1", 0, 3);
        let b = sphere("S2", 5, 2);
        assert!(a.try_copy().is_ok());
        let copy = a.copy_as("S3", Some(4)).unwrap();
        assert_eq!(copy.code(false), "region S3 sphere 0 0 0 3\ncreate_atoms 4 region S3\n");
        let c = &a + &b;
        assert!(matches!(c.try_copy(), Err(RegionError::CompositeCopy(_))));
    }

    #[test]
    fn composite_beadtype_reaches_constituents() {
        let a = sphere("S1", 0, 3);
        let b = sphere("S2", 5, 2);
        let mut c = &a | &b;
        c.set_beadtype(2);
        let create = c.render_section(SectionKind::Create, false).unwrap();
        assert_eq!(create, "create_atoms 2 region S1\ncreate_atoms 2 region S2\n");
    }

    #[test]
    fn atom_estimate() {
        let s = sphere("S", 0, 3);
        let expected = 36.0 * std::f64::consts::PI / 0.8442f64.powi(3) * 4.0;
        assert_eq!(s.natoms(), Some(expected.round() as u64));
    }
}
