//! The registry: owns named objects and collections, assigns indices and
//! keeps per-kind counters.
//!
//! Every mutating method validates and builds first, then inserts and
//! bumps counters in one step, so a failed call leaves the registry
//! untouched.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::collection::Collection;
use crate::config::{RegionConfig, RegionUnits};
use crate::error::{RegionError, Result};
use crate::geometry::{Geometry, Kind};
use crate::headers::{script_headers, HeaderPart};
use crate::object::{BuildContext, ObjectOptions, SectionedObject};
use crate::scatter::ParticleSource;
use crate::sections::SectionKind;

/// A registered item.
#[derive(Debug, PartialEq)]
pub enum Entry {
    /// A sectioned object.
    Object(SectionedObject),
    /// A collection of detached objects.
    Collection(Collection),
}

impl Entry {
    /// Entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Object(o) => o.name(),
            Self::Collection(c) => c.name(),
        }
    }

    /// Registry kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Object(o) => o.kind(),
            Self::Collection(_) => Kind::Collection,
        }
    }

    /// Global index.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Object(o) => o.index(),
            Self::Collection(c) => c.index(),
        }
    }

    /// Per-kind index.
    #[must_use]
    pub fn subindex(&self) -> usize {
        match self {
            Self::Object(o) => o.subindex(),
            Self::Collection(c) => c.subindex(),
        }
    }

    /// `"object"` or `"collection"`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Collection(_) => "collection",
        }
    }

    /// The object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&SectionedObject> {
        match self {
            Self::Object(o) => Some(o),
            Self::Collection(_) => None,
        }
    }

    /// The collection, if this is one.
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Object(_) => None,
            Self::Collection(c) => Some(c),
        }
    }

    /// Bead types used: one for an object, the distinct member types for a
    /// collection.
    #[must_use]
    pub fn beadtypes(&self) -> Vec<i64> {
        match self {
            Self::Object(o) => vec![o.beadtype()],
            Self::Collection(c) => c.beadtypes(),
        }
    }

    /// Returns `true` if a `fix move` is active anywhere in the entry.
    #[must_use]
    pub fn has_move(&self) -> bool {
        match self {
            Self::Object(o) => o.is_active(SectionKind::Move),
            Self::Collection(c) => c.has_move(),
        }
    }

    /// Atom estimate; zero when unknown.
    #[must_use]
    pub fn natoms(&self) -> u64 {
        match self {
            Self::Object(o) => o.natoms().unwrap_or(0),
            Self::Collection(c) => c.natoms(),
        }
    }

    /// All active sections, with no header or footer.
    #[must_use]
    pub fn code(&self, verbose: bool) -> String {
        match self {
            Self::Object(o) => o.code(verbose),
            Self::Collection(c) => c.code(verbose),
        }
    }

    fn object_or_mismatch(&self) -> Result<&SectionedObject> {
        match self {
            Self::Object(o) => Ok(o),
            Self::Collection(_) => Err(RegionError::TypeMismatch {
                expected: "object",
                found: "collection",
            }),
        }
    }
}

impl From<SectionedObject> for Entry {
    fn from(object: SectionedObject) -> Self {
        Self::Object(object)
    }
}

impl From<Collection> for Entry {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

/// Right-hand side of [`Registry::set`].
#[derive(Debug)]
pub enum Assignment {
    /// Deletes the name.
    Empty,
    /// Stores a copy under the name.
    Object(SectionedObject),
}

/// Operand of [`Registry::union`] and [`Registry::intersect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionRef {
    /// A registered name.
    Name(String),
    /// A 0-based position in [`Registry::names`].
    Index(usize),
}

impl From<&str> for RegionRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for RegionRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for RegionRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Options of [`Registry::union`] and [`Registry::intersect`].
#[derive(Debug, Clone, Default)]
pub struct BooleanOptions {
    /// Result name; defaults to `union<NNN>` or `intersect<NNN>`.
    pub name: Option<String>,
    /// Bead type; defaults to 1.
    pub beadtype: Option<i64>,
    /// Forced global index.
    pub index: Option<usize>,
    /// Forced per-kind index.
    pub subindex: Option<usize>,
}

/// Options of [`Registry::eval`].
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Result name; defaults to the expression's name.
    pub name: Option<String>,
    /// Bead type forced on every constituent; defaults to the expression's.
    pub beadtype: Option<i64>,
    /// Forced global index.
    pub index: Option<usize>,
    /// Forced per-kind index.
    pub subindex: Option<usize>,
}

/// Options of [`Registry::collection`].
#[derive(Debug, Clone, Default)]
pub struct CollectionOptions {
    /// Collection name; defaults to `collect<NNN>`.
    pub name: Option<String>,
    /// Bead type forced on every member.
    pub beadtype: Option<i64>,
}

/// Named objects and collections in index order.
///
/// ```
/// use regionkit::{Geometry, ObjectOptions, Registry};
///
/// let mut r = Registry::default();
/// let name = r.create(Geometry::sphere(0, 0, 0, 3), ObjectOptions::default()).unwrap();
/// assert_eq!(name, "sphere001");
/// assert_eq!(r.code("sphere001", false).unwrap(),
///            "region sphere001 sphere 0 0 0 3\ncreate_atoms 1 region sphere001\n");
/// ```
#[derive(Debug)]
pub struct Registry {
    config: RegionConfig,
    entries: IndexMap<String, Entry>,
    total: usize,
    per_kind: BTreeMap<Kind, usize>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            config: RegionConfig::default(),
            entries: IndexMap::new(),
            total: 0,
            per_kind: BTreeMap::new(),
        }
    }
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Config`] if `config` does not validate.
    pub fn new(config: RegionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Number of entries ever counted and not deleted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Counter of one kind.
    #[must_use]
    pub fn counter(&self, kind: Kind) -> usize {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Every non-zero per-kind counter.
    #[must_use]
    pub fn counters(&self) -> &BTreeMap<Kind, usize> {
        &self.per_kind
    }

    fn next_indices(
        &self,
        kind: Kind,
        index: Option<usize>,
        subindex: Option<usize>,
    ) -> (usize, usize) {
        (
            index.unwrap_or(self.total + 1),
            subindex.unwrap_or(self.counter(kind) + 1),
        )
    }

    fn default_name(&self, kind: Kind) -> String {
        format!("{}{:03}", kind.name_prefix(), self.counter(kind) + 1)
    }

    fn context(&self, index: usize, subindex: usize) -> BuildContext {
        BuildContext {
            index,
            subindex,
            spacefilling: self.config.spacefilling,
            force_box_units: self.config.region_units == RegionUnits::Si,
            mass: self.config.mass,
            density: self.config.density,
            lattice_style: self.config.lattice_style,
            lattice_scale: self.config.lattice_scale,
        }
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.entries.contains_key(name) {
            return Err(RegionError::NameCollision(name.to_owned()));
        }
        Ok(())
    }

    fn insert(&mut self, entry: Entry) -> String {
        let name = entry.name().to_owned();
        let kind = entry.kind();
        debug!(name = %name, kind = kind.as_str(), index = entry.index(), "registered");
        self.entries.insert(name.clone(), entry);
        self.total += 1;
        *self.per_kind.entry(kind).or_insert(0) += 1;
        name
    }

    /// Builds an object from a preset and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NameCollision`] if the name is taken and
    /// [`RegionError::Validation`] for a bad keyword argument.
    pub fn create(&mut self, geometry: Geometry, options: ObjectOptions) -> Result<String> {
        let object = self.create_detached(geometry, options)?;
        self.ensure_free(object.name())?;
        Ok(self.insert(Entry::Object(object)))
    }

    /// Builds an object with the indices it would get, without storing it.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Validation`] for a bad keyword argument.
    pub fn create_detached(
        &self,
        geometry: Geometry,
        options: ObjectOptions,
    ) -> Result<SectionedObject> {
        let kind = geometry.kind();
        let (index, subindex) = self.next_indices(kind, options.index, options.subindex);
        let name = options.name.clone().unwrap_or_else(|| self.default_name(kind));
        SectionedObject::build(&geometry, name, &options, self.context(index, subindex))
    }

    /// Looks up an entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotFound`] if `name` is not registered.
    pub fn get(&self, name: &str) -> Result<&Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| RegionError::not_found("name", name))
    }

    /// Looks up an entry, if present.
    #[must_use]
    pub fn try_get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Looks up an object.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotFound`] for unknown names and
    /// [`RegionError::TypeMismatch`] for collections.
    pub fn object(&self, name: &str) -> Result<&SectionedObject> {
        self.get(name)?.object_or_mismatch()
    }

    /// Mutable access to an object.
    ///
    /// # Errors
    ///
    /// See [`Registry::object`].
    pub fn object_mut(&mut self, name: &str) -> Result<&mut SectionedObject> {
        match self.entries.get_mut(name) {
            None => Err(RegionError::not_found("name", name)),
            Some(Entry::Object(o)) => Ok(o),
            Some(Entry::Collection(_)) => Err(RegionError::TypeMismatch {
                expected: "object",
                found: "collection",
            }),
        }
    }

    /// Mutable access to a collection.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotFound`] for unknown names and
    /// [`RegionError::TypeMismatch`] for objects.
    pub fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        match self.entries.get_mut(name) {
            None => Err(RegionError::not_found("name", name)),
            Some(Entry::Collection(c)) => Ok(c),
            Some(Entry::Object(_)) => Err(RegionError::TypeMismatch {
                expected: "collection",
                found: "object",
            }),
        }
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by global index; ties keep insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<&Entry> {
        let mut out: Vec<&Entry> = self.entries.values().collect();
        out.sort_by_key(|e| e.index());
        out
    }

    /// The `i`-th entry in index order.
    #[must_use]
    pub fn at(&self, i: usize) -> Option<&Entry> {
        self.entries().get(i).copied()
    }

    /// Names in index order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries().iter().map(|e| e.name().to_owned()).collect()
    }

    /// Owned list of names to iterate over while mutating the registry.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.names()
    }

    /// Stores or deletes under `name`.
    ///
    /// An existing entry under `name` is replaced. Chained composites and
    /// `eval` objects go through [`Registry::eval`]; anything else is
    /// copied, renamed and given fresh indices. A fused composite gets one
    /// bead type on every constituent, like [`Registry::eval`].
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotFound`] when deleting an absent name.
    pub fn set(&mut self, name: &str, value: Assignment) -> Result<()> {
        let object = match value {
            Assignment::Empty => return self.delete(name).map(|_| ()),
            Assignment::Object(object) => object,
        };
        if self.contains(name) {
            self.delete(name)?;
        }
        if object.is_chained() || object.kind() == Kind::Eval {
            let options = EvalOptions {
                name: Some(name.to_owned()),
                ..EvalOptions::default()
            };
            return self.eval(&object, options).map(|_| ());
        }
        let (index, subindex) = self.next_indices(object.kind(), None, None);
        let mut copy = object.duplicate();
        copy.rename(name);
        copy.reindex(index, subindex);
        if copy.is_composite() {
            copy.set_beadtype(object.beadtype());
        }
        self.insert(Entry::Object(copy));
        Ok(())
    }

    /// Removes an entry and decrements its counters.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotFound`] if `name` is not registered.
    pub fn delete(&mut self, name: &str) -> Result<Entry> {
        let entry = self
            .entries
            .shift_remove(name)
            .ok_or_else(|| RegionError::not_found("name", name))?;
        self.total = self.total.saturating_sub(1);
        if let Some(n) = self.per_kind.get_mut(&entry.kind()) {
            *n = n.saturating_sub(1);
        }
        debug!(name, kind = entry.kind().as_str(), "deleted");
        Ok(entry)
    }

    /// Registers `region NAME union N id1 … idN` and disables atom creation
    /// in every operand.
    ///
    /// # Errors
    ///
    /// See [`Registry::intersect`].
    pub fn union(&mut self, operands: &[RegionRef], options: BooleanOptions) -> Result<String> {
        self.boolean(Kind::Union, operands, options)
    }

    /// Registers `region NAME intersect N id1 … idN` and disables atom
    /// creation in every operand.
    ///
    /// # Errors
    ///
    /// - [`RegionError::Validation`] for fewer than two operands.
    /// - [`RegionError::NotFound`] for an unknown name or an index past
    ///   [`Registry::names`].
    /// - [`RegionError::TypeMismatch`] for a collection or composite
    ///   operand.
    /// - [`RegionError::NameCollision`] for a repeated operand or a taken
    ///   result name.
    pub fn intersect(&mut self, operands: &[RegionRef], options: BooleanOptions) -> Result<String> {
        self.boolean(Kind::Intersect, operands, options)
    }

    fn boolean(
        &mut self,
        kind: Kind,
        operands: &[RegionRef],
        options: BooleanOptions,
    ) -> Result<String> {
        if operands.len() < 2 {
            return Err(RegionError::validation(
                kind.as_str(),
                format!("needs at least two regions, got {}", operands.len()),
            ));
        }
        let names = self.names();
        let mut resolved: Vec<String> = Vec::with_capacity(operands.len());
        for operand in operands {
            let name = match operand {
                RegionRef::Name(name) => name.clone(),
                RegionRef::Index(i) => names
                    .get(*i)
                    .cloned()
                    .ok_or_else(|| RegionError::not_found("index", i.to_string()))?,
            };
            if self.object(&name)?.is_composite() {
                return Err(RegionError::TypeMismatch {
                    expected: "region",
                    found: "composite",
                });
            }
            if resolved.contains(&name) {
                return Err(RegionError::NameCollision(name));
            }
            resolved.push(name);
        }
        let name = options.name.unwrap_or_else(|| self.default_name(kind));
        self.ensure_free(&name)?;

        let mut ids = Vec::with_capacity(resolved.len());
        for operand in &resolved {
            ids.push(self.object(operand)?.id());
        }
        let (index, subindex) = self.next_indices(kind, options.index, options.subindex);
        let combined = SectionedObject::boolean(
            kind,
            name,
            &ids,
            options.beadtype.unwrap_or(1),
            self.context(index, subindex),
        );
        for operand in &resolved {
            self.object_mut(operand)?.set_flag(SectionKind::Create, false);
        }
        debug!(operands = ?resolved, kind = kind.as_str(), "combined");
        Ok(self.insert(Entry::Object(combined)))
    }

    /// Registers a composite as an `eval` object.
    ///
    /// Every stage of every section is given one bead type:
    /// `options.beadtype`, else the expression's own.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NameCollision`] if the name is taken.
    pub fn eval(&mut self, expression: &SectionedObject, options: EvalOptions) -> Result<String> {
        let name = options.name.unwrap_or_else(|| expression.name().to_owned());
        self.ensure_free(&name)?;
        let (index, subindex) = self.next_indices(Kind::Eval, options.index, options.subindex);
        let adopted = SectionedObject::adopt(expression, &name, index, subindex, options.beadtype);
        debug!(expression = expression.name(), "evaluated");
        Ok(self.insert(Entry::Object(adopted)))
    }

    /// Registers detached objects and collections as one collection.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NameCollision`] if the name is taken or two
    /// members share an alias, and [`RegionError::Validation`] when
    /// `members` is empty.
    pub fn collection(
        &mut self,
        members: Vec<(String, Entry)>,
        options: CollectionOptions,
    ) -> Result<String> {
        let name = options
            .name
            .unwrap_or_else(|| self.default_name(Kind::Collection));
        self.ensure_free(&name)?;
        let (index, subindex) = self.next_indices(Kind::Collection, None, None);
        let collection = Collection::new(name, index, subindex, members, options.beadtype)?;
        Ok(self.insert(Entry::Collection(collection)))
    }

    /// Registers one sphere per particle as a collection.
    ///
    /// Spheres are named `glob00`, `glob01`, … . `beadtype` wins over the
    /// particle's own type, which wins over 1.
    ///
    /// # Errors
    ///
    /// See [`Registry::collection`].
    pub fn scatter(
        &mut self,
        source: &impl ParticleSource,
        name: Option<&str>,
        beadtype: Option<i64>,
    ) -> Result<String> {
        let particles = source.particles();
        let mut members = Vec::with_capacity(particles.len());
        for (i, p) in particles.iter().enumerate() {
            let alias = format!("glob{i:02}");
            let options = ObjectOptions {
                name: Some(alias.clone()),
                beadtype: Some(beadtype.or(p.beadtype).unwrap_or(1)),
                subindex: Some(i + 1),
                ..ObjectOptions::default()
            };
            let object = self.create_detached(Geometry::sphere(p.x, p.y, p.z, p.radius), options)?;
            members.push((alias, Entry::Object(object)));
        }
        let options = CollectionOptions {
            name: Some(name.unwrap_or("emulsion").to_owned()),
            beadtype: None,
        };
        self.collection(members, options)
    }

    /// `(beadtype, entries)` pairs sorted by bead type.
    #[must_use]
    pub fn count(&self) -> Vec<(i64, usize)> {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for entry in self.entries.values() {
            for b in entry.beadtypes() {
                *counts.entry(b).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    /// Distinct bead types in use, sorted.
    #[must_use]
    pub fn beadtypes(&self) -> Vec<i64> {
        self.count().into_iter().map(|(b, _)| b).collect()
    }

    /// Bead types declared by `create_box`.
    #[must_use]
    pub fn nbeads(&self) -> usize {
        let n = self.count().len().max(self.config.live.nbeads);
        n + usize::from(self.config.spacefilling)
    }

    /// Returns `true` if any entry has `fix move` active.
    #[must_use]
    pub fn has_fix_move(&self) -> bool {
        self.entries.values().any(Entry::has_move)
    }

    /// Sum of the entries' atom estimates.
    #[must_use]
    pub fn natoms(&self) -> u64 {
        self.entries.values().map(Entry::natoms).sum()
    }

    /// One entry's active sections, with no header or footer.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotFound`] if `name` is not registered.
    pub fn code(&self, name: &str, verbose: bool) -> Result<String> {
        Ok(self.get(name)?.code(verbose))
    }

    /// Init, lattice, box, mass and preview blocks for a standalone script.
    ///
    /// The bead count is the number of bead types in use, at least
    /// `config.nbeads`, plus one for the filling.
    #[must_use]
    pub fn headers(&self, parts: &[HeaderPart], masses: &[crate::headers::Mass]) -> String {
        let nbeads =
            self.count().len().max(self.config.nbeads) + usize::from(self.config.spacefilling);
        script_headers(&self.config, nbeads, parts, masses)
    }
}
