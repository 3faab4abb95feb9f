//! Named groupings of detached objects and nested collections.

use indexmap::IndexMap;
use regionkit_template::{strip_comments, Fragment, Value, VarBag};

use crate::error::{RegionError, Result};
use crate::object::GROUP_PREFIX;
use crate::registry::Entry;
use crate::sections::SectionKind;

const UNION_GROUP_TEMPLATE: &str = "\
% Create group ${groupID} from the groups of its members (URL: https://docs.lammps.org/group.html)
group ${groupID} union ${members}";

/// Members keyed by alias, emitted as one unit after plain objects.
#[derive(Debug, PartialEq)]
pub struct Collection {
    name: String,
    index: usize,
    subindex: usize,
    beadtype: Option<i64>,
    members: IndexMap<String, Entry>,
    group: bool,
}

impl Collection {
    /// Builds a collection and applies `beadtype` to every member.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NameCollision`] when two members share an
    /// alias, and [`RegionError::Validation`] when there are no members.
    pub(crate) fn new(
        name: String,
        index: usize,
        subindex: usize,
        members: Vec<(String, Entry)>,
        beadtype: Option<i64>,
    ) -> Result<Self> {
        if members.is_empty() {
            return Err(RegionError::validation(
                "members",
                "a collection needs at least one member",
            ));
        }
        let mut map = IndexMap::with_capacity(members.len());
        for (alias, entry) in members {
            if map.contains_key(&alias) {
                return Err(RegionError::NameCollision(alias));
            }
            map.insert(alias, entry);
        }
        let mut collection = Self {
            name,
            index,
            subindex,
            beadtype: None,
            members: map,
            group: false,
        };
        if let Some(beadtype) = beadtype {
            collection.set_beadtype(beadtype);
        }
        Ok(collection)
    }

    /// Collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
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

    /// Bead type forced on every member, if any.
    #[must_use]
    pub fn beadtype(&self) -> Option<i64> {
        self.beadtype
    }

    /// Number of direct members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Looks up a direct member by alias.
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&Entry> {
        self.members.get(alias)
    }

    /// Direct members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Group ID of the union group.
    #[must_use]
    pub fn group_id(&self) -> String {
        format!("{GROUP_PREFIX}{}", self.name)
    }

    /// Whether the union group is emitted.
    #[must_use]
    pub fn has_group(&self) -> bool {
        self.group
    }

    /// Forces `beadtype` on every member, recursively.
    pub fn set_beadtype(&mut self, beadtype: i64) {
        self.beadtype = Some(beadtype);
        for entry in self.members.values_mut() {
            match entry {
                Entry::Object(o) => o.set_beadtype(beadtype),
                Entry::Collection(c) => c.set_beadtype(beadtype),
            }
        }
    }

    /// Enables member groups, recursively, and the union group.
    pub fn create_group(&mut self) {
        for entry in self.members.values_mut() {
            match entry {
                Entry::Object(o) => o.create_group(),
                Entry::Collection(c) => c.create_group(),
            }
        }
        self.group = true;
    }

    /// Disables the union group; member groups too when `recursive`.
    pub fn remove_group(&mut self, recursive: bool) {
        if recursive {
            for entry in self.members.values_mut() {
                match entry {
                    Entry::Object(o) => o.remove_group(),
                    Entry::Collection(c) => c.remove_group(true),
                }
            }
        }
        self.group = false;
    }

    /// Distinct member bead types, sorted.
    #[must_use]
    pub fn beadtypes(&self) -> Vec<i64> {
        let mut out: Vec<i64> = self.members.values().flat_map(Entry::beadtypes).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Returns `true` if any member has `move` active.
    #[must_use]
    pub fn has_move(&self) -> bool {
        self.members.values().any(Entry::has_move)
    }

    /// Sum of the members' atom estimates.
    #[must_use]
    pub fn natoms(&self) -> u64 {
        self.members.values().map(Entry::natoms).sum()
    }

    /// One section of every member, recursively.
    #[must_use]
    pub fn render_section(&self, kind: SectionKind, verbose: bool) -> String {
        let mut out = String::new();
        for entry in self.members.values() {
            match entry {
                Entry::Object(o) => {
                    if let Some(text) = o.render_section(kind, verbose) {
                        out.push_str(&text);
                    }
                }
                Entry::Collection(c) => out.push_str(&c.render_section(kind, verbose)),
            }
        }
        out
    }

    /// Union groups of nested collections, then this one's.
    #[must_use]
    pub fn render_groups(&self, verbose: bool) -> String {
        let mut out = String::new();
        for entry in self.members.values() {
            if let Entry::Collection(c) = entry {
                out.push_str(&c.render_groups(verbose));
            }
        }
        if self.group {
            let members: Vec<String> = self
                .members
                .values()
                .flat_map(|entry| match entry {
                    Entry::Object(o) => o.group_ids(),
                    Entry::Collection(c) => vec![c.group_id()],
                })
                .collect();
            let statics = VarBag::new()
                .with("groupID", Value::verbatim(self.group_id()))
                .with("members", Value::verbatim(members.join(" ")));
            let mut text =
                Fragment::new("group", 5, UNION_GROUP_TEMPLATE).render(&statics, &VarBag::new());
            text.push('\n');
            out.push_str(&if verbose { text } else { strip_comments(&text) });
        }
        out
    }

    /// Every section of every member, then the union groups.
    #[must_use]
    pub fn code(&self, verbose: bool) -> String {
        let mut out: String = SectionKind::ORDER
            .into_iter()
            .map(|kind| self.render_section(kind, verbose))
            .collect();
        out.push_str(&self.render_groups(verbose));
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::object::tests::sphere;

    fn pair() -> Collection {
        Collection::new(
            "drops".into(),
            1,
            1,
            vec![
                ("a".into(), Entry::Object(sphere("A", 0, 1))),
                ("b".into(), Entry::Object(sphere("B", 3, 1))),
            ],
            Some(2),
        )
        .unwrap()
    }

    #[test]
    fn beadtype_reaches_members() {
        let c = pair();
        assert_eq!(c.beadtypes(), vec![2]);
        assert_eq!(
            c.render_section(SectionKind::Create, false),
            "create_atoms 2 region A\ncreate_atoms 2 region B\n"
        );
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let err = Collection::new(
            "c".into(),
            1,
            1,
            vec![
                ("a".into(), Entry::Object(sphere("A", 0, 1))),
                ("a".into(), Entry::Object(sphere("B", 3, 1))),
            ],
            None,
        );
        assert!(matches!(err, Err(RegionError::NameCollision(alias)) if alias == "a"));
    }

    #[test]
    fn empty_collection_is_rejected() {
        assert!(matches!(
            Collection::new("c".into(), 1, 1, Vec::new(), None),
            Err(RegionError::Validation { .. })
        ));
    }

    #[test]
    fn union_group_follows_sections() {
        let mut c = pair();
        assert_eq!(c.render_groups(false), "");
        c.create_group();
        let code = c.code(false);
        assert!(code.ends_with("group GRPdrops union GRPA GRPB\n"));
        assert!(code.contains("group GRPA region A\n"));
        c.remove_group(true);
        assert!(!c.code(false).contains("group"));
    }

    #[test]
    fn nested_groups_come_first() {
        let inner = pair();
        let mut outer = Collection::new(
            "all".into(),
            2,
            2,
            vec![
                ("inner".into(), Entry::Collection(inner)),
                ("c".into(), Entry::Object(sphere("C", 6, 1))),
            ],
            None,
        )
        .unwrap();
        outer.create_group();
        assert_eq!(outer.beadtypes(), vec![1, 2]);
        assert_eq!(
            outer.render_groups(false),
            "group GRPdrops union GRPA GRPB\ngroup GRPall union GRPdrops GRPC\n"
        );
    }

    #[test]
    fn composite_members_list_every_constituent_group() {
        let merged = &sphere("A", 0, 1) + &sphere("B", 3, 1);
        let mut c = Collection::new(
            "pairs".into(),
            1,
            1,
            vec![
                ("ab".into(), Entry::Object(merged)),
                ("c".into(), Entry::Object(sphere("C", 6, 1))),
            ],
            None,
        )
        .unwrap();
        c.create_group();
        let code = c.code(false);
        assert!(code.contains("group GRPA region A\n"));
        assert!(code.contains("group GRPB region B\n"));
        assert!(code.ends_with("group GRPpairs union GRPA GRPB GRPC\n"));
    }
}
