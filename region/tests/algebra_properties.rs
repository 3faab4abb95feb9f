//! Property-based tests for the object algebra and registry bookkeeping.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use regionkit::{
    Assignment, EvalOptions, Geometry, Kind, ObjectOptions, Registry, SectionKind, SectionedObject,
};

/// Toggles applied to a fresh sphere: group, setgroup, create off, move.
fn object_with(registry: &Registry, name: &str, toggles: [bool; 4]) -> SectionedObject {
    let mut o = registry
        .create_detached(Geometry::sphere(0, 0, 0, 1), ObjectOptions::named(name))
        .unwrap();
    if toggles[0] {
        o.create_group();
    }
    if toggles[1] {
        o.set_group();
    }
    if toggles[2] {
        o.set_flag(SectionKind::Create, false);
    }
    if toggles[3] {
        o.set_fix_move(regionkit::MoveStyle::Linear, &[regionkit::Component::from(1.0)])
            .unwrap();
    }
    o
}

// =============================================================================
// Merge and pipe
// =============================================================================

proptest! {
    /// A section is active in `A + B` exactly when it is active in either
    /// operand, for every section kind.
    #[test]
    fn prop_merge_flags_are_or(a in any::<[bool; 4]>(), b in any::<[bool; 4]>()) {
        let r = Registry::default();
        let x = object_with(&r, "A", a);
        let y = object_with(&r, "B", b);
        let merged = &x + &y;
        let piped = &x | &y;
        for kind in SectionKind::ORDER {
            let expected = x.sections().flag(kind) || y.sections().flag(kind);
            prop_assert_eq!(merged.sections().flag(kind), expected);
            prop_assert_eq!(piped.sections().flag(kind), expected);
        }
    }

    /// Combining never changes the operands.
    #[test]
    fn prop_operands_are_untouched(a in any::<[bool; 4]>(), b in any::<[bool; 4]>()) {
        let r = Registry::default();
        let x = object_with(&r, "A", a);
        let y = object_with(&r, "B", b);
        let (x_code, y_code) = (x.code(true), y.code(true));
        let _ = &x + &y;
        let _ = &x | &y;
        prop_assert_eq!(x.code(true), x_code);
        prop_assert_eq!(y.code(true), y_code);
        prop_assert_eq!(x.name(), "A");
        prop_assert!(!x.is_composite());
    }

    /// A chain of n spheres emits one region line per sphere, in order.
    #[test]
    fn prop_chain_keeps_every_region(n in 2usize..8) {
        let r = Registry::default();
        let objects: Vec<SectionedObject> = (0..n)
            .map(|i| object_with(&r, &format!("P{i}"), [false; 4]))
            .collect();
        let mut chained = &objects[0] | &objects[1];
        for o in &objects[2..] {
            chained = &chained | o;
        }
        let code = chained.code(false);
        let regions: Vec<&str> = code.lines().filter(|l| l.starts_with("region ")).collect();
        prop_assert_eq!(regions.len(), n);
        for (i, line) in regions.iter().enumerate() {
            let expected = format!("region P{i} sphere");
            prop_assert!(line.starts_with(&expected));
        }
        prop_assert!(chained.try_copy().is_err());
    }
}

proptest! {
    /// Merge is associative on names and on the regions it emits.
    #[test]
    fn prop_merge_is_associative_on_names(
        a in "[A-Z][a-z0-9]{0,4}",
        b in "[A-Z][a-z0-9]{0,4}",
        c in "[A-Z][a-z0-9]{0,4}",
    ) {
        let r = Registry::default();
        let (x, y, z) = (
            object_with(&r, &a, [false; 4]),
            object_with(&r, &b, [false; 4]),
            object_with(&r, &c, [false; 4]),
        );
        let left = &(&x + &y) + &z;
        let right = &x + &(&y + &z);
        prop_assert_eq!(left.name(), right.name());
        prop_assert_eq!(left.name(), format!("{a}+{b}+{c}"));
        prop_assert_eq!(left.region_ids(), right.region_ids());
        prop_assert_eq!(left.code(false), right.code(false));
    }
}

// =============================================================================
// Shared bead type of registered composites
// =============================================================================

/// Bead types of every `create_atoms` line.
fn created_types(code: &str) -> Vec<i64> {
    code.lines()
        .filter_map(|l| l.strip_prefix("create_atoms "))
        .filter_map(|l| l.split_whitespace().next())
        .map(|t| t.parse().unwrap())
        .collect()
}

/// Spheres `P0`, `P1`, … with the given bead types.
fn typed_spheres(registry: &Registry, types: &[i64]) -> Vec<SectionedObject> {
    types
        .iter()
        .enumerate()
        .map(|(i, t)| {
            registry
                .create_detached(
                    Geometry::sphere(i32::try_from(i).unwrap() * 3, 0, 0, 1),
                    ObjectOptions::named(format!("P{i}")).beadtype(*t),
                )
                .unwrap()
        })
        .collect()
}

proptest! {
    /// `eval` gives every stage of a chain one bead type: the override if
    /// given, else the first operand's.
    #[test]
    fn prop_eval_shares_one_beadtype(
        types in prop::collection::vec(1i64..5, 2..6),
        forced in prop::option::of(1i64..5),
    ) {
        let mut r = Registry::default();
        let objects = typed_spheres(&r, &types);
        let mut chained = &objects[0] | &objects[1];
        for o in &objects[2..] {
            chained = &chained | o;
        }
        let name = r
            .eval(&chained, EvalOptions { beadtype: forced, ..EvalOptions::default() })
            .unwrap();
        let expected = forced.unwrap_or(types[0]);
        let created = created_types(&r.code(&name, false).unwrap());
        prop_assert_eq!(created.len(), types.len());
        prop_assert!(created.iter().all(|t| *t == expected));
        prop_assert_eq!(r.count(), vec![(expected, 1)]);
    }

    /// Storing a fused composite with `set` gives every constituent the
    /// composite's bead type.
    #[test]
    fn prop_set_shares_one_beadtype(types in prop::collection::vec(1i64..5, 2..6)) {
        let mut r = Registry::default();
        let objects = typed_spheres(&r, &types);
        let mut merged = &objects[0] + &objects[1];
        for o in &objects[2..] {
            merged += o;
        }
        r.set("M", Assignment::Object(merged)).unwrap();
        let created = created_types(&r.code("M", false).unwrap());
        prop_assert_eq!(created.len(), types.len());
        prop_assert!(created.iter().all(|t| *t == types[0]));
        prop_assert_eq!(r.beadtypes(), vec![types[0]]);
    }
}

// =============================================================================
// Registry counters
// =============================================================================

proptest! {
    /// After creating spheres and blocks and deleting some, each counter
    /// equals the number of surviving entries of its kind.
    #[test]
    fn prop_counters_track_entries(
        kinds in prop::collection::vec(any::<bool>(), 1..12),
        deletions in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let mut r = Registry::default();
        for (i, is_sphere) in kinds.iter().enumerate() {
            let geometry = if *is_sphere {
                Geometry::sphere(0, 0, 0, 1)
            } else {
                Geometry::block(0, 1, 0, 1, 0, 1)
            };
            r.create(geometry, ObjectOptions::named(format!("E{i}"))).unwrap();
        }
        for d in deletions {
            let names = r.names();
            if names.is_empty() {
                break;
            }
            let name = &names[d.index(names.len())];
            r.delete(name).unwrap();
        }
        let spheres = r
            .names()
            .iter()
            .filter(|n| r.object(n).unwrap().kind() == Kind::Sphere)
            .count();
        let blocks = r.len() - spheres;
        prop_assert_eq!(r.counter(Kind::Sphere), spheres);
        prop_assert_eq!(r.counter(Kind::Block), blocks);
        prop_assert_eq!(r.total(), r.len());
    }
}
