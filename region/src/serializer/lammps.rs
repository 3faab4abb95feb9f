//! Linearizes a registry into one LAMMPS input program.
//!
//! Order of emission:
//!
//! 1. the space-filling prelude, when the box is filled;
//! 2. the live header, in live mode;
//! 3. section by section, every plain object in index order;
//! 4. every collection in index order, section by section over its members;
//! 5. union groups of collections;
//! 6. the live footer, in live mode.

use crate::headers::{live_footer, live_header, spacefilling_prelude};
use crate::registry::{Entry, Registry};
use crate::sections::SectionKind;

/// Switches of [`to_program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Wrap the program in a self-contained header and footer.
    pub live: bool,
    /// Keep comment and blank lines.
    pub verbose: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            live: false,
            verbose: true,
        }
    }
}

/// Assembles the full program.
#[must_use]
pub fn to_program(registry: &Registry, options: &AssembleOptions) -> String {
    let config = registry.config();
    let verbose = options.verbose;
    let entries = registry.entries();
    let mut out = String::with_capacity(4096);

    if config.spacefilling {
        out.push_str(&spacefilling_prelude(config, verbose));
    }
    if options.live {
        out.push_str(&live_header(config, registry.nbeads(), verbose));
    }

    for kind in SectionKind::ORDER {
        for entry in &entries {
            if let Entry::Object(object) = entry {
                if let Some(text) = object.render_section(kind, verbose) {
                    out.push_str(&text);
                }
            }
        }
    }

    let collections: Vec<_> = entries.iter().filter_map(|e| e.as_collection()).collect();
    for collection in &collections {
        for kind in SectionKind::ORDER {
            out.push_str(&collection.render_section(kind, verbose));
        }
    }
    for collection in &collections {
        out.push_str(&collection.render_groups(verbose));
    }

    if options.live {
        let mut beadtypes = registry.beadtypes();
        if config.spacefilling {
            beadtypes.push(config.filling_beadtype);
            beadtypes.sort_unstable();
            beadtypes.dedup();
        }
        out.push_str(&live_footer(config, &beadtypes, registry.has_fix_move(), verbose));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RegionConfig;
    use crate::geometry::Geometry;
    use crate::object::ObjectOptions;
    use crate::registry::CollectionOptions;

    const TERSE: AssembleOptions = AssembleOptions {
        live: false,
        verbose: false,
    };

    #[test]
    fn section_major_order() {
        let mut r = Registry::default();
        r.create(Geometry::sphere(0, 0, 0, 1), ObjectOptions::named("A").with_group())
            .unwrap();
        r.create(Geometry::sphere(3, 0, 0, 1), ObjectOptions::named("B")).unwrap();
        let program = to_program(&r, &TERSE);
        assert_eq!(
            program,
            "region A sphere 0 0 0 1\n\
             region B sphere 3 0 0 1\n\
             create_atoms 1 region A\n\
             create_atoms 1 region B\n\
             group GRPA region A\n\
             variable countGRPA equal count(GRPA)\n\
             print \"Number of atoms in GRPA: ${countGRPA}\"\n"
        );
    }

    #[test]
    fn collections_follow_objects() {
        let mut r = Registry::default();
        let m = r.create_detached(Geometry::sphere(0, 0, 0, 1), ObjectOptions::named("m")).unwrap();
        let name = r
            .collection(vec![("m".into(), m.into())], CollectionOptions {
                name: Some("drops".into()),
                beadtype: Some(2),
            })
            .unwrap();
        r.collection_mut(&name).unwrap().create_group();
        r.create(Geometry::block(0, 1, 0, 1, 0, 1), ObjectOptions::named("B")).unwrap();
        let program = to_program(&r, &TERSE);
        let block = program.find("region B block").unwrap();
        let member = program.find("region m sphere").unwrap();
        let union = program.find("group GRPdrops union GRPm").unwrap();
        assert!(block < member && member < union);
        assert!(program.contains("create_atoms 2 region m\n"));
    }

    #[test]
    fn spacefilling_replaces_create() {
        let config = RegionConfig {
            spacefilling: true,
            ..RegionConfig::default()
        };
        let mut r = Registry::new(config).unwrap();
        r.create(Geometry::sphere(0, 0, 0, 1), ObjectOptions::named("S").beadtype(2))
            .unwrap();
        let program = to_program(&r, &TERSE);
        assert!(program.starts_with(
            "region filledspace block -5 5 -5 5 -5 5\ncreate_atoms 1 region filledspace\n"
        ));
        assert!(!program.contains("create_atoms 2"));
    }

    #[test]
    fn live_wraps_program() {
        let mut r = Registry::default();
        r.create(Geometry::sphere(0, 0, 0, 1), ObjectOptions::named("S")).unwrap();
        let program = to_program(&r, &AssembleOptions {
            live: true,
            verbose: false,
        });
        assert!(program.starts_with("units lj\n"));
        assert!(program.contains("create_box 1 box\nregion S sphere"));
        assert!(program.ends_with("run 1\n"));
    }

    #[test]
    fn verbose_keeps_comments() {
        let mut r = Registry::default();
        r.create(Geometry::sphere(0, 0, 0, 1), ObjectOptions::named("S")).unwrap();
        let program = to_program(&r, &AssembleOptions::default());
        assert!(program.contains("# Create region S sphere"));
        assert!(program.contains("# variables to be used for S sphere"));
    }
}
