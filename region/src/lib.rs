//! Composable LAMMPS region scripts.
//!
//! The `regionkit` crate builds geometry objects (blocks, spheres, cones,
//! …) whose command text is split into sections: variable declarations,
//! the `region` definition, atom creation, grouping, type reassignment and
//! `fix move`. Objects combine with `+` (fuse), `|` (pipe) and `+=`, and a
//! [`Registry`] linearizes everything into one input program.
//!
//! # Entry Point
//!
//! ```
//! use regionkit::{BooleanOptions, Geometry, ObjectOptions, RegionRef, Registry};
//!
//! let mut r = Registry::default();
//! r.create(Geometry::sphere(0, 0, 0, 3), ObjectOptions::named("S1")).unwrap();
//! r.create(Geometry::sphere(5, 0, 0, 2), ObjectOptions::named("S2")).unwrap();
//! r.union(&[RegionRef::from("S1"), RegionRef::from("S2")], BooleanOptions {
//!     name: Some("U1".into()),
//!     ..BooleanOptions::default()
//! })
//! .unwrap();
//!
//! let program = regionkit::serializer::lammps::to_program(&r, &Default::default());
//! assert_eq!(program.matches("region U1 union 2 S1 S2").count(), 1);
//! ```
//!
//! # Algebra
//!
//! ```
//! use regionkit::{Geometry, ObjectOptions, Registry};
//!
//! let r = Registry::default();
//! let a = r.create_detached(Geometry::sphere(0, 0, 0, 3), ObjectOptions::named("A")).unwrap();
//! let b = r
//!     .create_detached(Geometry::block(4, 6, -1, 1, -1, 1), ObjectOptions::named("B"))
//!     .unwrap();
//! let both = &a + &b;
//! assert_eq!(both.name(), "A+B");
//! assert!(both.try_copy().is_err());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod collection;
pub mod config;
pub mod error;
pub mod geometry;
pub mod headers;
pub mod object;
pub mod registry;
pub mod scatter;
pub mod sections;
pub mod serializer;
pub mod validators;

pub use collection::Collection;
pub use config::{LatticeStyle, LiveConfig, RegionConfig, RegionUnits};
pub use error::{RegionError, Result};
pub use geometry::{Alike, Axis, Geometry, Kind};
pub use headers::{HeaderPart, Mass};
pub use object::{Composition, ObjectOptions, SectionedObject};
pub use registry::{
    Assignment, BooleanOptions, CollectionOptions, Entry, EvalOptions, Registry, RegionRef,
};
pub use scatter::{Emulsion, InsertRequest, Particle, ParticleSource, Scatter};
pub use sections::{SectionKind, SectionSet};
pub use validators::{Component, MoveStyle, OpenArg, TransformArg};

pub use regionkit_template::{Value, VarBag};
