//! Output formats for a [`crate::Registry`].
//!
//! - **LAMMPS** ([`lammps`]): the linearized input program.
//! - **JSON** ([`json`]): an inventory of entries, behind the `serializers` feature.

#[cfg(feature = "serializers")]
pub mod json;
pub mod lammps;
