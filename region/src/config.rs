//! Registry configuration, loadable from TOML.
//!
//! ```
//! let config = regionkit::RegionConfig::from_toml_str(
//!     r#"
//!     name = "gel"
//!     width = 20
//!     spacefilling = true
//!     [live]
//!     nbeads = 2
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.width, 20.0);
//! assert_eq!(config.boundary(), vec!["sm", "sm", "sm"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};

/// How geometry coordinates are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionUnits {
    /// Lattice units; the `units` keyword is left to each object.
    #[default]
    Lattice,
    /// SI units; every object is emitted with `units box`.
    Si,
}

/// Crystal lattice used to estimate atom counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatticeStyle {
    /// Simple cubic.
    Sc,
    /// Body-centred cubic.
    Bcc,
    /// Face-centred cubic.
    #[default]
    Fcc,
    /// Hexagonal close-packed.
    Hcp,
    /// Diamond.
    Dia,
    /// Body-centred orthorhombic.
    Bco,
    /// Face-centred orthorhombic.
    Fco,
}

impl LatticeStyle {
    /// Returns the LAMMPS keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sc => "sc",
            Self::Bcc => "bcc",
            Self::Fcc => "fcc",
            Self::Hcp => "hcp",
            Self::Dia => "dia",
            Self::Bco => "bco",
            Self::Fco => "fco",
        }
    }

    /// Atoms per unit cell.
    #[must_use]
    pub const fn packing(self) -> f64 {
        match self {
            Self::Sc => 1.0,
            Self::Bcc | Self::Bco => 2.0,
            Self::Fcc | Self::Fco => 4.0,
            Self::Hcp => 6.0,
            Self::Dia => 8.0,
        }
    }
}

/// Settings of the self-contained "live" program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// `units` command argument.
    pub units: String,
    /// `atom_style` command argument.
    pub atom_style: String,
    /// Lattice style of the live box.
    pub lattice_style: LatticeStyle,
    /// Lattice scale of the live box.
    pub lattice_scale: f64,
    /// Minimum number of bead types declared by `create_box`.
    pub nbeads: usize,
    /// `run` steps when nothing moves.
    pub static_run: u64,
    /// `run` steps when at least one fix move is active.
    pub dynamic_run: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            units: "lj".to_owned(),
            atom_style: "atomic".to_owned(),
            lattice_style: LatticeStyle::Fcc,
            lattice_scale: 0.8442,
            nbeads: 1,
            static_run: 1,
            dynamic_run: 100,
        }
    }
}

/// Configuration of a [`crate::Registry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Display name of the container.
    pub name: String,
    /// 2 or 3.
    pub dimension: u8,
    /// Boundary flags, one per dimension. Empty means `sm` everywhere.
    pub boundary: Vec<String>,
    /// Minimum number of bead types declared by script headers.
    pub nbeads: usize,
    /// Default per-object mass.
    pub mass: f64,
    /// Default per-object density.
    pub density: f64,
    /// Box extent along x.
    pub width: f64,
    /// Box extent along y.
    pub height: f64,
    /// Box extent along z.
    pub depth: f64,
    /// Box centre.
    pub center: [f64; 3],
    /// Fill the whole box with beads before any object.
    pub spacefilling: bool,
    /// Bead type of the filling.
    pub filling_beadtype: i64,
    /// Coordinate units.
    pub region_units: RegionUnits,
    /// Physical separation between beads in SI units. Converts SI lengths
    /// to lattice units in the live program.
    pub separation_distance: f64,
    /// Lattice style for headers and atom estimates.
    pub lattice_style: LatticeStyle,
    /// Lattice scale for headers and atom estimates.
    pub lattice_scale: f64,
    /// Optional `spacing` triple of the lattice header.
    pub lattice_spacing: Option<[f64; 3]>,
    /// `units` of the init header.
    pub units: String,
    /// `atom_style` of the init header.
    pub atom_style: String,
    /// `atom_modify` of the init header.
    pub atom_modify: String,
    /// `comm_modify` of the init header.
    pub comm_modify: String,
    /// `neigh_modify` of the init header.
    pub neigh_modify: String,
    /// `newton` of the init header.
    pub newton: String,
    /// Region ID of the simulation box.
    pub box_id: String,
    /// Dump file written by the preview footer.
    pub preview_filename: String,
    /// Live-mode settings.
    pub live: LiveConfig,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: "region container".to_owned(),
            dimension: 3,
            boundary: Vec::new(),
            nbeads: 1,
            mass: 1.0,
            density: 1.0,
            width: 10.0,
            height: 10.0,
            depth: 10.0,
            center: [0.0; 3],
            spacefilling: false,
            filling_beadtype: 1,
            region_units: RegionUnits::Lattice,
            separation_distance: 5e-6,
            lattice_style: LatticeStyle::Fcc,
            lattice_scale: 0.8442,
            lattice_spacing: None,
            units: String::new(),
            atom_style: "smd".to_owned(),
            atom_modify: "map array".to_owned(),
            comm_modify: "vel yes".to_owned(),
            neigh_modify: "every 10 delay 0 check yes".to_owned(),
            newton: "off".to_owned(),
            box_id: "box".to_owned(),
            preview_filename: "initial_geometry.dump".to_owned(),
            live: LiveConfig::default(),
        }
    }
}

impl RegionConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::ConfigParse`] for malformed TOML and
    /// [`RegionError::Config`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RegionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.dimension, 2 | 3) {
            return Err(RegionError::Config(format!(
                "dimension must be 2 or 3, got {}",
                self.dimension
            )));
        }
        if !self.boundary.is_empty() && self.boundary.len() != usize::from(self.dimension) {
            return Err(RegionError::Config(format!(
                "boundary needs {} entries, got {}",
                self.dimension,
                self.boundary.len()
            )));
        }
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("mass", self.mass),
            ("density", self.density),
            ("lattice_scale", self.lattice_scale),
            ("separation_distance", self.separation_distance),
            ("live.lattice_scale", self.live.lattice_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(RegionError::Config(format!("{field} must be positive, got {value}")));
            }
        }
        if self.nbeads == 0 || self.live.nbeads == 0 {
            return Err(RegionError::Config("nbeads must be at least 1".to_owned()));
        }
        if self.filling_beadtype < 1 {
            return Err(RegionError::Config(format!(
                "filling_beadtype must be at least 1, got {}",
                self.filling_beadtype
            )));
        }
        Ok(())
    }

    /// Boundary flags, defaulting to `sm` on every axis.
    #[must_use]
    pub fn boundary(&self) -> Vec<String> {
        if self.boundary.is_empty() {
            vec!["sm".to_owned(); usize::from(self.dimension)]
        } else {
            self.boundary.clone()
        }
    }

    /// `[xmin, xmax, ymin, ymax, zmin, zmax]` of the simulation box.
    #[must_use]
    pub fn box_bounds(&self) -> [f64; 6] {
        let [cx, cy, cz] = self.center;
        [
            cx - self.width / 2.0,
            cx + self.width / 2.0,
            cy - self.height / 2.0,
            cy + self.height / 2.0,
            cz - self.depth / 2.0,
            cz + self.depth / 2.0,
        ]
    }

    /// Box extents of the live program. SI extents are rounded up to whole
    /// lattice units.
    #[must_use]
    pub fn live_extent(&self) -> [f64; 3] {
        let extent = [self.width, self.height, self.depth];
        match self.region_units {
            RegionUnits::Lattice => extent,
            RegionUnits::Si => extent.map(|x| (x / self.lattice_scale).ceil()),
        }
    }

    /// Lattice scale of the live program.
    #[must_use]
    pub fn live_lattice_scale(&self) -> f64 {
        match self.region_units {
            RegionUnits::Lattice => self.live.lattice_scale,
            RegionUnits::Si => self.lattice_scale / self.separation_distance,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RegionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.box_bounds(), [-5.0, 5.0, -5.0, 5.0, -5.0, 5.0]);
        assert_eq!(config.live.units, "lj");
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(RegionConfig::from_toml_str("").unwrap(), RegionConfig::default());
    }

    #[test]
    fn parses_enums() {
        let config =
            RegionConfig::from_toml_str("region_units = \"si\"\nlattice_style = \"bcc\"").unwrap();
        assert_eq!(config.region_units, RegionUnits::Si);
        assert_eq!(config.lattice_style.packing(), 2.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            RegionConfig::from_toml_str("dimension = 4"),
            Err(RegionError::Config(_))
        ));
        assert!(matches!(
            RegionConfig::from_toml_str("dimension = 2\nboundary = [\"p\", \"p\", \"p\"]"),
            Err(RegionError::Config(_))
        ));
        assert!(matches!(
            RegionConfig::from_toml_str("width = -1"),
            Err(RegionError::Config(_))
        ));
        assert!(matches!(
            RegionConfig::from_toml_str("width = \"wide\""),
            Err(RegionError::ConfigParse(_))
        ));
    }

    #[test]
    fn si_units_rescale_the_live_box() {
        let config = RegionConfig::from_toml_str(
            "region_units = \"si\"\nwidth = 1e-4\nheight = 5e-5\ndepth = 2.1e-5\n\
             lattice_scale = 1e-5\nseparation_distance = 2e-6",
        )
        .unwrap();
        assert_eq!(config.live_extent(), [10.0, 5.0, 3.0]);
        assert!((config.live_lattice_scale() - 5.0).abs() < 1e-9);
        let lattice = RegionConfig::default();
        assert_eq!(lattice.live_extent(), [10.0, 10.0, 10.0]);
        assert_eq!(lattice.live_lattice_scale(), 0.8442);
        assert!(matches!(
            RegionConfig::from_toml_str("separation_distance = 0"),
            Err(RegionError::Config(_))
        ));
    }

    #[test]
    fn two_dimensional_boundary() {
        let config = RegionConfig {
            dimension: 2,
            ..RegionConfig::default()
        };
        assert_eq!(config.boundary(), vec!["sm", "sm"]);
    }
}
