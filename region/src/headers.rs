//! Text blocks that surround the object sections: the space-filling
//! prelude, the live-preview header and footer, and standalone script
//! headers.

use regionkit_template::{strip_comments, Value};

use crate::config::{RegionConfig, RegionUnits};

/// Region ID of the space-filling block.
pub const FILLED_SPACE_ID: &str = "filledspace";

/// One block of [`script_headers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPart {
    /// `dimension`, `units`, `boundary`, `atom_style` and friends.
    Init,
    /// `lattice style scale [spacing …]`.
    Lattice,
    /// `region box block …` and `create_box`.
    Box,
    /// One `mass` line per bead type.
    Mass,
    /// `dump` of the initial geometry and `run 0`.
    Preview,
}

/// A per-bead mass: a number or an engine expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Mass {
    /// Numeric mass.
    Number(f64),
    /// Expression, emitted in parentheses.
    Expression(String),
}

impl From<f64> for Mass {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Mass {
    fn from(v: &str) -> Self {
        Self::Expression(v.to_owned())
    }
}

fn num(v: f64) -> String {
    Value::Float(v).to_string()
}

fn finish(text: String, verbose: bool) -> String {
    if verbose {
        text
    } else {
        strip_comments(&text)
    }
}

/// `region filledspace block …` then `create_atoms` with the filling type.
#[must_use]
pub fn spacefilling_prelude(config: &RegionConfig, verbose: bool) -> String {
    let b = config.box_bounds();
    let mut out = String::with_capacity(256);
    out.push_str("# Fill the simulation box with beads\n");
    out.push_str(&format!(
        "region {FILLED_SPACE_ID} block {} {} {} {} {} {}\n",
        num(b[0]),
        num(b[1]),
        num(b[2]),
        num(b[3]),
        num(b[4]),
        num(b[5])
    ));
    out.push_str(&format!(
        "create_atoms {} region {FILLED_SPACE_ID}\n\n",
        config.filling_beadtype
    ));
    finish(out, verbose)
}

/// Header of the self-contained live-preview program.
#[must_use]
pub fn live_header(config: &RegionConfig, nbeads: usize, verbose: bool) -> String {
    let live = &config.live;
    let mut out = String::with_capacity(512);
    out.push_str("# LIVE preview header\n");
    out.push_str(&format!("units {}\n", live.units));
    out.push_str(&format!("atom_style {}\n", live.atom_style));
    out.push_str(&format!(
        "lattice {} {}\n",
        live.lattice_style.as_str(),
        num(config.live_lattice_scale())
    ));
    let [width, height, depth] = config.live_extent();
    out.push_str(&format!("variable halfwidth equal {}/2\n", num(width)));
    out.push_str(&format!("variable halfheight equal {}/2\n", num(height)));
    out.push_str(&format!("variable halfdepth equal {}/2\n", num(depth)));
    out.push_str(
        "region box block -${halfwidth} ${halfwidth} -${halfheight} ${halfheight} -${halfdepth} ${halfdepth}\n",
    );
    out.push_str(&format!("create_box {nbeads} box\n\n"));
    finish(out, verbose)
}

/// Footer of the live-preview program: masses, a Lennard-Jones pair style
/// over `beadtypes`, and the run.
#[must_use]
pub fn live_footer(
    config: &RegionConfig,
    beadtypes: &[i64],
    has_move: bool,
    verbose: bool,
) -> String {
    let mut out = String::with_capacity(512);
    out.push_str("\n# LIVE preview footer\n");
    for b in beadtypes {
        out.push_str(&format!("mass {b} 1.0\n"));
    }
    out.push_str("velocity all create 1.44 87287 loop geom\n");
    out.push_str("pair_style lj/cut 2.5\n");
    for b in beadtypes {
        out.push_str(&format!("pair_coeff {b} {b} 1.0 1.0 2.5\n"));
    }
    for (i, b1) in beadtypes.iter().enumerate() {
        for b2 in &beadtypes[i + 1..] {
            out.push_str(&format!("pair_coeff {b1} {b2} 1.0 1.0 2.5\n"));
        }
    }
    out.push_str("neighbor 0.3 bin\n");
    out.push_str("neigh_modify delay 0 every 20 check no\n");
    out.push_str("fix 1 all nve\n");
    let steps = if has_move {
        config.live.dynamic_run
    } else {
        config.live.static_run
    };
    out.push_str(&format!("run {steps}\n"));
    finish(out, verbose)
}

/// Builds the requested header blocks in the order given.
///
/// `masses` is padded with its last value, or truncated, to `nbeads`
/// entries; an empty list means unit masses.
#[must_use]
pub fn script_headers(
    config: &RegionConfig,
    nbeads: usize,
    parts: &[HeaderPart],
    masses: &[Mass],
) -> String {
    let mut out = String::with_capacity(1024);
    for part in parts {
        match part {
            HeaderPart::Init => init_block(config, &mut out),
            HeaderPart::Lattice => {
                out.push_str("# Lattice\n");
                out.push_str(&format!(
                    "lattice {} {}",
                    config.lattice_style.as_str(),
                    num(config.lattice_scale)
                ));
                if let Some([sx, sy, sz]) = config.lattice_spacing {
                    out.push_str(&format!(" spacing {} {} {}", num(sx), num(sy), num(sz)));
                }
                out.push_str("\n\n");
            }
            HeaderPart::Box => {
                let b = config.box_bounds();
                out.push_str("# Simulation box\n");
                out.push_str(&format!(
                    "region {} block {} {} {} {} {} {}",
                    config.box_id,
                    num(b[0]),
                    num(b[1]),
                    num(b[2]),
                    num(b[3]),
                    num(b[4]),
                    num(b[5])
                ));
                if config.region_units == RegionUnits::Si {
                    out.push_str(" units box");
                }
                out.push('\n');
                out.push_str(&format!("create_box {nbeads} {}\n\n", config.box_id));
            }
            HeaderPart::Mass => {
                out.push_str("# Masses\n");
                for (i, m) in padded(masses, nbeads).iter().enumerate() {
                    let text = match m {
                        Mass::Number(v) => num(*v),
                        Mass::Expression(e) => format!("({e})"),
                    };
                    out.push_str(&format!("mass {} {text}\n", i + 1));
                }
                out.push('\n');
            }
            HeaderPart::Preview => {
                out.push_str("# Preview of the initial geometry\n");
                out.push_str(&format!(
                    "dump initial_dump all custom 1 {} id type x y z\n",
                    config.preview_filename
                ));
                out.push_str("run 0\n\n");
            }
        }
    }
    out
}

fn init_block(config: &RegionConfig, out: &mut String) {
    out.push_str("# Initialization\n");
    let boundary = config.boundary().join(" ");
    let dimension = config.dimension.to_string();
    for (command, value) in [
        ("dimension", dimension.as_str()),
        ("units", config.units.as_str()),
        ("boundary", boundary.as_str()),
        ("atom_style", config.atom_style.as_str()),
        ("atom_modify", config.atom_modify.as_str()),
        ("comm_modify", config.comm_modify.as_str()),
        ("neigh_modify", config.neigh_modify.as_str()),
        ("newton", config.newton.as_str()),
    ] {
        if !value.trim().is_empty() {
            out.push_str(&format!("{command} {value}\n"));
        }
    }
    out.push('\n');
}

fn padded(masses: &[Mass], n: usize) -> Vec<Mass> {
    let last = masses.last().cloned().unwrap_or(Mass::Number(1.0));
    let mut out: Vec<Mass> = masses.iter().take(n).cloned().collect();
    out.resize(n, last);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_spans_the_box() {
        let config = RegionConfig {
            width: 20.0,
            filling_beadtype: 3,
            ..RegionConfig::default()
        };
        assert_eq!(
            spacefilling_prelude(&config, false),
            "region filledspace block -10 10 -5 5 -5 5\ncreate_atoms 3 region filledspace\n"
        );
    }

    #[test]
    fn live_header_leaves_half_extents_to_the_engine() {
        let text = live_header(&RegionConfig::default(), 2, false);
        assert!(text.starts_with("units lj\natom_style atomic\nlattice fcc 0.8442\n"));
        assert!(text.contains("variable halfwidth equal 10/2\n"));
        assert!(text.contains("region box block -${halfwidth} ${halfwidth}"));
        assert!(text.ends_with("create_box 2 box\n"));
    }

    #[test]
    fn live_header_converts_si_lengths() {
        let config = RegionConfig {
            region_units: RegionUnits::Si,
            width: 3.0,
            lattice_scale: 0.5,
            separation_distance: 0.125,
            ..RegionConfig::default()
        };
        let text = live_header(&config, 1, false);
        assert!(text.contains("lattice fcc 4\n"));
        assert!(text.contains("variable halfwidth equal 6/2\n"));
    }

    #[test]
    fn live_footer_pairs() {
        let text = live_footer(&RegionConfig::default(), &[1, 2, 3], false, false);
        assert!(text.contains("mass 3 1.0\n"));
        assert!(text.contains(
            "pair_coeff 2 2 1.0 1.0 2.5\npair_coeff 3 3 1.0 1.0 2.5\npair_coeff 1 2 1.0 1.0 2.5\n"
        ));
        assert!(text.contains("pair_coeff 2 3 1.0 1.0 2.5\n"));
        assert!(text.ends_with("fix 1 all nve\nrun 1\n"));
        let moving = live_footer(&RegionConfig::default(), &[1], true, false);
        assert!(moving.ends_with("run 100\n"));
    }

    #[test]
    fn init_skips_empty_values() {
        let text = script_headers(&RegionConfig::default(), 1, &[HeaderPart::Init], &[]);
        assert!(text.contains("dimension 3\n"));
        assert!(text.contains("boundary sm sm sm\n"));
        assert!(text.contains("atom_style smd\n"));
        assert!(!text.contains("units"));
    }

    #[test]
    fn lattice_and_box() {
        let config = RegionConfig {
            lattice_spacing: Some([1.0, 2.0, 0.5]),
            region_units: RegionUnits::Si,
            ..RegionConfig::default()
        };
        let text = script_headers(&config, 2, &[HeaderPart::Lattice, HeaderPart::Box], &[]);
        assert!(text.contains("lattice fcc 0.8442 spacing 1 2 0.5\n"));
        assert!(text.contains("region box block -5 5 -5 5 -5 5 units box\ncreate_box 2 box\n"));
    }

    #[test]
    fn masses_are_padded_and_truncated() {
        let config = RegionConfig::default();
        let masses = [Mass::from(2.0), Mass::from("v_m")];
        let text = script_headers(&config, 3, &[HeaderPart::Mass], &masses);
        assert!(text.contains("mass 1 2\nmass 2 (v_m)\nmass 3 (v_m)\n"));
        let masses = [Mass::from(2.0), Mass::from(3.0)];
        let text = script_headers(&config, 1, &[HeaderPart::Mass], &masses);
        assert!(text.contains("mass 1 2\n"));
        assert!(!text.contains("mass 2"));
    }

    #[test]
    fn preview_dumps_and_runs_zero() {
        let text = script_headers(&RegionConfig::default(), 1, &[HeaderPart::Preview], &[]);
        assert!(text.contains(
            "dump initial_dump all custom 1 initial_geometry.dump id type x y z\nrun 0\n"
        ));
    }
}
