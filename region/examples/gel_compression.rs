//! A gel slab with embedded droplets, compressed by a moving plate.
//!
//! Prints the live LAMMPS program on stdout and the registry inventory on
//! stderr.
//!
//! ```text
//! cargo run -p regionkit --example gel_compression > gel.lmp
//! ```

use anyhow::{Context, Result};
use regionkit::serializer::{json::to_json, lammps::to_program, lammps::AssembleOptions};
use regionkit::{
    Component, Emulsion, Geometry, MoveStyle, ObjectOptions, RegionConfig, Registry,
};

const CONFIG: &str = r#"
name = "gel compression"
width = 100
height = 100
depth = 100
center = [50, 50, 50]

[live]
nbeads = 3
dynamic_run = 2000
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = RegionConfig::from_toml_str(CONFIG).context("parsing the registry configuration")?;
    let mut r = Registry::new(config)?;

    r.create(
        Geometry::block(0, 100, 0, 100, 0, 40),
        ObjectOptions::named("gel").beadtype(1),
    )?;

    let mut droplets = Emulsion::new(2024)
        .with_bounds([5.0, 5.0, 5.0], [95.0, 95.0, 35.0])
        .with_beadtype(2);
    let placed = droplets.insertion(&[8.0, 6.0, 6.0, 5.0, 4.0, 4.0, 3.0], None);
    println!("# {placed} droplets placed");
    let emulsion = r.scatter(&droplets, Some("droplets"), None)?;
    r.collection_mut(&emulsion)?.create_group();

    let plate = r.create(
        Geometry::block(0, 100, 0, 100, 45, 50),
        ObjectOptions::named("plate")
            .beadtype(3)
            .with_static("speed", -0.05),
    )?;
    r.object_mut(&plate)?
        .set_fix_move(
            MoveStyle::Linear,
            &[Component::Null, Component::Null, Component::from("speed")],
        )
        .context("configuring the plate motion")?;

    let program = to_program(&r, &AssembleOptions {
        live: true,
        verbose: true,
    });
    println!("{program}");

    eprintln!("{}", serde_json::to_string_pretty(&to_json(&r))?);
    tracing::info!(entries = r.len(), natoms = r.natoms(), "done");
    Ok(())
}
