//! Unfolds a U-channel and writes the flat pattern as DXF.
//!
//! ```text
//! cargo run --example unfold_channel
//! ```
//!
//! Writes `unfolded_result.dxf` into the current directory. Set `RUST_LOG`
//! to see stage-level events (e.g. `RUST_LOG=unbend=debug`).

use std::error::Error;
use std::f64::consts::FRAC_PI_2;

use unbend::creation::{MakeSheet, ProfileSegment, SheetProfile};
use unbend::topology::TopologyStore;
use unbend::unfold::SheetParams;
use unbend::{export, pipeline};

fn main() {
    // Default: WARN for everything, INFO for unbend.
    // Override with RUST_LOG (e.g. RUST_LOG=unbend=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("unbend=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Err(err) = run() {
        eprintln!("unfold failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    // 40 mm wide U-channel: two 15 mm legs on a 50 mm web, 2 mm radius.
    let profile = SheetProfile::open(vec![
        ProfileSegment::Flange { length: 15.0 },
        ProfileSegment::Bend {
            radius: 2.0,
            angle: FRAC_PI_2,
        },
        ProfileSegment::Flange { length: 50.0 },
        ProfileSegment::Bend {
            radius: 2.0,
            angle: FRAC_PI_2,
        },
        ProfileSegment::Flange { length: 15.0 },
    ])?;

    let mut store = TopologyStore::new();
    let solid = MakeSheet::new(profile, 40.0).execute(&mut store)?;

    let params = SheetParams::new(1.5, 0.4)?;
    let pattern = pipeline::unfold_solid(&store, solid, params)?;

    println!("flanges: {}", pattern.outlines().len());
    println!("bends:   {}", pattern.bend_lines().len());
    if let Some((min, max)) = pattern.bounds() {
        println!("blank:   {:.2} x {:.2} mm", max.x - min.x, max.y - min.y);
    }
    for line in pattern.bend_lines() {
        println!(
            "  bend {:?} {:.1} deg at r = {:.1} mm",
            line.direction,
            line.angle.abs().to_degrees(),
            line.radius
        );
    }

    export::export_pattern("unfolded_result.dxf", &pattern)?;
    println!("wrote unfolded_result.dxf");

    Ok(())
}
