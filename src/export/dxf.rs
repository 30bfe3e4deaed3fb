//! Minimal DXF R12 writer for flat patterns.
//!
//! Laser-cutting services consume the classic R12 dialect: every outline
//! ring becomes a closed LWPOLYLINE on the default layer, and every bend
//! annotation becomes a LINE on a dedicated `BEND` layer so forming
//! services can pick them out. Nothing here touches the core error
//! taxonomy; failures are plain I/O errors.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::math::Point2;
use crate::pattern::{BendLine, FlatPattern};

/// Layer carrying cut geometry. Layer `0` always exists in a DXF file.
const OUTLINE_LAYER: &str = "0";

/// Layer carrying bend annotations.
const BEND_LAYER: &str = "BEND";

/// Writes `pattern` as a DXF R12 file at `path`.
///
/// # Errors
///
/// Returns any I/O error raised while creating or writing the file.
pub fn export_pattern(path: impl AsRef<Path>, pattern: &FlatPattern) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_pattern(&mut out, pattern)
}

/// Writes `pattern` as a DXF R12 document to any writer.
///
/// # Errors
///
/// Returns any I/O error raised by the underlying writer.
pub fn write_pattern(out: &mut impl Write, pattern: &FlatPattern) -> std::io::Result<()> {
    write_header(out)?;

    writeln!(out, "0")?;
    writeln!(out, "SECTION")?;
    writeln!(out, "2")?;
    writeln!(out, "ENTITIES")?;

    for outline in pattern.outlines() {
        write_ring(out, &outline.outer)?;
        for hole in &outline.holes {
            write_ring(out, hole)?;
        }
    }
    for line in pattern.bend_lines() {
        write_bend_line(out, line)?;
    }

    writeln!(out, "0")?;
    writeln!(out, "ENDSEC")?;

    writeln!(out, "0")?;
    writeln!(out, "EOF")?;

    Ok(())
}

fn write_header(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "0")?;
    writeln!(out, "SECTION")?;
    writeln!(out, "2")?;
    writeln!(out, "HEADER")?;

    writeln!(out, "9")?;
    writeln!(out, "$ACADVER")?;
    writeln!(out, "1")?;
    writeln!(out, "AC1009")?; // DXF R12

    writeln!(out, "9")?;
    writeln!(out, "$INSUNITS")?;
    writeln!(out, "70")?;
    writeln!(out, "4")?; // Millimeters

    writeln!(out, "0")?;
    writeln!(out, "ENDSEC")?;

    Ok(())
}

/// One closed lightweight polyline on the cut layer.
fn write_ring(out: &mut impl Write, ring: &[Point2]) -> std::io::Result<()> {
    if ring.is_empty() {
        return Ok(());
    }

    writeln!(out, "0")?;
    writeln!(out, "LWPOLYLINE")?;
    writeln!(out, "8")?;
    writeln!(out, "{OUTLINE_LAYER}")?;
    writeln!(out, "90")?;
    writeln!(out, "{}", ring.len())?;
    writeln!(out, "70")?;
    writeln!(out, "1")?; // Closed

    for point in ring {
        writeln!(out, "10")?;
        writeln!(out, "{:.6}", point.x)?;
        writeln!(out, "20")?;
        writeln!(out, "{:.6}", point.y)?;
    }

    Ok(())
}

fn write_bend_line(out: &mut impl Write, line: &BendLine) -> std::io::Result<()> {
    writeln!(out, "0")?;
    writeln!(out, "LINE")?;
    writeln!(out, "8")?;
    writeln!(out, "{BEND_LAYER}")?;
    writeln!(out, "10")?;
    writeln!(out, "{:.6}", line.start.x)?;
    writeln!(out, "20")?;
    writeln!(out, "{:.6}", line.start.y)?;
    writeln!(out, "11")?;
    writeln!(out, "{:.6}", line.end.x)?;
    writeln!(out, "21")?;
    writeln!(out, "{:.6}", line.end.y)?;

    Ok(())
}
