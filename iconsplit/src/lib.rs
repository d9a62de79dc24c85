use std::{io::Write, path::Path};

use anyhow::{ensure, Context, Result};
use libiconsplit::{extract_icons, IconSheet, OutputSpec};
use tracing::{debug, info, instrument};

#[instrument(skip(spec))]
pub fn extract(input: &Path, output_dir: &Path, spec: &OutputSpec) -> Result<()> {
    ensure!(input.is_file(), "{} is not a file", input.display());
    ensure!(
        output_dir.is_dir(),
        "{} is not a directory",
        output_dir.display()
    );
    debug!(?spec, "output layout");

    let written = extract_icons(input, output_dir, spec)
        .with_context(|| format!("Failed to split {}", input.display()))?;
    info!(
        "Successfully wrote {} icons to {}",
        written.len(),
        output_dir.display()
    );
    Ok(())
}

/// Writes a report of the header fields, color table and icon grid of `input` to `out`
#[instrument(skip(out))]
pub fn describe(input: &Path, out: &mut impl Write) -> Result<()> {
    ensure!(input.is_file(), "{} is not a file", input.display());
    let sheet = IconSheet::from_file(input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    writeln!(out, "{}", input.display())?;
    for (field, value) in sheet.header().fields() {
        writeln!(out, "  {:<24}{value}", field.as_str())?;
    }
    let [first, second] = sheet.palette().entries();
    writeln!(
        out,
        "  {:<24}[{first:#010X}, {second:#010X}] {:?}",
        "color_table",
        sheet.palette().polarity()
    )?;

    let grid = sheet.grid()?;
    writeln!(
        out,
        "{} row bands, {} column bands, {} icons, {} empty cells",
        grid.row_bands().len(),
        grid.col_bands().len(),
        grid.regions().len(),
        grid.empty_cells().len()
    )?;
    if let (Some((min_w, min_h)), Some((max_w, max_h))) = (grid.min_size(), grid.max_size()) {
        writeln!(out, "icon sizes {min_w}x{min_h} to {max_w}x{max_h}")?;
    }
    for (index, region) in grid.regions().iter().enumerate() {
        writeln!(
            out,
            "  {index:>4}: rows {}..={}, columns {}..={} ({}x{})",
            region.top,
            region.bottom,
            region.left,
            region.right,
            region.width(),
            region.height()
        )?;
    }
    Ok(())
}
