use tracing::{debug, instrument};

use super::{
    header::{ColorTable, ContainerHeader, Polarity},
    raster::{padded_row_bytes, row_bytes, PixelBuffer},
};
use crate::Error;

/// Start of the on-disk row holding image row `row`, counting from the top
fn disk_row_start(header: &ContainerHeader, row: u32) -> Option<usize> {
    let from_bottom = (header.height() - 1 - row) as usize;
    padded_row_bytes(header.width())
        .checked_mul(from_bottom)?
        .checked_add(header.pixel_data_offset() as usize)
}

/// Rebuilds the unpadded, top-to-bottom raster from the bottom-to-top rows on disk
///
/// Rows are read from image row 0 downwards, trailing disk padding is dropped and, for an
/// inverted color table, every bit is complemented so that ink is always 0.
///
/// # Errors
///
/// Returns [`Error::RowReadShortfall`] for the first row that extends past the end of the file.
#[instrument(skip_all, level = "debug")]
pub fn read_raster(
    bytes: &[u8],
    header: &ContainerHeader,
    palette: &ColorTable,
) -> Result<PixelBuffer, Error> {
    let (width, height) = (header.width(), header.height());
    let expected = row_bytes(width);
    debug!(
        "{expected} bytes per image row, {} bytes per row on disk",
        padded_row_bytes(width)
    );

    let mut rows = Vec::new();
    for row in 0..height {
        let start = disk_row_start(header, row);
        let Some(src) = start.and_then(|start| bytes.get(start..start.checked_add(expected)?))
        else {
            let available = start
                .and_then(|start| bytes.get(start..))
                .map_or(0, |rest| rest.len().min(expected));
            return Err(Error::RowReadShortfall {
                row,
                expected,
                available,
            });
        };
        rows.extend_from_slice(src);
    }

    let mut raster = PixelBuffer::from_rows(width, height, rows);
    if palette.polarity() == Polarity::Inverted {
        debug!("index 0 maps to the lighter color, inverting raster");
        raster.invert();
    }
    Ok(raster)
}
