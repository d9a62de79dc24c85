use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::{
    bitmap::{
        encode::{encode_to_vec, write_file},
        header::ContainerHeader,
        raster::{padded_row_bytes, PixelBuffer},
        IconSheet,
    },
    compose::{compose, OutputSpec},
    grid::{Grid, IconRegion},
    Error,
};

/// One extracted icon, ready to be written as its own bitmap file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    region: IconRegion,
    header: ContainerHeader,
    pixels: PixelBuffer,
}

impl Icon {
    /// Where the icon was found in the sheet
    #[must_use]
    pub const fn region(&self) -> &IconRegion {
        &self.region
    }

    /// The derived header of the icon file
    #[must_use]
    pub const fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// The icon canvas, margins included
    #[must_use]
    pub const fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Encodes the complete icon file
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_to_vec(&self.header, &self.pixels)
    }

    /// Writes the icon file to `path`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or written, or if its size on disk differs from
    /// the size declared in its header.
    pub fn write_to(&self, path: &Path) -> Result<(), Error> {
        write_file(path, &self.header, &self.pixels)
    }
}

/// Zero padded file name for icon `index`, padded to the digit count of `count`
///
/// ```rust
/// use libiconsplit::icon_file_name;
///
/// assert_eq!(icon_file_name(2, 3), "2.bmp");
/// assert_eq!(icon_file_name(7, 12), "07.bmp");
/// ```
#[must_use]
pub fn icon_file_name(index: usize, count: usize) -> String {
    let digits = count.to_string().len();
    format!("{index:0digits$}.bmp")
}

impl IconSheet {
    /// Segments the sheet into icon regions
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoIconsFound`] if the raster contains no ink.
    pub fn grid(&self) -> Result<Grid, Error> {
        Grid::segment(self.pixels())
    }

    /// Composes one icon and derives the header for its file
    ///
    /// `max_size` is the largest `(width, height)` across all regions, used when `spec`
    /// normalizes sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CanvasTooLarge`] if the canvas or file size overflows.
    pub fn icon(
        &self,
        region: &IconRegion,
        spec: &OutputSpec,
        max_size: (u32, u32),
    ) -> Result<Icon, Error> {
        let pixels = compose(self.pixels(), region, spec, max_size.0, max_size.1)?;
        let too_large = || Error::CanvasTooLarge {
            width: u64::from(pixels.width()),
            height: u64::from(pixels.height()),
        };
        let data_len = padded_row_bytes(pixels.width())
            .checked_mul(pixels.height() as usize)
            .and_then(|len| u32::try_from(len).ok())
            .ok_or_else(too_large)?;
        let header =
            self.header()
                .derive_for_output(self.palette(), pixels.width(), pixels.height(), data_len)?;
        debug!(
            "icon {}x{} on {}x{} canvas, {} bytes of pixel data",
            region.width(),
            region.height(),
            pixels.width(),
            pixels.height(),
            data_len
        );
        Ok(Icon {
            region: *region,
            header,
            pixels,
        })
    }

    /// Composes every icon of `grid`, in grid order
    pub fn icons<'a>(
        &'a self,
        grid: &'a Grid,
        spec: &'a OutputSpec,
    ) -> impl Iterator<Item = Result<Icon, Error>> + 'a {
        let max_size = grid.max_size().unwrap_or_default();
        grid.regions()
            .iter()
            .map(move |region| self.icon(region, spec, max_size))
    }
}

/// Splits the icon sheet at `input` into numbered bitmap files in `output_dir`
///
/// Icons are written in grid order and numbered from zero. The run stops at the first error;
/// files written before it are left in place.
///
/// # Errors
///
/// Any decode, segmentation or write error, see [`Error`].
#[instrument(skip(spec))]
pub fn extract_icons(
    input: &Path,
    output_dir: &Path,
    spec: &OutputSpec,
) -> Result<Vec<PathBuf>, Error> {
    let sheet = IconSheet::from_file(input)?;
    let grid = sheet.grid()?;
    let count = grid.regions().len();
    info!("extracting {count} icons to {}", output_dir.display());

    let mut written = Vec::with_capacity(count);
    for (index, icon) in sheet.icons(&grid, spec).enumerate() {
        let icon = icon?;
        let path = output_dir.join(icon_file_name(index, count));
        icon.write_to(&path)?;
        info!("successfully created icon file {}", path.display());
        written.push(path);
    }
    Ok(written)
}
