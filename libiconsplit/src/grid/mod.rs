pub(crate) mod band;
pub(crate) mod region;

use itertools::iproduct;
use tracing::{debug, info, instrument, warn};

pub use band::{find_bands, Band};
pub use region::{cell_extent, IconRegion};

use crate::{bitmap::raster::PixelBuffer, Error};

/// The icon grid discovered in a raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    row_bands: Vec<Band>,
    col_bands: Vec<Band>,
    regions: Vec<IconRegion>,
    empty_cells: Vec<(Band, Band)>,
}

impl Grid {
    /// Locates every icon: coarse row and column bands first, then the tight extent of the ink
    /// inside each band intersection
    ///
    /// Regions are ordered top-to-bottom, then left-to-right. Cells without ink are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoIconsFound`] if no row of the raster contains ink.
    #[instrument(skip_all, level = "debug")]
    pub fn segment(pixels: &PixelBuffer) -> Result<Self, Error> {
        let row_bands = find_bands((0..pixels.height()).map(|y| pixels.row_has_ink(y)));
        if row_bands.is_empty() {
            return Err(Error::NoIconsFound);
        }
        let col_bands = find_bands((0..pixels.width()).map(|x| pixels.column_has_ink(x)));
        info!(
            "{} rows and {} columns of icons detected",
            row_bands.len(),
            col_bands.len()
        );

        let mut regions = Vec::with_capacity(row_bands.len() * col_bands.len());
        let mut empty_cells = Vec::new();
        for (&rows, &cols) in iproduct!(&row_bands, &col_bands) {
            match cell_extent(pixels, rows, cols) {
                Some(region) => {
                    debug!(?region, "icon found");
                    regions.push(region);
                }
                None => {
                    warn!(
                        top = rows.start,
                        bottom = rows.end,
                        left = cols.start,
                        right = cols.end,
                        "unable to find any pixels within grid cell"
                    );
                    empty_cells.push((rows, cols));
                }
            }
        }

        let grid = Self {
            row_bands,
            col_bands,
            regions,
            empty_cells,
        };
        if let (Some((min_w, min_h)), Some((max_w, max_h))) = (grid.min_size(), grid.max_size()) {
            debug!("icon sizes range from {min_w}x{min_h} to {max_w}x{max_h}");
        }
        Ok(grid)
    }

    /// Row bands, top to bottom
    #[must_use]
    pub fn row_bands(&self) -> &[Band] {
        &self.row_bands
    }

    /// Column bands, left to right
    #[must_use]
    pub fn col_bands(&self) -> &[Band] {
        &self.col_bands
    }

    /// Icon regions in output order
    #[must_use]
    pub fn regions(&self) -> &[IconRegion] {
        &self.regions
    }

    /// Grid cells that held no ink, as `(row band, column band)`
    #[must_use]
    pub fn empty_cells(&self) -> &[(Band, Band)] {
        &self.empty_cells
    }

    /// Largest region width and largest region height, measured independently
    #[must_use]
    pub fn max_size(&self) -> Option<(u32, u32)> {
        let width = self.regions.iter().map(IconRegion::width).max()?;
        let height = self.regions.iter().map(IconRegion::height).max()?;
        Some((width, height))
    }

    /// Smallest region width and smallest region height, measured independently
    #[must_use]
    pub fn min_size(&self) -> Option<(u32, u32)> {
        let width = self.regions.iter().map(IconRegion::width).min()?;
        let height = self.regions.iter().map(IconRegion::height).min()?;
        Some((width, height))
    }
}
