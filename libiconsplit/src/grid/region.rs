use super::band::Band;
use crate::bitmap::raster::PixelBuffer;

/// The tight bounding box of one icon, inclusive pixel coordinates into the source raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconRegion {
    /// first row with ink
    pub top: u32,
    /// last row with ink
    pub bottom: u32,
    /// first column with ink
    pub left: u32,
    /// last column with ink
    pub right: u32,
}

impl IconRegion {
    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }
}

/// Finds the ink extents inside one grid cell, or `None` if the cell holds no ink
pub fn cell_extent(pixels: &PixelBuffer, rows: Band, cols: Band) -> Option<IconRegion> {
    let ink_in_row = |y: u32| cols.indexes().any(|x| pixels.is_ink(x, y) == Some(true));
    let ink_in_col = |x: u32| rows.indexes().any(|y| pixels.is_ink(x, y) == Some(true));

    let top = rows.indexes().find(|&y| ink_in_row(y))?;
    let bottom = rows.indexes().rev().find(|&y| ink_in_row(y))?;
    let left = cols.indexes().find(|&x| ink_in_col(x))?;
    let right = cols.indexes().rev().find(|&x| ink_in_col(x))?;
    Some(IconRegion {
        top,
        bottom,
        left,
        right,
    })
}
