use bon::Builder;
use tracing::trace;

use crate::{bitmap::raster::PixelBuffer, grid::IconRegion, Error};

/// How each extracted icon is laid out on its own canvas
///
/// ```rust
/// use libiconsplit::OutputSpec;
///
/// let spec = OutputSpec::builder()
///     .add_margins(true)
///     .horizontal_margin(2)
///     .vertical_margin(1)
///     .normalize_to_max_size(true)
///     .build();
/// assert_eq!(spec.margins(), (2, 1));
/// ```
#[derive(Builder, Default, Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub struct OutputSpec {
    /// Whether the margins below are applied at all
    #[builder(default)]
    pub add_margins: bool,
    /// Background columns added on the left and on the right
    #[builder(default)]
    pub horizontal_margin: u32,
    /// Background rows added above and below
    #[builder(default)]
    pub vertical_margin: u32,
    /// Give every icon the size of the largest one, centering the smaller icons
    #[builder(default)]
    pub normalize_to_max_size: bool,
}

impl OutputSpec {
    /// The effective `(horizontal, vertical)` margins
    #[must_use]
    pub const fn margins(&self) -> (u32, u32) {
        if self.add_margins {
            (self.horizontal_margin, self.vertical_margin)
        } else {
            (0, 0)
        }
    }
}

/// Canvas size and the position of the icon on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// canvas width in pixels
    pub width: u32,
    /// canvas height in pixels
    pub height: u32,
    /// background rows above the icon
    pub top: u32,
    /// background columns left of the icon
    pub left: u32,
}

/// Returns `(canvas length, padding before the icon)` along one axis. Whitespace beyond the
/// margin is split with the larger half before the icon.
fn axis_layout(margin: u32, base: u32, size: u32) -> Option<(u32, u32)> {
    let extra = base.saturating_sub(size);
    let canvas = margin.checked_mul(2)?.checked_add(base.max(size))?;
    Some((canvas, margin + extra.div_ceil(2)))
}

/// Works out the canvas for `region`
///
/// # Errors
///
/// Returns [`Error::CanvasTooLarge`] if the canvas size overflows.
pub fn placement(
    region: &IconRegion,
    spec: &OutputSpec,
    max_width: u32,
    max_height: u32,
) -> Result<Placement, Error> {
    let (h_margin, v_margin) = spec.margins();
    let (base_width, base_height) = if spec.normalize_to_max_size {
        (max_width, max_height)
    } else {
        (region.width(), region.height())
    };
    let too_large = Error::CanvasTooLarge {
        width: u64::from(base_width) + 2 * u64::from(h_margin),
        height: u64::from(base_height) + 2 * u64::from(v_margin),
    };
    let Some((width, left)) = axis_layout(h_margin, base_width, region.width()) else {
        return Err(too_large);
    };
    let Some((height, top)) = axis_layout(v_margin, base_height, region.height()) else {
        return Err(too_large);
    };
    Ok(Placement {
        width,
        height,
        top,
        left,
    })
}

/// Builds the output raster for one icon: a background canvas sized by `spec` with the
/// region's pixels copied in bit-exactly
///
/// # Errors
///
/// Returns [`Error::CanvasTooLarge`] if the canvas size overflows.
pub fn compose(
    source: &PixelBuffer,
    region: &IconRegion,
    spec: &OutputSpec,
    max_width: u32,
    max_height: u32,
) -> Result<PixelBuffer, Error> {
    let place = placement(region, spec, max_width, max_height)?;
    trace!(?place, "canvas for {region:?}");
    let mut canvas = PixelBuffer::blank(place.width, place.height);
    blit(source, region, &mut canvas, place.top, place.left);
    Ok(canvas)
}

/// Copies the `region` rectangle of `src` into `dst` with its top left corner at
/// `(left, top)`
///
/// Each step moves the largest run of bits that stays inside the current source byte, the
/// current destination byte and the row. The source and destination cursors advance
/// independently, each once its byte is used up.
fn blit(src: &PixelBuffer, region: &IconRegion, dst: &mut PixelBuffer, top: u32, left: u32) {
    let end = left + region.width();
    for row in 0..region.height() {
        let (mut src_col, mut dst_col) = (region.left, left);
        let mut src_byte = src.byte_index(src_col, region.top + row);
        let mut dst_byte = dst.byte_index(dst_col, top + row);

        while dst_col < end {
            let src_bit = src_col % 8;
            let dst_bit = dst_col % 8;
            let src_left = 8 - src_bit;
            let dst_left = 8 - dst_bit;
            let n = src_left.min(dst_left).min(end - dst_col);

            let run = 0xFF_u8 >> (8 - n);
            let chunk = src.as_bytes()[src_byte] & (run << (src_left - n));
            let chunk = if dst_bit >= src_bit {
                chunk >> (dst_bit - src_bit)
            } else {
                chunk << (src_bit - dst_bit)
            };
            // the canvas starts as background, clear the run before merging
            let dst_mask = run << (dst_left - n);
            let out = &mut dst.bytes_mut()[dst_byte];
            *out = (*out & !dst_mask) | chunk;

            if n == src_left {
                src_byte += 1;
            }
            if n == dst_left {
                dst_byte += 1;
            }
            src_col += n;
            dst_col += n;
        }
    }
}
