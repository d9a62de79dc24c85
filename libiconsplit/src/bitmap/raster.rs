/// Unpadded length of one 1 bit-per-pixel row in bytes
#[must_use]
pub const fn row_bytes(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Length of one row on disk, padded to a multiple of 4 bytes
#[must_use]
pub const fn padded_row_bytes(width: u32) -> usize {
    row_bytes(width).next_multiple_of(4)
}

/// A 1 bit-per-pixel raster, top row first, without row padding
///
/// Bit 7 of the first byte in a row is the leftmost pixel. A set bit is background, a clear
/// bit is ink. Bits past `width` in the last byte of a row are always set.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    bits: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a raster where every pixel is background
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        let stride = row_bytes(width);
        Self {
            width,
            height,
            stride,
            bits: vec![0xFF; stride * height as usize],
        }
    }

    /// Wraps already unpadded rows, forcing the trailing bits of every row to background
    pub(crate) fn from_rows(width: u32, height: u32, bits: Vec<u8>) -> Self {
        let stride = row_bytes(width);
        debug_assert_eq!(stride * height as usize, bits.len());
        let mut buffer = Self {
            width,
            height,
            stride,
            bits,
        };
        buffer.mask_row_padding();
        buffer
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The packed rows
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Index of the byte holding pixel `(x, y)`
    pub(crate) const fn byte_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + (x as usize >> 3)
    }

    /// Returns `Some(true)` for ink, `Some(false)` for background and `None` outside the raster
    #[must_use]
    pub fn is_ink(&self, x: u32, y: u32) -> Option<bool> {
        if x < self.width && y < self.height {
            let mask = 0x80 >> (x & 7);
            Some(self.bits[self.byte_index(x, y)] & mask == 0)
        } else {
            None
        }
    }

    /// Sets pixel `(x, y)` to ink or background. Out of range coordinates are ignored.
    pub fn set_ink(&mut self, x: u32, y: u32, ink: bool) {
        if x < self.width && y < self.height {
            let mask = 0x80 >> (x & 7);
            let i = self.byte_index(x, y);
            if ink {
                self.bits[i] &= !mask;
            } else {
                self.bits[i] |= mask;
            }
        }
    }

    /// get an entire row of the raster
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y < self.height {
            let start = y as usize * self.stride;
            Some(&self.bits[start..start + self.stride])
        } else {
            None
        }
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bits
    }

    /// Whether any pixel of row `y` is ink
    #[must_use]
    pub fn row_has_ink(&self, y: u32) -> bool {
        // padding bits are always background, so whole bytes can be compared
        self.row(y)
            .is_some_and(|row| row.iter().any(|&byte| byte != 0xFF))
    }

    /// Whether any pixel of column `x` is ink
    #[must_use]
    pub fn column_has_ink(&self, x: u32) -> bool {
        (0..self.height).any(|y| self.is_ink(x, y) == Some(true))
    }

    /// Complements every bit, then restores the background padding bits
    pub(crate) fn invert(&mut self) {
        for byte in &mut self.bits {
            *byte = !*byte;
        }
        self.mask_row_padding();
    }

    fn mask_row_padding(&mut self) {
        let used = self.width % 8;
        if used == 0 || self.stride == 0 {
            return;
        }
        let mask = 0xFF_u8 >> used;
        for row in self.bits.chunks_exact_mut(self.stride) {
            if let Some(last) = row.last_mut() {
                *last |= mask;
            }
        }
    }
}
