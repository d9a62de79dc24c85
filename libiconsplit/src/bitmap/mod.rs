#![allow(clippy::module_name_repetitions)]

pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod header;
pub(crate) mod raster;

/// Module containing the raw header types
///
/// These types mirror the on-disk layout of the file and DIB headers
pub mod raw {
    /// Contains types related to the bitmap file and DIB headers
    pub mod header {
        pub use crate::bitmap::header::{
            ColorTable, ContainerHeader, Field, Polarity, BMP_MAGIC, COLOR_TABLE_LEN,
            FIXED_HEADER_LEN,
        };
    }
}

use crate::error::Error;
use decode::read_raster;
use header::{ColorTable, ContainerHeader};
use raster::PixelBuffer;
use std::{fs, io::Read, path::Path};
use tracing::{debug, info};

/// A decoded monochrome icon sheet
///
/// Holds the validated headers, the color table and the polarity-normalized raster in which
/// 0 is always ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSheet {
    header: ContainerHeader,
    palette: ColorTable,
    pixels: PixelBuffer,
}

impl IconSheet {
    /// Decodes a complete file held in memory
    ///
    /// # Errors
    ///
    /// Validation runs eagerly: header fields first (see [`ContainerHeader::parse`]), then the
    /// color table, then each raster row.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let header = ContainerHeader::parse(bytes)?;
        let palette = ColorTable::read(bytes, &header)?;
        let pixels = read_raster(bytes, &header, &palette)?;
        debug!(
            "decoded {}x{} raster, {} bytes",
            pixels.width(),
            pixels.height(),
            pixels.as_bytes().len()
        );
        Ok(Self {
            header,
            palette,
            pixels,
        })
    }

    /// Tries to read [`Self`] from a reader
    ///
    /// # Errors
    ///
    /// See [`Self::from_bytes`]. Read failures are reported as [`Error::InputRead`].
    pub fn from_reader(mut r: impl Read) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)
            .map_err(|source| Error::InputRead {
                path: "<reader>".into(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    /// Tries to read [`Self`] from a provided file path
    ///
    /// The file is read in full and closed before decoding starts.
    ///
    /// # Errors
    ///
    /// This function will error if the file cannot be read or if it contains invalid data.
    /// See [`Self::from_bytes`] for potential errors
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let path = filename.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::InputRead {
            path: path.to_owned(),
            source,
        })?;
        info!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    /// Returns a reference to the [`ContainerHeader`]
    #[must_use]
    pub const fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Returns a reference to the [`ColorTable`]
    #[must_use]
    pub const fn palette(&self) -> &ColorTable {
        &self.palette
    }

    /// Returns the normalized raster
    #[must_use]
    pub const fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Returns the image width
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.header.width()
    }

    /// Returns the image height
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.header.height()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::raster::padded_row_bytes;

    /// Builds a 1 bit-per-pixel file with a 40 byte DIB header. `rows` lists ink pixels from
    /// the top; the on-disk bits follow the polarity of `palette`.
    pub(crate) fn sample_container(rows: &[&[bool]], palette: [u32; 2]) -> Vec<u8> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let padded = padded_row_bytes(width as u32);
        let data_len = padded * height;
        let offset = 62;
        let ink_bit = u8::from(palette[0] > palette[1]);

        let mut out = Vec::with_capacity(offset + data_len);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&((offset + data_len) as u32).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&(width as u32).to_le_bytes());
        out.extend_from_slice(&(height as u32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(data_len as u32).to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&palette[0].to_le_bytes());
        out.extend_from_slice(&palette[1].to_le_bytes());

        for row in rows.iter().rev() {
            let mut disk = vec![0u8; padded];
            for (x, &ink) in row.iter().enumerate() {
                let bit = if ink { ink_bit } else { 1 - ink_bit };
                disk[x / 8] |= bit << (7 - x % 8);
            }
            out.extend_from_slice(&disk);
        }
        out
    }
}
