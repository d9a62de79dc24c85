use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Possible `libiconsplit` errors
///
/// Any of these aborts an extraction run. Icon files written before the error stay on disk.
pub enum Error {
    /// The input file could not be read
    #[error("unable to read input file {path:?}")]
    InputRead {
        /// input path
        path: PathBuf,
        /// underlying i/o error
        #[source]
        source: io::Error,
    },

    /// The file is too small to contain the fixed file and DIB header fields
    #[error("file is too small to contain the required headers. file: {len} bytes, required: {required} bytes")]
    TruncatedHeader {
        /// file length in bytes
        len: usize,
        /// minimum length of the fixed header region
        required: usize,
    },

    /// The file does not start with the `BM` identifier
    #[error("expected identifier 'BM' (0x424D) as first two bytes of file, got {found:02X?}")]
    UnsupportedFormat {
        /// the first two bytes of the file
        found: [u8; 2],
    },

    /// The size declared in the file header disagrees with the actual file length
    #[error("size declared within file ({declared} bytes) differs from actual file size ({actual} bytes)")]
    SizeMismatch {
        /// size field of the file header
        declared: u32,
        /// actual byte length
        actual: usize,
    },

    /// The pixel data offset points at or past the end of the file
    #[error("pixel data offset {offset} is not inside the file ({file_size} bytes)")]
    InvalidOffset {
        /// pixel data offset field
        offset: u32,
        /// actual byte length
        file_size: usize,
    },

    /// The header describes a bitmap other than an uncompressed, single-plane, 1 bit-per-pixel
    /// image with a two color palette
    #[error("unsupported bitmap variant: {0}")]
    UnsupportedVariant(Variant),

    /// The declared pixel data runs past the end of the file
    #[error("pixel data is calculated to overshoot the end of the file. end of pixel data: {end}, file size: {file_size}")]
    TruncatedPixelData {
        /// `offset + length` of the pixel data
        end: u64,
        /// actual byte length
        file_size: usize,
    },

    /// Fewer than the two color table entries could be read
    #[error("unable to read the color table at offset {offset}: {available} of {required} bytes available")]
    ColorTableReadShortfall {
        /// offset of the color table within the file
        offset: usize,
        /// bytes available before the pixel data
        available: usize,
        /// bytes required for two entries
        required: usize,
    },

    /// A raster row could not be read in full
    #[error("unable to read sufficient bytes for image row {row}: expected {expected}, got {available}")]
    RowReadShortfall {
        /// image row (counting from the top)
        row: u32,
        /// unpadded row length in bytes
        expected: usize,
        /// bytes available for the row
        available: usize,
    },

    /// The raster contains no row with ink on it
    #[error("no icon rows found in bitmap image")]
    NoIconsFound,

    /// The derived output bitmap cannot be described by the 32 bit header fields
    #[error("output canvas {width}x{height} is too large to encode")]
    CanvasTooLarge {
        /// canvas width in pixels
        width: u64,
        /// canvas height in pixels
        height: u64,
    },

    /// An output file could not be created
    #[error("failed to create icon file {path:?}")]
    OutputCreateFailed {
        /// output path
        path: PathBuf,
        /// underlying i/o error
        #[source]
        source: io::Error,
    },

    /// Writing to an output file failed part way
    #[error("failed to write icon file {path:?}")]
    OutputWriteFailed {
        /// output path
        path: PathBuf,
        /// underlying i/o error
        #[source]
        source: io::Error,
    },

    /// The written file size differs from the size declared in its header
    #[error("size calculated for {path:?} ({expected} bytes) differs from its actual size ({actual} bytes)")]
    WritePartial {
        /// output path
        path: PathBuf,
        /// file size declared in the derived header
        expected: u64,
        /// bytes on disk after writing
        actual: u64,
    },
}

/// The header conditions reported through [`Error::UnsupportedVariant`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Variant {
    /// DIB header must be at least 40 bytes long
    DibHeaderLength(u32),
    /// Number of color planes must be 1
    ColorPlanes(u16),
    /// Number of bits per pixel must be 1
    BitsPerPixel(u16),
    /// Compression method must be 0 (uncompressed)
    Compression(u32),
    /// Number of colors in the palette must be 2
    PaletteColors(u32),
    /// Both color table entries hold the same color
    IndistinctPalette(u32),
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DibHeaderLength(n) => {
                write!(f, "DIB header must be at least 40 bytes long, got {n}")
            }
            Self::ColorPlanes(n) => write!(f, "number of color planes must be 1, got {n}"),
            Self::BitsPerPixel(n) => write!(f, "number of bits per pixel must be 1, got {n}"),
            Self::Compression(n) => match n {
                1..=6 | 11..=13 => write!(f, "image data must not be compressed, compression method is {n}"),
                _ => write!(f, "compression method is not recognised, value is {n}"),
            },
            Self::PaletteColors(n) => {
                write!(f, "number of colors in the palette must be 2, got {n}")
            }
            Self::IndistinctPalette(c) => {
                write!(f, "both color table entries are {c:#010X}")
            }
        }
    }
}
