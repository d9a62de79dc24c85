use nom::{
    combinator::map,
    number::complete::{le_u16, le_u32},
    sequence::pair,
    IResult,
};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, trace};

use crate::error::{Error, Variant};

/// Length of the bitmap file header that precedes the DIB header
pub const FILE_HEADER_LEN: usize = 14;

/// Bytes needed to hold every fixed-offset field of the file and DIB headers
pub const FIXED_HEADER_LEN: usize = 54;

/// `"BM"`, read as a little endian `u16`
pub const BMP_MAGIC: u16 = 0x4D42;

/// Smallest DIB header holding every fixed field (`BITMAPINFOHEADER`)
pub const MIN_DIB_HEADER_LEN: u32 = 40;

/// Two color table entries of four bytes each
pub const COLOR_TABLE_LEN: usize = 8;

/// A fixed-offset little endian field of the file and DIB headers
///
/// Every field is located by [`Field::offset`] and is either 2 or 4 bytes wide
/// ([`Field::len`]). Reading and patching headers goes through this table only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    /// File identifier, `BM`
    FileId,
    /// File size in bytes
    FileSize,
    /// Offset of the pixel data
    PixelDataOffset,
    /// Length of the DIB header
    DibHeaderLength,
    /// Image width in pixels
    Width,
    /// Image height in pixels
    Height,
    /// Number of color planes
    ColorPlanes,
    /// Bits per pixel
    BitsPerPixel,
    /// Compression method
    Compression,
    /// Length of the pixel data
    PixelDataLength,
    /// Horizontal resolution, pixels per metre
    HorizontalResolution,
    /// Vertical resolution, pixels per metre
    VerticalResolution,
    /// Number of colors in the palette
    PaletteColors,
    /// Number of important colors
    ImportantColors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldWidth {
    Word,
    DWord,
}

impl Field {
    const fn descriptor(self) -> (usize, FieldWidth) {
        match self {
            Self::FileId => (0, FieldWidth::Word),
            Self::FileSize => (2, FieldWidth::DWord),
            Self::PixelDataOffset => (10, FieldWidth::DWord),
            Self::DibHeaderLength => (14, FieldWidth::DWord),
            Self::Width => (18, FieldWidth::DWord),
            Self::Height => (22, FieldWidth::DWord),
            Self::ColorPlanes => (26, FieldWidth::Word),
            Self::BitsPerPixel => (28, FieldWidth::Word),
            Self::Compression => (30, FieldWidth::DWord),
            Self::PixelDataLength => (34, FieldWidth::DWord),
            Self::HorizontalResolution => (38, FieldWidth::DWord),
            Self::VerticalResolution => (42, FieldWidth::DWord),
            Self::PaletteColors => (46, FieldWidth::DWord),
            Self::ImportantColors => (50, FieldWidth::DWord),
        }
    }

    /// Byte offset of the field within the file
    #[must_use]
    pub const fn offset(self) -> usize {
        self.descriptor().0
    }

    /// Width of the field in bytes
    #[must_use]
    pub const fn len(self) -> usize {
        match self.descriptor().1 {
            FieldWidth::Word => 2,
            FieldWidth::DWord => 4,
        }
    }

    /// Name of the field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Reads one field from the start of a file
fn read_field(bytes: &[u8], field: Field) -> Result<u32, Error> {
    let input = bytes.get(field.offset()..).unwrap_or_default();
    let parsed: IResult<&[u8], u32> = match field.descriptor().1 {
        FieldWidth::Word => map(le_u16, u32::from)(input),
        FieldWidth::DWord => le_u32(input),
    };
    parsed
        .map(|(_, value)| value)
        .map_err(|_| Error::TruncatedHeader {
            len: bytes.len(),
            required: FIXED_HEADER_LEN,
        })
}

/// Overwrites one field in place. Values wider than a 2 byte field are truncated and fields
/// past the end of `bytes` are left alone.
fn write_field(bytes: &mut [u8], field: Field, value: u32) {
    let start = field.offset();
    let le = value.to_le_bytes();
    if let Some(dst) = bytes.get_mut(start..start + field.len()) {
        dst.copy_from_slice(&le[..field.len()]);
    }
}

/// The file and DIB headers of a 1 bit-per-pixel bitmap
///
/// Besides the decoded fields, the header keeps every byte of the file up to the pixel data
/// (DIB header, optional bitmasks, color table) so derived headers reproduce them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    file_id: u16,
    file_size: u32,
    pixel_data_offset: u32,
    dib_header_length: u32,
    width: u32,
    height: u32,
    color_planes: u16,
    bits_per_pixel: u16,
    compression: u32,
    pixel_data_length: u32,
    horizontal_resolution: u32,
    vertical_resolution: u32,
    palette_colors: u32,
    important_colors: u32,
    preamble: Vec<u8>,
}

impl ContainerHeader {
    /// Parses and validates the headers of an entire file
    ///
    /// # Errors
    ///
    /// Checks run in this order and stop at the first failure:
    /// - [`Error::TruncatedHeader`] if the file cannot hold the fixed header fields
    /// - [`Error::UnsupportedFormat`] if the file does not start with `BM`
    /// - [`Error::SizeMismatch`] if the declared size is not the file length
    /// - [`Error::InvalidOffset`] if the pixel data offset is not inside the file or leaves no
    ///   room for the fixed headers and the color table
    /// - [`Error::UnsupportedVariant`] for DIB header length, planes, bit depth, compression or
    ///   palette size
    /// - [`Error::TruncatedPixelData`] if the declared pixel data runs past the end of the file
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < FIXED_HEADER_LEN {
            return Err(Error::TruncatedHeader {
                len: bytes.len(),
                required: FIXED_HEADER_LEN,
            });
        }
        let field = |f: Field| read_field(bytes, f);

        let file_id = field(Field::FileId)? as u16;
        if file_id != BMP_MAGIC {
            return Err(Error::UnsupportedFormat {
                found: file_id.to_le_bytes(),
            });
        }

        let file_size = field(Field::FileSize)?;
        if usize::try_from(file_size).map_or(true, |size| size != bytes.len()) {
            return Err(Error::SizeMismatch {
                declared: file_size,
                actual: bytes.len(),
            });
        }

        let pixel_data_offset = field(Field::PixelDataOffset)?;
        let min_offset = (FIXED_HEADER_LEN + COLOR_TABLE_LEN) as u32;
        if pixel_data_offset >= file_size || pixel_data_offset < min_offset {
            return Err(Error::InvalidOffset {
                offset: pixel_data_offset,
                file_size: bytes.len(),
            });
        }

        let dib_header_length = field(Field::DibHeaderLength)?;
        if dib_header_length < MIN_DIB_HEADER_LEN {
            return Err(Error::UnsupportedVariant(Variant::DibHeaderLength(
                dib_header_length,
            )));
        }
        let color_planes = field(Field::ColorPlanes)? as u16;
        if color_planes != 1 {
            return Err(Error::UnsupportedVariant(Variant::ColorPlanes(color_planes)));
        }
        let bits_per_pixel = field(Field::BitsPerPixel)? as u16;
        if bits_per_pixel != 1 {
            return Err(Error::UnsupportedVariant(Variant::BitsPerPixel(
                bits_per_pixel,
            )));
        }
        let compression = field(Field::Compression)?;
        if compression != 0 {
            return Err(Error::UnsupportedVariant(Variant::Compression(compression)));
        }
        let palette_colors = field(Field::PaletteColors)?;
        if palette_colors != 2 {
            return Err(Error::UnsupportedVariant(Variant::PaletteColors(
                palette_colors,
            )));
        }

        let pixel_data_length = field(Field::PixelDataLength)?;
        let end = u64::from(pixel_data_offset) + u64::from(pixel_data_length);
        if end > u64::from(file_size) {
            return Err(Error::TruncatedPixelData {
                end,
                file_size: bytes.len(),
            });
        }

        let header = Self {
            file_id,
            file_size,
            pixel_data_offset,
            dib_header_length,
            width: field(Field::Width)?,
            height: field(Field::Height)?,
            color_planes,
            bits_per_pixel,
            compression,
            pixel_data_length,
            horizontal_resolution: field(Field::HorizontalResolution)?,
            vertical_resolution: field(Field::VerticalResolution)?,
            palette_colors,
            important_colors: field(Field::ImportantColors)?,
            preamble: bytes[..pixel_data_offset as usize].to_vec(),
        };
        debug!(
            width = header.width,
            height = header.height,
            dib_header_length = header.dib_header_length,
            pixel_data_offset = header.pixel_data_offset,
            pixel_data_length = header.pixel_data_length,
            "accepted bitmap header"
        );
        trace!(
            horizontal_resolution = header.horizontal_resolution,
            vertical_resolution = header.vertical_resolution,
            important_colors = header.important_colors,
            "remaining header fields"
        );
        Ok(header)
    }

    /// Builds the header of an output file
    ///
    /// The source bytes up to the pixel data are copied unchanged, then the file size,
    /// width, height and pixel data length fields are overwritten. If the source raster was
    /// stored with inverted polarity the two color table entries are swapped in the copy, so
    /// the output stores ink as bit 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CanvasTooLarge`] if the new file size does not fit in 32 bits.
    pub fn derive_for_output(
        &self,
        palette: &ColorTable,
        width: u32,
        height: u32,
        pixel_data_length: u32,
    ) -> Result<Self, Error> {
        let file_size = self
            .pixel_data_offset
            .checked_add(pixel_data_length)
            .ok_or(Error::CanvasTooLarge {
                width: u64::from(width),
                height: u64::from(height),
            })?;

        let mut preamble = self.preamble.clone();
        write_field(&mut preamble, Field::FileSize, file_size);
        write_field(&mut preamble, Field::Width, width);
        write_field(&mut preamble, Field::Height, height);
        write_field(&mut preamble, Field::PixelDataLength, pixel_data_length);
        if palette.polarity() == Polarity::Inverted {
            let start = palette.offset();
            if let Some(table) = preamble.get_mut(start..start + COLOR_TABLE_LEN) {
                table.rotate_left(COLOR_TABLE_LEN / 2);
            }
        }

        Ok(Self {
            file_size,
            width,
            height,
            pixel_data_length,
            preamble,
            ..self.clone()
        })
    }

    /// Reads any field from the preserved header bytes
    #[must_use]
    pub fn field(&self, field: Field) -> Option<u32> {
        read_field(&self.preamble, field).ok()
    }

    /// Every field with its value, in file order
    pub fn fields(&self) -> impl Iterator<Item = (Field, u32)> + '_ {
        Field::iter().filter_map(|f| self.field(f).map(|value| (f, value)))
    }

    /// Every header byte preceding the pixel data
    #[must_use]
    pub fn preamble(&self) -> &[u8] {
        &self.preamble
    }

    /// The file identifier (`BM`)
    #[must_use]
    pub const fn file_id(&self) -> u16 {
        self.file_id
    }

    /// Declared file size in bytes
    #[must_use]
    pub const fn file_size(&self) -> u32 {
        self.file_size
    }

    /// Offset of the pixel data
    #[must_use]
    pub const fn pixel_data_offset(&self) -> u32 {
        self.pixel_data_offset
    }

    /// Length of the DIB header
    #[must_use]
    pub const fn dib_header_length(&self) -> u32 {
        self.dib_header_length
    }

    /// Image width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of color planes, always 1
    #[must_use]
    pub const fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Bits per pixel, always 1
    #[must_use]
    pub const fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Compression method, always 0
    #[must_use]
    pub const fn compression(&self) -> u32 {
        self.compression
    }

    /// Declared length of the pixel data
    #[must_use]
    pub const fn pixel_data_length(&self) -> u32 {
        self.pixel_data_length
    }

    /// Horizontal and vertical resolution in pixels per metre
    #[must_use]
    pub const fn resolution(&self) -> (u32, u32) {
        (self.horizontal_resolution, self.vertical_resolution)
    }

    /// Number of palette colors, always 2
    #[must_use]
    pub const fn palette_colors(&self) -> u32 {
        self.palette_colors
    }

    /// Number of important colors
    #[must_use]
    pub const fn important_colors(&self) -> u32 {
        self.important_colors
    }

    /// Offset of the color table, directly after the DIB header
    #[must_use]
    pub const fn color_table_offset(&self) -> usize {
        FILE_HEADER_LEN + self.dib_header_length as usize
    }
}

/// How the raster bits on disk map to ink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Index 0 is the darker color: bit 0 is ink
    Normal,
    /// Index 0 is the lighter color: the raster must be complemented so bit 0 is ink
    Inverted,
}

/// The two entry color table of a monochrome bitmap
///
/// Entries are the raw little endian `u32` values (blue, green, red, alpha on disk). The
/// numerically lower entry is treated as ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTable {
    offset: usize,
    entries: [u32; 2],
}

impl ColorTable {
    /// Reads the color table located directly after the DIB header
    ///
    /// # Errors
    ///
    /// - [`Error::ColorTableReadShortfall`] if the two entries do not fit before the pixel data
    /// - [`Error::UnsupportedVariant`] if both entries are the same color
    pub fn read(bytes: &[u8], header: &ContainerHeader) -> Result<Self, Error> {
        let offset = header.color_table_offset();
        let limit = bytes.len().min(header.pixel_data_offset() as usize);
        let available = limit.saturating_sub(offset);
        let shortfall = Error::ColorTableReadShortfall {
            offset,
            available,
            required: COLOR_TABLE_LEN,
        };
        if available < COLOR_TABLE_LEN {
            return Err(shortfall);
        }

        let parsed: IResult<&[u8], (u32, u32)> = pair(le_u32, le_u32)(&bytes[offset..limit]);
        let (_, (first, second)) = parsed.map_err(|_| shortfall)?;
        if first == second {
            return Err(Error::UnsupportedVariant(Variant::IndistinctPalette(first)));
        }
        let table = Self {
            offset,
            entries: [first, second],
        };
        debug!(
            "color table at {offset}: [{first:#010X}, {second:#010X}], polarity {:?}",
            table.polarity()
        );
        Ok(table)
    }

    /// Offset of the color table within the file
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The raw entries, in file order
    #[must_use]
    pub const fn entries(&self) -> [u32; 2] {
        self.entries
    }

    /// Whether index 0 is ink
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        if self.entries[0] < self.entries[1] {
            Polarity::Normal
        } else {
            Polarity::Inverted
        }
    }
}
