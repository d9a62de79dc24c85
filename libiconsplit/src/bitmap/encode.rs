use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};
use tracing::{debug, instrument};

use super::{
    header::ContainerHeader,
    raster::{padded_row_bytes, PixelBuffer},
};
use crate::Error;

/// On-disk row order: rows bottom-to-top, each followed by its background padding
fn disk_rows<'a>(pixels: &'a PixelBuffer, padding: &'a [u8]) -> impl Iterator<Item = &'a [u8]> {
    (0..pixels.height())
        .rev()
        .filter_map(|y| pixels.row(y))
        .flat_map(move |row| [row, padding])
}

/// Background bytes that pad one row up to a multiple of 4 bytes
fn row_padding(pixels: &PixelBuffer) -> Vec<u8> {
    vec![0xFF; padded_row_bytes(pixels.width()) - pixels.stride()]
}

/// Serializes a header and raster: the preserved header bytes, then the rows bottom-to-top,
/// each padded to a multiple of 4 bytes with background (`0xFF`) bytes.
///
/// Returns the number of bytes written.
pub fn encode_into(
    w: &mut impl Write,
    header: &ContainerHeader,
    pixels: &PixelBuffer,
) -> io::Result<u64> {
    w.write_all(header.preamble())?;
    let padding = row_padding(pixels);
    let mut written = header.preamble().len() as u64;
    for chunk in disk_rows(pixels, &padding) {
        w.write_all(chunk)?;
        written += chunk.len() as u64;
    }
    Ok(written)
}

/// Encodes a complete bitmap file in memory
#[must_use]
pub fn encode_to_vec(header: &ContainerHeader, pixels: &PixelBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.file_size() as usize);
    out.extend_from_slice(header.preamble());
    let padding = row_padding(pixels);
    for chunk in disk_rows(pixels, &padding) {
        out.extend_from_slice(chunk);
    }
    out
}

/// Writes a bitmap file, overwriting any existing file at `path`
///
/// # Errors
///
/// - [`Error::OutputCreateFailed`] if the file cannot be created
/// - [`Error::OutputWriteFailed`] if writing fails part way
/// - [`Error::WritePartial`] if the file on disk does not have the size declared in `header`
#[instrument(skip(header, pixels), level = "debug")]
pub fn write_file(path: &Path, header: &ContainerHeader, pixels: &PixelBuffer) -> Result<(), Error> {
    let file = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| Error::OutputCreateFailed {
            path: path.to_owned(),
            source,
        })?;
    let write_failed = |source| Error::OutputWriteFailed {
        path: path.to_owned(),
        source,
    };

    let mut f = BufWriter::new(&file);
    let written = encode_into(&mut f, header, pixels).map_err(write_failed)?;
    f.flush().map_err(write_failed)?;
    drop(f);

    let actual = file.metadata().map_err(write_failed)?.len();
    debug!("wrote {written} bytes, {actual} bytes on disk");
    let expected = u64::from(header.file_size());
    if actual != expected {
        return Err(Error::WritePartial {
            path: path.to_owned(),
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{header::ColorTable, tests::sample_container, IconSheet};
    use mktemp::Temp;
    use std::fs;

    #[test]
    fn encodes_rows_bottom_up_with_background_padding() {
        let bytes = sample_container(&[&[true], &[false]], [0, 0x00FF_FFFF]);
        let sheet = IconSheet::from_bytes(&bytes).unwrap();
        let mut pixels = PixelBuffer::blank(10, 2);
        pixels.set_ink(0, 0, true);
        let header = sheet
            .header()
            .derive_for_output(sheet.palette(), 10, 2, 8)
            .unwrap();

        let out = encode_to_vec(&header, &pixels);
        assert_eq!(out.len(), 70);
        assert_eq!(&out[..54], &header.preamble()[..54]);
        assert_eq!(&out[62..66], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&out[66..70], &[0x7F, 0xFF, 0xFF, 0xFF]);

        let mut streamed = Vec::new();
        let written = encode_into(&mut streamed, &header, &pixels).unwrap();
        assert_eq!(written, 70);
        assert_eq!(streamed, out);
    }

    #[test]
    fn written_file_reads_back() {
        let bytes = sample_container(&[&[true, false, true]], [0, 0x00FF_FFFF]);
        let sheet = IconSheet::from_bytes(&bytes).unwrap();
        let tmp = Temp::new_dir().unwrap();
        let dir: &Path = tmp.as_ref();
        let path = dir.join("0.bmp");

        write_file(&path, sheet.header(), sheet.pixels()).unwrap();
        let reread = fs::read(&path).unwrap();
        let header = ContainerHeader::parse(&reread).unwrap();
        assert!(ColorTable::read(&reread, &header).is_ok());
        assert_eq!(
            IconSheet::from_bytes(&reread).unwrap().pixels(),
            sheet.pixels()
        );
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let bytes = sample_container(&[&[true]], [0, 0x00FF_FFFF]);
        let sheet = IconSheet::from_bytes(&bytes).unwrap();
        // header declares 2 rows, raster has 1
        let header = sheet
            .header()
            .derive_for_output(sheet.palette(), 1, 2, 8)
            .unwrap();
        let tmp = Temp::new_dir().unwrap();
        let dir: &Path = tmp.as_ref();
        let result = write_file(&dir.join("0.bmp"), &header, sheet.pixels());
        assert!(matches!(
            result,
            Err(Error::WritePartial { expected: 70, actual: 66, .. })
        ));
    }

    #[test]
    fn missing_directory_fails_to_create() {
        let bytes = sample_container(&[&[true]], [0, 0x00FF_FFFF]);
        let sheet = IconSheet::from_bytes(&bytes).unwrap();
        let path = Path::new("/nonexistent-libiconsplit-dir/0.bmp");
        assert!(matches!(
            write_file(path, sheet.header(), sheet.pixels()),
            Err(Error::OutputCreateFailed { .. })
        ));
    }
}
