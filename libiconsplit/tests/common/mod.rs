#![allow(dead_code)]

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

pub const BLACK: u32 = 0x0000_0000;
pub const WHITE: u32 = 0x00FF_FFFF;

/// In-memory description of a 1 bit-per-pixel icon sheet
#[derive(Debug, Clone)]
pub struct Sheet {
    pub width: u32,
    pub height: u32,
    ink: BTreeSet<(u32, u32)>,
    palette: [u32; 2],
    gap: Vec<u8>,
}

impl Sheet {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ink: BTreeSet::new(),
            palette: [BLACK, WHITE],
            gap: Vec::new(),
        }
    }

    pub fn pixel(mut self, x: u32, y: u32) -> Self {
        self.ink.insert((x, y));
        self
    }

    pub fn rect(mut self, left: u32, top: u32, width: u32, height: u32) -> Self {
        for y in top..top + height {
            for x in left..left + width {
                self.ink.insert((x, y));
            }
        }
        self
    }

    pub fn pattern(mut self, f: impl Fn(u32, u32) -> bool) -> Self {
        for y in 0..self.height {
            for x in 0..self.width {
                if f(x, y) {
                    self.ink.insert((x, y));
                }
            }
        }
        self
    }

    pub fn palette(mut self, palette: [u32; 2]) -> Self {
        self.palette = palette;
        self
    }

    /// Extra bytes between the color table and the pixel data
    pub fn gap(mut self, gap: &[u8]) -> Self {
        self.gap = gap.to_vec();
        self
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.ink.contains(&(x, y))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let row_len = (self.width as usize).div_ceil(8);
        let padded = row_len.next_multiple_of(4);
        let data_len = padded * self.height as usize;
        let offset = 14 + 40 + 8 + self.gap.len();
        let ink_bit = u8::from(self.palette[0] > self.palette[1]);

        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&((offset + data_len) as u32).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(data_len as u32).to_le_bytes());
        out.extend_from_slice(&3780u32.to_le_bytes());
        out.extend_from_slice(&3780u32.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&self.palette[0].to_le_bytes());
        out.extend_from_slice(&self.palette[1].to_le_bytes());
        out.extend_from_slice(&self.gap);

        for y in (0..self.height).rev() {
            let mut row = vec![0u8; padded];
            for x in 0..self.width {
                let bit = if self.is_ink(x, y) { ink_bit } else { 1 - ink_bit };
                row[x as usize / 8] |= bit << (7 - x % 8);
            }
            out.extend_from_slice(&row);
        }
        out
    }

    pub fn write(&self, dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, self.to_bytes())?;
        Ok(path)
    }
}

/// Decodes a written icon with the `image` crate, returning its ink mask row by row
pub fn ink_mask(path: &Path) -> anyhow::Result<Vec<Vec<bool>>> {
    let img = image::open(path)?.to_luma8();
    let (width, height) = img.dimensions();
    Ok((0..height)
        .map(|y| (0..width).map(|x| img.get_pixel(x, y)[0] < 128).collect())
        .collect())
}

pub fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| -> anyhow::Result<String> {
            Ok(entry?.file_name().to_string_lossy().into_owned())
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
