//! # libiconsplit
//!
//!
//! This library splits a monochrome (1 bit-per-pixel) Windows bitmap holding a grid of icons or
//! glyphs into one standalone bitmap per icon.
//!
//! The boundaries of each icon are discovered from the pixels themselves: a first pass finds
//! the bands of rows and columns that contain ink, a second pass finds the tight bounding box
//! of the ink inside every band intersection. Each icon is then copied bit-exactly onto its own
//! canvas, optionally with margins and/or padded out to the size of the largest icon, and
//! written with headers derived from the source file.
//!
//! ### Supported input
//!
//! Only uncompressed, single-plane, 1 bit-per-pixel bitmaps with a two color palette are
//! accepted. Whichever palette entry is numerically lower is treated as ink, so sheets stored
//! with either polarity produce the same icons. Output files always store ink as index 0.
//!
//! ### Usage
//!
//! #### Extracting every icon of a sheet
//!
//! ```rust,no_run
//! use libiconsplit::{extract_icons, OutputSpec};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let spec = OutputSpec::builder()
//!         .add_margins(true)
//!         .horizontal_margin(1)
//!         .vertical_margin(1)
//!         .normalize_to_max_size(true)
//!         .build();
//!     let written = extract_icons(Path::new("icons.bmp"), Path::new("out"), &spec)?;
//!     println!("wrote {} icons", written.len());
//!     Ok(())
//! }
//! ```
//!
//! #### Inspecting the grid without writing files
//!
//! ```rust,no_run
//! use libiconsplit::{IconSheet, OutputSpec};
//!
//! fn main() -> anyhow::Result<()> {
//!     let sheet = IconSheet::from_file("icons.bmp")?;
//!     let grid = sheet.grid()?;
//!     for (region, icon) in grid.regions().iter().zip(sheet.icons(&grid, &OutputSpec::default())) {
//!         let icon = icon?;
//!         println!("{region:?}: {} bytes", icon.to_bytes().len());
//!     }
//!     Ok(())
//! }
//! ```
//!

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

/// Module containing the bitmap container types
pub mod bitmap;
mod compose;
mod error;
mod extract;
/// Module containing the grid segmentation types
pub mod grid;

pub use bitmap::raster::PixelBuffer;
pub use bitmap::IconSheet;
pub use compose::{compose, placement, OutputSpec, Placement};
pub use error::{Error, Variant};
pub use extract::{extract_icons, icon_file_name, Icon};
pub use grid::{Band, Grid, IconRegion};
