/// Demonstrates how to write every icon of an [`IconSheet`] as a png file
/// using the [`image`] crate
///
use image::{codecs::png::PngEncoder, ImageEncoder};
use libiconsplit::{icon_file_name, IconSheet, OutputSpec};
use std::fs::File;

fn main() -> anyhow::Result<()> {
    let sheet = IconSheet::from_file("icons.bmp")?;
    let grid = sheet.grid()?;
    let spec = OutputSpec::builder().normalize_to_max_size(true).build();
    let count = grid.regions().len();

    for (index, icon) in sheet.icons(&grid, &spec).enumerate() {
        let pixels = icon?.pixels().clone();
        let luma: Vec<u8> = (0..pixels.height())
            .flat_map(|y| (0..pixels.width()).map(move |x| (x, y)))
            .map(|(x, y)| match pixels.is_ink(x, y) {
                Some(true) => 0x00,
                _ => 0xFF,
            })
            .collect();

        let name = icon_file_name(index, count).replace(".bmp", ".png");
        let output = File::options()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&name)?;
        let encoder = PngEncoder::new(output);
        encoder.write_image(
            &luma,
            pixels.width(),
            pixels.height(),
            image::ExtendedColorType::L8,
        )?;
    }
    Ok(())
}
