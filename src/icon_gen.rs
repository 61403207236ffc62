use crate::artwork::generate_icon;
use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// File name of the full-resolution icon.
pub const BASE_FILENAME: &str = "app_icon.png";

/// Edge lengths of the resized copies, in the order they are written.
pub const ICON_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// File name of the resized copy with the given edge length.
pub fn sized_filename(size: u32) -> String {
    format!("app_icon_{size}.png")
}

/// Render the icon and write it, plus every resized copy, into `out_dir`.
pub fn generate_icons(out_dir: &Path) -> Result<Vec<PathBuf>> {
    create_dir_all(out_dir).context("Can't create output directory")?;

    let icon = DynamicImage::ImageRgba8(generate_icon());

    let mut written = Vec::with_capacity(ICON_SIZES.len() + 1);

    let output_path = out_dir.join(BASE_FILENAME);
    save_png(&icon, &output_path)?;
    println!("✓ Generated {BASE_FILENAME}");
    written.push(output_path);

    for size in ICON_SIZES {
        let resized = icon.resize_exact(size, size, FilterType::Lanczos3);
        let filename = sized_filename(size);
        let output_path = out_dir.join(&filename);
        save_png(&resized, &output_path)?;
        println!("✓ Generated {filename} ({size}x{size})");
        written.push(output_path);
    }

    Ok(written)
}

/// Encode `image` as a PNG at `path`, replacing any existing file.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    image
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to flush PNG {}", path.display()))?;
    Ok(())
}
