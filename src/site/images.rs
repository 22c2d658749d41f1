//! Downscaling of oversized images in the output tree

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use walkdir::WalkDir;

use crate::core::config::ImageConfig;

/// Outcome of an optimization pass
#[derive(Debug, Default)]
pub struct ImageReport {
    pub resized: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Jpeg,
    Png,
}

fn format_of(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some(Format::Jpeg),
        "png" => Some(Format::Png),
        _ => None,
    }
}

/// Resize every JPEG/PNG under `dir` wider than `max_width`.
///
/// A file that fails to decode or encode is recorded as a warning and left
/// untouched.
pub fn optimize_images(dir: &Path, config: &ImageConfig) -> ImageReport {
    let mut report = ImageReport::default();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        let Some(format) = format_of(path) else {
            continue;
        };

        match resize_image(path, format, config) {
            Ok(true) => {
                tracing::debug!("Resized {}", path.display());
                report.resized += 1;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Could not optimize {}: {:#}", path.display(), e);
                report
                    .warnings
                    .push(format!("Could not optimize {}: {e:#}", path.display()));
            }
        }
    }

    report
}

fn resize_image(path: &Path, format: Format, config: &ImageConfig) -> Result<bool> {
    let img = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;

    if config.max_width == 0 || img.width() <= config.max_width {
        return Ok(false);
    }

    // Height bound is loose so the aspect ratio decides it
    let resized = img.resize(config.max_width, img.height(), FilterType::Lanczos3);

    match format {
        Format::Jpeg => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            let quality = config.jpeg_quality.clamp(1, 100);
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
            // JPEG has no alpha channel
            DynamicImage::ImageRgb8(resized.to_rgb8()).write_with_encoder(encoder)?;
        }
        Format::Png => {
            resized.save(path)?;
        }
    }

    Ok(true)
}
