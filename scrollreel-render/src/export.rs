//! PNG snapshots of the surface with embedded playback metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::surface::Surface;

/// Playback state to embed in a snapshot as tEXt chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotMetadata {
    pub frame_index: usize,
    pub frame_count: usize,
    pub progress: f64,
    pub scroll_y: f64,
    /// Locator of the frame on screen, if known.
    pub locator: Option<String>,
}

/// Write the surface as a PNG file with embedded playback metadata.
///
/// Uses the `png` crate directly (rather than `image`) so the custom tEXt
/// chunks are readable by exiftool and friends.
pub fn export_png(surface: &Surface, path: &Path, metadata: &SnapshotMetadata) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let (width, height) = (surface.width(), surface.height());
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "ScrollReel".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;
    for (key, value) in build_metadata_pairs(metadata, width, height) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(surface.pixels())?;
    png_writer.finish()?;

    debug!(
        width,
        height,
        frame = metadata.frame_index,
        "Exported snapshot to {}",
        path.display()
    );
    Ok(())
}

fn build_description(meta: &SnapshotMetadata) -> String {
    format!(
        "Frame {} of {} at {:.1}% progress",
        meta.frame_index + 1,
        meta.frame_count,
        meta.progress * 100.0,
    )
}

fn build_metadata_pairs(meta: &SnapshotMetadata, width: u32, height: u32) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("ScrollReel.FrameIndex".into(), meta.frame_index.to_string()),
        ("ScrollReel.FrameCount".into(), meta.frame_count.to_string()),
        ("ScrollReel.Progress".into(), format!("{:.6}", meta.progress)),
        ("ScrollReel.ScrollY".into(), format!("{}", meta.scroll_y)),
        ("ScrollReel.Resolution".into(), format!("{width}x{height}")),
    ];
    if let Some(locator) = &meta.locator {
        pairs.push(("ScrollReel.Locator".into(), locator.clone()));
    }
    pairs
}
