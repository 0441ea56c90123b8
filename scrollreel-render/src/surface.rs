use rayon::prelude::*;
use tracing::trace;

use crate::error::RenderError;
use crate::frame::FrameImage;

/// Placement of an image scaled to cover a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Uniform scale applied to the image.
    pub ratio: f64,
    /// Left edge of the scaled image in surface pixels (≤ 0 when cropped).
    pub x: f64,
    /// Top edge of the scaled image in surface pixels (≤ 0 when cropped).
    pub y: f64,
    /// Scaled image width.
    pub width: f64,
    /// Scaled image height.
    pub height: f64,
}

/// Scale an `image_w × image_h` image to cover a `surface_w × surface_h`
/// surface while preserving aspect ratio, centred on both axes.
///
/// One axis fits exactly and the other overflows symmetrically, so there is
/// never letterboxing. Returns `None` for a zero-sized image.
pub fn cover_fit(surface_w: u32, surface_h: u32, image_w: u32, image_h: u32) -> Option<CoverFit> {
    if image_w == 0 || image_h == 0 {
        return None;
    }
    let (sw, sh) = (surface_w as f64, surface_h as f64);
    let (iw, ih) = (image_w as f64, image_h as f64);
    let ratio = (sw / iw).max(sh / ih);
    let width = iw * ratio;
    let height = ih * ratio;
    Some(CoverFit {
        ratio,
        x: (sw - width) / 2.0,
        y: (sh - height) / 2.0,
        width,
        height,
    })
}

/// Viewport-sized RGBA drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a cleared surface. Zero dimensions mean there is nothing to
    /// draw on and are rejected.
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reallocate for a new viewport size. Always clears; the next draw
    /// repaints. Invalid sizes leave the surface untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> crate::Result<()> {
        check_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize * 4, 0);
        trace!(width, height, "Surface resized");
        Ok(())
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// RGBA value at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Clear, then paint `image` cover-fitted and centred.
    ///
    /// Sampling is nearest-neighbour at pixel centres, so every surface
    /// pixel shows an unblended source pixel. Rows are painted in parallel.
    pub fn draw(&mut self, image: &FrameImage) {
        self.clear();
        let Some(fit) = cover_fit(self.width, self.height, image.width(), image.height()) else {
            return;
        };

        // Source column for each destination column inside the scaled image.
        let col_start = fit.x.max(0.0).floor() as u32;
        let col_end = ((fit.x + fit.width).ceil().max(0.0) as u32).min(self.width);
        let row_start = fit.y.max(0.0).floor() as u32;
        let row_end = ((fit.y + fit.height).ceil().max(0.0) as u32).min(self.height);
        if col_start >= col_end || row_start >= row_end {
            return;
        }
        let src_cols: Vec<usize> = (col_start..col_end)
            .map(|dx| source_index(dx, fit.x, fit.ratio, image.width()))
            .collect();

        let stride = self.width as usize * 4;
        let src_stride = image.width() as usize * 4;
        let src = image.pixels();
        self.pixels
            .par_chunks_exact_mut(stride)
            .enumerate()
            .skip(row_start as usize)
            .take((row_end - row_start) as usize)
            .for_each(|(dy, row)| {
                let sy = source_index(dy as u32, fit.y, fit.ratio, image.height());
                let src_row = &src[sy * src_stride..(sy + 1) * src_stride];
                for (i, &sx) in src_cols.iter().enumerate() {
                    let dst = (col_start as usize + i) * 4;
                    row[dst..dst + 4].copy_from_slice(&src_row[sx * 4..sx * 4 + 4]);
                }
            });
    }
}

/// Map a destination pixel centre back to a clamped source coordinate.
#[inline]
fn source_index(dest: u32, offset: f64, ratio: f64, source_len: u32) -> usize {
    let s = ((dest as f64 + 0.5 - offset) / ratio).floor();
    (s.max(0.0) as usize).min(source_len as usize - 1)
}

fn check_dimensions(width: u32, height: u32) -> crate::Result<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    Ok(())
}
