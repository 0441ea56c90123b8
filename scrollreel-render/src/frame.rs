use crate::error::RenderError;

/// A decoded frame in straight (non-premultiplied) RGBA8.
///
/// Only built through [`from_rgba`](Self::from_rgba) or
/// [`decode`](Self::decode), so the buffer always holds
/// `width × height × 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    width: u32,
    height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pixels: Vec<u8>,
}

impl FrameImage {
    /// Wrap an existing RGBA buffer, checking its length.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> crate::Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::PixelLength {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode any format the `image` crate was built with.
    pub fn decode(bytes: &[u8]) -> crate::Result<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
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

    /// RGBA value at `(x, y)`, or `None` outside the image.
    #[inline]
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

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png() {
        let frame = FrameImage::decode(&png_bytes(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert_eq!(frame.pixels().len(), 3 * 2 * 4);
        assert_eq!(frame.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn pixel_outside_image_is_none() {
        let frame = FrameImage::from_rgba(2, 2, vec![7; 16]).unwrap();
        assert_eq!(frame.pixel(1, 1), Some([7; 4]));
        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.pixel(0, 2), None);
        assert_eq!(frame.pixel(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(matches!(
            FrameImage::decode(b"definitely not an image"),
            Err(RenderError::Decode(_))
        ));
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(FrameImage::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            FrameImage::from_rgba(2, 2, vec![0; 15]),
            Err(RenderError::PixelLength { expected: 16, .. })
        ));
    }
}
