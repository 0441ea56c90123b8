use thiserror::Error;

/// Errors originating from frame loading and painting.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid surface dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}×{height} RGBA")]
    PixelLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("failed to fetch {locator}: {source}")]
    Fetch {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode frame: {0}")]
    Decode(#[from] image::ImageError),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] scrollreel_core::CoreError),
}
