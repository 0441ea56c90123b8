use thiserror::Error;

/// Errors originating from the core scroll engine.
///
/// Runtime scroll math never fails (bad offsets are clamped); these only
/// surface while building configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid frame pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid frame count: {0} (must be >= 1)")]
    InvalidFrameCount(usize),

    #[error("invalid scroll profile: {reason}")]
    InvalidProfile { reason: String },
}
