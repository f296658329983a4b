use thiserror::Error;

/// Failures while turning an upload into a stored image
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Input is not an image we can read (corrupt, truncated or unsupported)
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Encoded output could not be probed for its dimensions
    #[error("Failed to read encoded image dimensions: {0}")]
    Probe(String),
}
