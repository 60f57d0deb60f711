use thiserror::Error;

/// Errors surfaced while walking HTTP/2 frames in a TCP payload.
#[derive(Debug, Error)]
pub enum Http2Error {
    #[error(
        "frame on stream {stream_id} declares {declared} payload bytes, only {available} remain"
    )]
    TruncatedFrame {
        stream_id: u32,
        declared: usize,
        available: usize,
    },
}
