use thiserror::Error;

/// Errors surfaced while unwrapping gRPC message framing.
#[derive(Debug, Error)]
pub enum GrpcError {
    #[error("message declares {declared} bytes, only {available} remain in the DATA frame")]
    TruncatedMessage { declared: usize, available: usize },
}
