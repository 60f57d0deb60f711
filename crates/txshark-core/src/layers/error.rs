use thiserror::Error;

/// Errors returned by link/network/transport decoding.
///
/// Captures are expected to be well formed; every variant here is fatal to
/// the run. Frames that are merely not interesting (non-IP ethertype,
/// non-TCP transport) decode to `None` instead.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("unsupported link type: {0}")]
    UnsupportedLinkType(String),
    #[error("malformed frame: {0}")]
    Slice(String),
    #[error("IPv4 header carries options (ihl {ihl})")]
    Ipv4Options { ihl: u8 },
    #[error("IPv6 header carries extension headers (next header {next_header})")]
    Ipv6Extensions { next_header: u8 },
}
