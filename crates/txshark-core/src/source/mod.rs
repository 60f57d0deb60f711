//! Capture sources for analysis.
//!
//! Sources abstract capture inputs (pcap/pcapng today) and keep I/O separate
//! from protocol parsing. A `PacketSource` yields raw frames in capture order
//! with microsecond timestamps and linktype metadata.
//!
mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// Raw frame event emitted by a `PacketSource`.
///
/// # Examples
/// ```
/// use txshark_core::PacketEvent;
/// use pcap_parser::Linktype;
///
/// let event = PacketEvent {
///     ts_us: 1_000_000,
///     linktype: Linktype::ETHERNET,
///     data: vec![0xde, 0xad, 0xbe, 0xef],
/// };
/// assert_eq!(event.data.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Capture timestamp in microseconds.
    pub ts_us: u64,
    /// Link type for the raw frame.
    pub linktype: Linktype,
    /// Frame bytes, starting at the link-layer header.
    pub data: Vec<u8>,
}

/// Abstract frame source for the analysis pipeline.
///
/// # Examples
/// ```
/// use txshark_core::{PacketEvent, PacketSource, SourceError};
/// use pcap_parser::Linktype;
///
/// struct OnePacket;
///
/// impl PacketSource for OnePacket {
///     fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
///         Ok(Some(PacketEvent {
///             ts_us: 0,
///             linktype: Linktype::ETHERNET,
///             data: vec![0u8; 4],
///         }))
///     }
/// }
/// ```
pub trait PacketSource {
    /// Returns the next frame event, or `None` at end of capture.
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

/// Errors produced by `PacketSource` implementations.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}
