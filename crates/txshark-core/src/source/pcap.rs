use std::fs::File;
use std::path::Path;

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, Linktype, PcapBlockOwned, create_reader};

use super::{PacketEvent, PacketSource, SourceError};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Reads classic pcap and pcapng captures from disk.
///
/// Format detection, buffering and block framing are delegated to
/// `pcap-parser`; this type keeps the interface → linktype table and
/// flattens both container formats into `PacketEvent`s with microsecond
/// timestamps.
pub struct PcapFileSource {
    reader: Box<dyn PcapReaderIterator>,
    linktypes: Vec<Linktype>,
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let reader = create_reader(READ_BUFFER_SIZE, file)
            .map_err(|e| SourceError::Pcap(e.to_string()))?;
        Ok(Self {
            reader,
            linktypes: Vec::new(),
        })
    }

    /// Flattens one capture block into a packet event. Header, section and
    /// interface blocks update the linktype table and yield nothing.
    fn event_from_block(
        linktypes: &mut Vec<Linktype>,
        block: PcapBlockOwned<'_>,
    ) -> Option<PacketEvent> {
        match block {
            PcapBlockOwned::LegacyHeader(header) => {
                linktypes.push(header.network);
                None
            }
            PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                ts_us: u64::from(packet.ts_sec) * 1_000_000 + u64::from(packet.ts_usec),
                linktype: linktype_for(linktypes, 0),
                data: packet.data.to_vec(),
            }),
            PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                // A new section starts a fresh interface numbering.
                linktypes.clear();
                None
            }
            PcapBlockOwned::NG(Block::InterfaceDescription(interface)) => {
                linktypes.push(interface.linktype);
                None
            }
            PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
                // 64-bit timestamp split across two fields; the default
                // if_tsresol is microseconds
                ts_us: (u64::from(packet.ts_high) << 32) | u64::from(packet.ts_low),
                linktype: linktype_for(linktypes, packet.if_id as usize),
                data: packet.data.to_vec(),
            }),
            _ => None,
        }
    }
}

fn linktype_for(linktypes: &[Linktype], interface: usize) -> Linktype {
    linktypes
        .get(interface)
        .copied()
        .unwrap_or(Linktype::ETHERNET)
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        loop {
            match self.reader.next() {
                Ok((consumed, block)) => {
                    let event = Self::event_from_block(&mut self.linktypes, block);
                    self.reader.consume(consumed);
                    if event.is_some() {
                        return Ok(event);
                    }
                }
                Err(pcap_parser::PcapError::Eof) => return Ok(None),
                Err(pcap_parser::PcapError::Incomplete(_)) => {
                    // A block larger than the remaining input means the
                    // capture was cut off mid-write.
                    if self.reader.reader_exhausted() {
                        return Err(SourceError::Pcap("truncated capture".to_string()));
                    }
                    self.reader
                        .refill()
                        .map_err(|e| SourceError::Pcap(e.to_string()))?;
                }
                Err(e) => return Err(SourceError::Pcap(e.to_string())),
            }
        }
    }
}
