use std::fmt;
use std::net::IpAddr;

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::LayerError;

/// One side of a TCP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub ip: IpAddr,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip {
            IpAddr::V4(addr) => write!(f, "{}:{}", addr, self.port),
            IpAddr::V6(addr) => write!(f, "[{}]:{}", addr, self.port),
        }
    }
}

/// Decoded TCP segment with source/destination endpoints.
pub struct TcpSegment<'a> {
    pub source: Endpoint,
    pub destination: Endpoint,
    pub payload: &'a [u8],
}

/// Decode a captured frame down to its TCP payload.
///
/// Returns `Ok(None)` when the frame is not TCP-over-IP (ARP, UDP,
/// keep-alive variants of other protocols). Frames the capture should not
/// contain at all fail hard: non-Ethernet link types, malformed header
/// lengths, IPv4 options and IPv6 extension headers.
pub fn parse_tcp_segment(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<TcpSegment<'_>>, LayerError> {
    if linktype != Linktype::ETHERNET {
        return Err(LayerError::UnsupportedLinkType(format!("{linktype:?}")));
    }

    let sliced =
        SlicedPacket::from_ethernet(data).map_err(|e| LayerError::Slice(e.to_string()))?;

    let net = match sliced.net {
        Some(net) => net,
        None => return Ok(None),
    };
    let tcp = match sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => tcp,
        _ => return Ok(None),
    };

    let (src_ip, dst_ip) = match net {
        NetSlice::Ipv4(ref ipv4) => {
            let ihl = ipv4.header().ihl();
            if ihl != 5 {
                return Err(LayerError::Ipv4Options { ihl });
            }
            (
                IpAddr::V4(ipv4.header().source_addr()),
                IpAddr::V4(ipv4.header().destination_addr()),
            )
        }
        NetSlice::Ipv6(ref ipv6) => {
            let next_header = ipv6.header().next_header();
            if next_header != etherparse::IpNumber::TCP {
                return Err(LayerError::Ipv6Extensions {
                    next_header: next_header.0,
                });
            }
            (
                IpAddr::V6(ipv6.header().source_addr()),
                IpAddr::V6(ipv6.header().destination_addr()),
            )
        }
    };

    Ok(Some(TcpSegment {
        source: Endpoint {
            ip: src_ip,
            port: tcp.source_port(),
        },
        destination: Endpoint {
            ip: dst_ip,
            port: tcp.destination_port(),
        },
        payload: tcp.payload(),
    }))
}
