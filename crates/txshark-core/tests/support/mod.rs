//! Shared builders for end-to-end scenarios: full Ethernet → TCP → HTTP/2 →
//! gRPC → protobuf packets, plus an in-memory packet source.
#![allow(dead_code)]

use std::net::IpAddr;

use etherparse::PacketBuilder;
use pcap_parser::Linktype;
use prost::Message;

use txshark_core::ydb::{
    CommitTransactionRequest, CommitTransactionResponse, ExecuteDataQueryRequest,
    ExecuteDataQueryResponse, Operation, Query, QueryKind, TransactionControl,
    TransactionSettings, TxSelector,
};
use txshark_core::{Endpoint, PacketEvent, PacketSource, SourceError};

pub struct VecSource {
    events: std::vec::IntoIter<PacketEvent>,
}

impl VecSource {
    pub fn new(events: Vec<PacketEvent>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl PacketSource for VecSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        Ok(self.events.next())
    }
}

pub fn client() -> Endpoint {
    Endpoint {
        ip: "10.0.0.1".parse().unwrap(),
        port: 52340,
    }
}

pub fn server() -> Endpoint {
    Endpoint {
        ip: "10.0.0.2".parse().unwrap(),
        port: 2135,
    }
}

pub fn client_v6() -> Endpoint {
    Endpoint {
        ip: "fd00::1".parse().unwrap(),
        port: 52340,
    }
}

pub fn server_v6() -> Endpoint {
    Endpoint {
        ip: "fd00::2".parse().unwrap(),
        port: 2135,
    }
}

/// Build a full Ethernet frame carrying `payload` as the TCP payload.
pub fn tcp_packet(src: Endpoint, dst: Endpoint, ts_us: u64, payload: &[u8]) -> PacketEvent {
    let mut data = Vec::new();
    match (src.ip, dst.ip) {
        (IpAddr::V4(src_ip), IpAddr::V4(dst_ip)) => {
            let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
                .ipv4(src_ip.octets(), dst_ip.octets(), 64)
                .tcp(src.port, dst.port, 0, 4096);
            builder.write(&mut data, payload).unwrap();
        }
        (IpAddr::V6(src_ip), IpAddr::V6(dst_ip)) => {
            let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
                .ipv6(src_ip.octets(), dst_ip.octets(), 64)
                .tcp(src.port, dst.port, 0, 4096);
            builder.write(&mut data, payload).unwrap();
        }
        _ => panic!("mixed address families"),
    }
    PacketEvent {
        ts_us,
        linktype: Linktype::ETHERNET,
        data,
    }
}

/// Wrap a payload in an HTTP/2 frame header.
pub fn http2_frame(frame_type: u8, stream_id: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(9 + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
    out.push(frame_type);
    out.push(0); // flags
    out.extend_from_slice(&stream_id.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn http2_data(stream_id: u32, payload: &[u8]) -> Vec<u8> {
    http2_frame(0x00, stream_id, payload)
}

pub fn http2_headers(stream_id: u32) -> Vec<u8> {
    // Opaque HPACK bytes; the analyzer must not look inside.
    http2_frame(0x01, stream_id, &[0x82, 0x86, 0x41, 0x0a])
}

/// Prefix a protobuf blob with the 5-byte gRPC message framing.
pub fn grpc_wrap(blob: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(5 + blob.len());
    out.push(0);
    out.extend_from_slice(&(blob.len() as u32).to_be_bytes());
    out.extend_from_slice(blob);
    out
}

pub fn begin_request_blob(session_id: &str, query_text: &str) -> Vec<u8> {
    ExecuteDataQueryRequest {
        session_id: session_id.into(),
        tx_control: Some(TransactionControl {
            tx_selector: Some(TxSelector::BeginTx(TransactionSettings::default())),
            commit_tx: false,
        }),
        query: Some(Query {
            query: Some(QueryKind::YqlText(query_text.into())),
        }),
    }
    .encode_to_vec()
}

pub fn continue_request_blob(session_id: &str, tx_id: &str, query_text: &str) -> Vec<u8> {
    ExecuteDataQueryRequest {
        session_id: session_id.into(),
        tx_control: Some(TransactionControl {
            tx_selector: Some(TxSelector::TxId(tx_id.into())),
            commit_tx: false,
        }),
        query: Some(Query {
            query: Some(QueryKind::YqlText(query_text.into())),
        }),
    }
    .encode_to_vec()
}

pub fn commit_request_blob(session_id: &str, tx_id: &str) -> Vec<u8> {
    CommitTransactionRequest {
        session_id: session_id.into(),
        tx_id: tx_id.into(),
    }
    .encode_to_vec()
}

fn operation() -> Operation {
    Operation {
        id: "ydb://operation/1".into(),
        ready: true,
        status: 400000, // SUCCESS
    }
}

pub fn data_query_response_blob() -> Vec<u8> {
    ExecuteDataQueryResponse {
        operation: Some(operation()),
    }
    .encode_to_vec()
}

pub fn commit_response_blob() -> Vec<u8> {
    CommitTransactionResponse {
        operation: Some(operation()),
    }
    .encode_to_vec()
}

/// One request packet: client → server, a single DATA frame on `stream_id`
/// with one gRPC-framed protobuf message.
pub fn request_packet(
    src: Endpoint,
    dst: Endpoint,
    stream_id: u32,
    ts_us: u64,
    blob: &[u8],
) -> PacketEvent {
    tcp_packet(src, dst, ts_us, &http2_data(stream_id, &grpc_wrap(blob)))
}

/// Serialize packets into a classic (legacy) pcap capture.
pub fn write_legacy_pcap(packets: &[PacketEvent]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes()); // magic, µs resolution
    out.extend_from_slice(&2u16.to_le_bytes()); // version major
    out.extend_from_slice(&4u16.to_le_bytes()); // version minor
    out.extend_from_slice(&0i32.to_le_bytes()); // thiszone
    out.extend_from_slice(&0u32.to_le_bytes()); // sigfigs
    out.extend_from_slice(&65535u32.to_le_bytes()); // snaplen
    out.extend_from_slice(&1u32.to_le_bytes()); // linktype: Ethernet

    for packet in packets {
        out.extend_from_slice(&((packet.ts_us / 1_000_000) as u32).to_le_bytes());
        out.extend_from_slice(&((packet.ts_us % 1_000_000) as u32).to_le_bytes());
        out.extend_from_slice(&(packet.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(packet.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&packet.data);
    }
    out
}

pub const NEW_ORDER_QUERY: &str =
    "SELECT C_DISCOUNT, C_LAST, C_CREDIT, W_TAX FROM customer, warehouse";
