use serde::Serialize;

mod analysis;
mod layers;
mod protocols;
mod source;
pub mod ydb;

pub use analysis::{
    AnalysisError, AnalyzeOptions, FrameInfo, NEW_ORDER_QUERY_FRAGMENT, StreamKey,
    TrackerCounters, TrackerError, TransactionFilter, TransactionState, TransactionTracker,
    analyze_capture_file, analyze_source, render_text,
};
pub use layers::{Endpoint, LayerError, TcpSegment, parse_tcp_segment};
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

pub const REPORT_VERSION: u32 = 1;

/// Latency breakdown of one capture: counters, percentile tables, and the
/// committed transactions ranked by total time (ascending).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub report_version: u32,
    /// Frames decoded, not counting skipped ones.
    pub frames_decoded: u64,
    pub transactions_committed: u64,
    /// Transactions still active at end of capture; never reported.
    pub transactions_open: u64,
    pub counters: TrackerCounters,
    pub total_time: Option<PercentileSet>,
    pub client_time: Option<PercentileSet>,
    pub server_time: Option<PercentileSet>,
    pub server_query_time: Option<PercentileSet>,
    pub transactions: Vec<TransactionSummary>,
}

/// Microsecond values at the {50, 90, 95, 99} percentiles of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PercentileSet {
    pub p50: u64,
    pub p90: u64,
    pub p95: u64,
    pub p99: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionSummary {
    pub transaction_id: String,
    pub session_id: String,
    pub total_us: u64,
    /// Client plus network share of the total.
    pub client_us: u64,
    /// Sum of the per-request latencies.
    pub server_us: u64,
    pub request_latencies_us: Vec<u64>,
}
