//! Capture ingestion and transaction reconstruction.
//!
//! Frames flow strictly one way: layer decode → HTTP/2 split → gRPC unwrap
//! → message classification → transaction tracker. The tracker holds all
//! cross-packet state; everything before it is a pure decoder.

mod classify;
mod report;
mod tracker;

pub use report::render_text;
pub use tracker::{
    NEW_ORDER_QUERY_FRAGMENT, StreamKey, TrackerCounters, TrackerError, TransactionFilter,
    TransactionState, TransactionTracker,
};

use std::path::Path;

use thiserror::Error;
use tracing::{trace, warn};

use crate::Report;
use crate::layers::{Endpoint, LayerError, parse_tcp_segment};
use crate::protocols::grpc::{GrpcMessage, split_messages};
use crate::protocols::http2::{FrameKind, split_frames};
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("frame {frame_number}: {source}")]
    Layer {
        frame_number: u64,
        #[source]
        source: LayerError,
    },
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Ingestion options.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Discard this many frames from the start of the capture without
    /// decoding them.
    pub skip: u64,
    /// Stop after decoding this many frames.
    pub limit: Option<u64>,
    /// Which transactions to track.
    pub filter: TransactionFilter,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: None,
            filter: TransactionFilter::new_order(),
        }
    }
}

/// Per-frame scratch carried through the decoding layers.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Position in the capture, 1-based, counting skipped frames.
    pub frame_number: u64,
    /// Capture timestamp in microseconds.
    pub ts_us: u64,
    pub source: Endpoint,
    pub destination: Endpoint,
    /// HTTP/2 stream id of the DATA frame being processed.
    pub stream_id: u32,
}

pub fn analyze_capture_file(path: &Path, options: &AnalyzeOptions) -> Result<Report, AnalysisError> {
    let source = PcapFileSource::open(path)?;
    analyze_source(source, options)
}

pub fn analyze_source<S: PacketSource>(
    mut source: S,
    options: &AnalyzeOptions,
) -> Result<Report, AnalysisError> {
    let mut tracker = TransactionTracker::new(options.filter.clone());

    for _ in 0..options.skip {
        // Read errors while skipping are deliberately ignored; the frames
        // were not going to be decoded anyway.
        if let Ok(None) = source.next_packet() {
            break;
        }
    }

    let mut decoded: u64 = 0;
    loop {
        if options.limit.is_some_and(|limit| decoded >= limit) {
            break;
        }
        let event = match source.next_packet() {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                warn!(%err, "capture read failed mid-stream, reporting partial results");
                break;
            }
        };
        decoded += 1;
        process_frame(&mut tracker, &event, options.skip + decoded)?;
    }

    Ok(report::build_report(tracker, decoded))
}

fn process_frame(
    tracker: &mut TransactionTracker,
    event: &PacketEvent,
    frame_number: u64,
) -> Result<(), AnalysisError> {
    let segment = match parse_tcp_segment(event.linktype, &event.data) {
        Ok(Some(segment)) => segment,
        Ok(None) => return Ok(()),
        Err(source) => {
            return Err(AnalysisError::Layer {
                frame_number,
                source,
            });
        }
    };
    if segment.payload.is_empty() {
        // ACKs and keep-alives.
        return Ok(());
    }

    trace!(
        frame_number,
        source = %segment.source,
        destination = %segment.destination,
        payload_len = segment.payload.len(),
        "tcp segment"
    );

    for frame_result in split_frames(segment.payload) {
        let http2_frame = match frame_result {
            Ok(frame) => frame,
            Err(err) => {
                warn!(frame_number, %err, "stopping HTTP/2 walk in this segment");
                break;
            }
        };
        match http2_frame.kind {
            FrameKind::Data => {}
            FrameKind::Headers => {
                trace!(
                    frame_number,
                    stream_id = http2_frame.stream_id,
                    "headers frame (HPACK not decoded)"
                );
                continue;
            }
            FrameKind::Other(frame_type) => {
                trace!(frame_number, frame_type, "ignored HTTP/2 frame");
                continue;
            }
        }

        let frame_info = FrameInfo {
            frame_number,
            ts_us: event.ts_us,
            source: segment.source,
            destination: segment.destination,
            stream_id: http2_frame.stream_id,
        };
        for message in split_messages(http2_frame.payload) {
            match message {
                Ok(GrpcMessage { body: Some(body) }) => {
                    classify::classify_and_handle(tracker, body, &frame_info)?;
                }
                Ok(GrpcMessage { body: None }) => {
                    warn!(frame_number, "compressed gRPC message skipped");
                }
                Err(err) => {
                    warn!(frame_number, %err, "stopping gRPC walk in this DATA frame");
                    break;
                }
            }
        }
    }

    Ok(())
}
