use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::layers::Endpoint;
use crate::ydb::{CommitTransactionRequest, ExecuteDataQueryRequest, TxSelector};

use super::FrameInfo;

/// Query-text fragment identifying the opening query of a TPC-C NewOrder
/// transaction.
pub const NEW_ORDER_QUERY_FRAGMENT: &str = "SELECT C_DISCOUNT, C_LAST, C_CREDIT";

/// Key identifying one half of a bidirectional HTTP/2 stream.
///
/// The source endpoint disambiguates the two directions: a request is filed
/// under the client endpoint, and the paired response is looked up by the
/// response frame's *destination*, which is that same client endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamKey {
    pub source: Endpoint,
    pub stream_id: u32,
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stream {}", self.source, self.stream_id)
    }
}

/// Predicate selecting which opening requests start a tracked transaction.
#[derive(Debug, Clone)]
pub enum TransactionFilter {
    /// Track every transaction type.
    All,
    /// Track only transactions whose opening query text contains the
    /// given fragment.
    QueryContains(String),
}

impl TransactionFilter {
    /// The default filter: TPC-C NewOrder transactions.
    pub fn new_order() -> Self {
        Self::QueryContains(NEW_ORDER_QUERY_FRAGMENT.to_string())
    }

    fn accepts(&self, request: &ExecuteDataQueryRequest) -> bool {
        match self {
            Self::All => true,
            Self::QueryContains(fragment) => request
                .query
                .as_ref()
                .is_some_and(|query| query.yql_text().contains(fragment.as_str())),
        }
    }
}

/// Fatal protocol invariant violations.
///
/// Recoverable anomalies (stream reuse, replaced transactions, id
/// mismatches) never surface here; they are counted and the offending
/// state is evicted.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("continuation request without a session id on {stream}")]
    EmptySessionId { stream: StreamKey },
    #[error("stream index points at session {session_id} which has no active transaction")]
    MissingSessionEntry { session_id: String },
    #[error("no request outstanding on {stream} to finish")]
    NoPendingRequest { stream: StreamKey },
    #[error("finishing {stream} while the outstanding request is on {pending}")]
    PendingStreamMismatch { stream: StreamKey, pending: StreamKey },
}

/// Anomaly and progress counters surfaced in the final report.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TrackerCounters {
    pub processed: u64,
    pub skipped: u64,
    pub transactions_aborted: u64,
    pub transaction_id_mismatch: u64,
    pub request_response_mismatch: u64,
    pub clock_skew_clamped: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    stream: StreamKey,
    start_ts_us: u64,
}

/// State of one transaction, from its opening data-query request to its
/// commit response.
///
/// The whole transaction runs inside a single YDB session and the session
/// admits no concurrent requests, so at most one request is outstanding at
/// a time. Requests carry the session id; responses do not and are paired
/// with requests by HTTP/2 stream instead. The opening request also has no
/// transaction id yet; the id is adopted from the first subsequent request
/// that carries one.
#[derive(Debug)]
pub struct TransactionState {
    session_id: String,
    transaction_id: String,
    start_ts_us: u64,
    end_ts_us: u64,
    request_latencies_us: Vec<u64>,
    pending: Option<PendingRequest>,
    committing: bool,
}

impl TransactionState {
    fn new(session_id: &str, ts_us: u64) -> Self {
        Self {
            session_id: session_id.to_string(),
            transaction_id: String::new(),
            start_ts_us: ts_us,
            end_ts_us: 0,
            request_latencies_us: Vec::new(),
            pending: None,
            committing: false,
        }
    }

    fn start_request(&mut self, stream: StreamKey, ts_us: u64) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(PendingRequest {
            stream,
            start_ts_us: ts_us,
        });
    }

    /// Records the latency of the outstanding request. Returns true when
    /// the interval was negative and had to be clamped to zero.
    fn finish_request(&mut self, stream: StreamKey, ts_us: u64) -> Result<bool, TrackerError> {
        let pending = self
            .pending
            .take()
            .ok_or(TrackerError::NoPendingRequest { stream })?;
        if pending.stream != stream {
            return Err(TrackerError::PendingStreamMismatch {
                stream,
                pending: pending.stream,
            });
        }
        let clamped = ts_us < pending.start_ts_us;
        self.request_latencies_us
            .push(ts_us.saturating_sub(pending.start_ts_us));
        Ok(clamped)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Wall time between the opening request and the commit response.
    pub fn total_us(&self) -> u64 {
        self.end_ts_us.saturating_sub(self.start_ts_us)
    }

    /// Time the server held a request, summed over the transaction.
    pub fn server_us(&self) -> u64 {
        self.request_latencies_us.iter().sum()
    }

    /// Time spent on the client and in the network.
    pub fn client_us(&self) -> u64 {
        self.total_us().saturating_sub(self.server_us())
    }

    pub fn request_latencies_us(&self) -> &[u64] {
        &self.request_latencies_us
    }
}

/// Pairs requests with responses per HTTP/2 stream and groups sub-requests
/// into transactions per YDB session.
///
/// `active_by_session` owns the in-flight transaction states;
/// `active_by_stream` is a secondary lookup table mapping the stream of an
/// outstanding request back to its session. Every eviction purges both
/// maps together.
pub struct TransactionTracker {
    filter: TransactionFilter,
    active_by_session: HashMap<String, TransactionState>,
    active_by_stream: HashMap<StreamKey, String>,
    finished: Vec<TransactionState>,
    counters: TrackerCounters,
}

impl TransactionTracker {
    pub fn new(filter: TransactionFilter) -> Self {
        Self {
            filter,
            active_by_session: HashMap::new(),
            active_by_stream: HashMap::new(),
            finished: Vec::new(),
            counters: TrackerCounters::default(),
        }
    }

    /// A data-query request either opens a transaction (`begin_tx`
    /// selector) or continues one (`tx_id` selector).
    pub fn handle_data_query_request(
        &mut self,
        request: &ExecuteDataQueryRequest,
        frame: &FrameInfo,
    ) -> Result<(), TrackerError> {
        let stream = StreamKey {
            source: frame.source,
            stream_id: frame.stream_id,
        };
        let selector = request
            .tx_control
            .as_ref()
            .and_then(|control| control.tx_selector.as_ref());
        match selector {
            Some(TxSelector::BeginTx(_)) => {
                if self.filter.accepts(request) {
                    self.open_transaction(stream, &request.session_id, frame.ts_us);
                } else {
                    self.counters.skipped += 1;
                }
                Ok(())
            }
            Some(TxSelector::TxId(tx_id)) => {
                self.continue_transaction(stream, &request.session_id, tx_id, frame.ts_us, false)
            }
            None => {
                self.counters.skipped += 1;
                Ok(())
            }
        }
    }

    /// A commit request is one more request-response pair on the
    /// transaction; it flags the transaction as committing so the paired
    /// response finishes the whole transaction.
    pub fn handle_commit_request(
        &mut self,
        request: &CommitTransactionRequest,
        frame: &FrameInfo,
    ) -> Result<(), TrackerError> {
        let stream = StreamKey {
            source: frame.source,
            stream_id: frame.stream_id,
        };
        self.continue_transaction(stream, &request.session_id, &request.tx_id, frame.ts_us, true)
    }

    /// Returns true iff this response was claimed as the reply to an
    /// outstanding non-commit request.
    pub fn try_handle_data_query_response(
        &mut self,
        frame: &FrameInfo,
    ) -> Result<bool, TrackerError> {
        let stream = StreamKey {
            source: frame.destination,
            stream_id: frame.stream_id,
        };
        let Some(session_id) = self.active_by_stream.get(&stream).cloned() else {
            return Ok(false);
        };
        let Some(state) = self.active_by_session.get_mut(&session_id) else {
            return Err(TrackerError::MissingSessionEntry { session_id });
        };
        if state.committing {
            return Ok(false);
        }

        let clamped = state.finish_request(stream, frame.ts_us)?;
        debug!(session_id = %state.session_id, %stream, "finished request");
        self.active_by_stream.remove(&stream);
        if clamped {
            warn!(%stream, "response predates its request, clamping latency to zero");
            self.counters.clock_skew_clamped += 1;
        }
        self.counters.processed += 1;
        Ok(true)
    }

    /// Returns true iff this response was claimed as the reply to an
    /// outstanding commit request, finishing the transaction.
    pub fn try_handle_commit_response(&mut self, frame: &FrameInfo) -> Result<bool, TrackerError> {
        let stream = StreamKey {
            source: frame.destination,
            stream_id: frame.stream_id,
        };
        let Some(session_id) = self.active_by_stream.get(&stream).cloned() else {
            return Ok(false);
        };
        let Some(state) = self.active_by_session.get(&session_id) else {
            return Err(TrackerError::MissingSessionEntry { session_id });
        };
        if !state.committing {
            return Ok(false);
        }

        self.active_by_stream.remove(&stream);
        let Some(mut state) = self.active_by_session.remove(&session_id) else {
            return Err(TrackerError::MissingSessionEntry { session_id });
        };
        let clamped = state.finish_request(stream, frame.ts_us)?;
        if clamped {
            warn!(%stream, "commit response predates its request, clamping latency to zero");
            self.counters.clock_skew_clamped += 1;
        }
        if frame.ts_us < state.start_ts_us {
            warn!(%stream, "transaction ends before it starts, clamping total to zero");
            self.counters.clock_skew_clamped += 1;
        }
        state.end_ts_us = frame.ts_us;
        debug!(
            session_id = %state.session_id,
            transaction_id = %state.transaction_id,
            total_us = state.total_us(),
            "finished transaction"
        );
        self.finished.push(state);
        self.counters.processed += 1;
        Ok(true)
    }

    /// Counts a response-shaped message no open stream claimed: the
    /// capture missed its request, or its transaction was filtered out.
    pub fn note_unclaimed_response(&mut self) {
        self.counters.skipped += 1;
    }

    pub fn counters(&self) -> &TrackerCounters {
        &self.counters
    }

    pub fn finished(&self) -> &[TransactionState] {
        &self.finished
    }

    /// Number of transactions still open; they started before the capture
    /// ended and are not reported.
    pub fn open_transactions(&self) -> usize {
        self.active_by_session.len()
    }

    pub fn into_parts(self) -> (Vec<TransactionState>, TrackerCounters) {
        (self.finished, self.counters)
    }

    fn open_transaction(&mut self, stream: StreamKey, session_id: &str, ts_us: u64) {
        if self.active_by_stream.contains_key(&stream) {
            warn!(%stream, "stream already carries an outstanding request, dropping its transaction");
            self.evict_stream(stream);
            self.counters.request_response_mismatch += 1;
            return;
        }

        if let Some(previous) = self.active_by_session.remove(session_id) {
            // The server aborted the previous transaction in a way this
            // capture cannot observe; the new begin_tx supersedes it.
            if let Some(pending) = previous.pending {
                self.active_by_stream.remove(&pending.stream);
            }
            debug!(
                session_id,
                transaction_id = %previous.transaction_id,
                "session reused while a transaction was active, dropping the old one"
            );
            self.counters.transactions_aborted += 1;
        }

        debug!(session_id, %stream, "transaction started");
        let mut state = TransactionState::new(session_id, ts_us);
        state.start_request(stream, ts_us);
        self.active_by_stream.insert(stream, session_id.to_string());
        self.active_by_session.insert(session_id.to_string(), state);
        self.counters.processed += 1;
    }

    fn continue_transaction(
        &mut self,
        stream: StreamKey,
        session_id: &str,
        tx_id: &str,
        ts_us: u64,
        is_commit: bool,
    ) -> Result<(), TrackerError> {
        if session_id.is_empty() {
            return Err(TrackerError::EmptySessionId { stream });
        }

        let Some(state) = self.active_by_session.get(session_id) else {
            // Transaction opened before the capture started, or filtered.
            self.counters.skipped += 1;
            return Ok(());
        };

        if let Some(pending) = state.pending {
            warn!(
                session_id,
                %stream,
                outstanding = %pending.stream,
                "request while a response is still outstanding, dropping the transaction"
            );
            self.active_by_stream.remove(&pending.stream);
            self.active_by_session.remove(session_id);
            self.counters.request_response_mismatch += 1;
            return Ok(());
        }

        let Some(state) = self.active_by_session.get_mut(session_id) else {
            return Err(TrackerError::MissingSessionEntry {
                session_id: session_id.to_string(),
            });
        };
        if state.transaction_id.is_empty() {
            // The opening request has no transaction id; adopt it from the
            // first continuation that carries one.
            state.transaction_id = tx_id.to_string();
        } else if state.transaction_id != tx_id {
            warn!(
                session_id,
                current = %state.transaction_id,
                received = %tx_id,
                "transaction id changed mid-transaction, dropping the transaction"
            );
            self.active_by_session.remove(session_id);
            self.counters.transaction_id_mismatch += 1;
            return Ok(());
        }

        if is_commit {
            debug!(session_id, transaction_id = %state.transaction_id, "commit started");
        }
        state.start_request(stream, ts_us);
        state.committing = is_commit;
        self.active_by_stream.insert(stream, session_id.to_string());
        self.counters.processed += 1;
        Ok(())
    }

    /// Drops the transaction that filed a request under this stream,
    /// purging both indices.
    fn evict_stream(&mut self, stream: StreamKey) {
        if let Some(session_id) = self.active_by_stream.remove(&stream) {
            if let Some(state) = self.active_by_session.remove(&session_id) {
                if let Some(pending) = state.pending {
                    self.active_by_stream.remove(&pending.stream);
                }
            }
        }
    }

    #[cfg(test)]
    fn assert_indices_consistent(&self) {
        for (stream, session_id) in &self.active_by_stream {
            let state = self
                .active_by_session
                .get(session_id)
                .unwrap_or_else(|| panic!("stream {stream} points at a missing session"));
            let pending = state.pending.expect("indexed stream implies a pending request");
            assert_eq!(pending.stream, *stream);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ydb::{Query, QueryKind, TransactionControl, TransactionSettings};

    fn endpoint(last_octet: u8, port: u16) -> Endpoint {
        Endpoint {
            ip: format!("10.0.0.{last_octet}").parse().unwrap(),
            port,
        }
    }

    fn client() -> Endpoint {
        endpoint(1, 52340)
    }

    fn server() -> Endpoint {
        endpoint(2, 2135)
    }

    fn request_frame(stream_id: u32, ts_us: u64) -> FrameInfo {
        FrameInfo {
            frame_number: 0,
            ts_us,
            source: client(),
            destination: server(),
            stream_id,
        }
    }

    fn response_frame(stream_id: u32, ts_us: u64) -> FrameInfo {
        FrameInfo {
            frame_number: 0,
            ts_us,
            source: server(),
            destination: client(),
            stream_id,
        }
    }

    fn begin_request(session_id: &str, text: &str) -> ExecuteDataQueryRequest {
        ExecuteDataQueryRequest {
            session_id: session_id.into(),
            tx_control: Some(TransactionControl {
                tx_selector: Some(TxSelector::BeginTx(TransactionSettings::default())),
                commit_tx: false,
            }),
            query: Some(Query {
                query: Some(QueryKind::YqlText(text.into())),
            }),
        }
    }

    fn continue_request(session_id: &str, tx_id: &str) -> ExecuteDataQueryRequest {
        ExecuteDataQueryRequest {
            session_id: session_id.into(),
            tx_control: Some(TransactionControl {
                tx_selector: Some(TxSelector::TxId(tx_id.into())),
                commit_tx: false,
            }),
            query: Some(Query {
                query: Some(QueryKind::YqlText("UPSERT INTO oorder ...".into())),
            }),
        }
    }

    fn commit_request(session_id: &str, tx_id: &str) -> CommitTransactionRequest {
        CommitTransactionRequest {
            session_id: session_id.into(),
            tx_id: tx_id.into(),
        }
    }

    fn tracker() -> TransactionTracker {
        TransactionTracker::new(TransactionFilter::All)
    }

    #[test]
    fn transaction_happy_path() {
        let mut tracker = tracker();

        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        tracker.assert_indices_consistent();
        assert!(tracker.try_handle_data_query_response(&response_frame(1, 1_000)).unwrap());

        tracker
            .handle_data_query_request(&continue_request("s1", "t1"), &request_frame(3, 2_000))
            .unwrap();
        assert!(tracker.try_handle_data_query_response(&response_frame(3, 3_000)).unwrap());

        tracker
            .handle_commit_request(&commit_request("s1", "t1"), &request_frame(5, 4_000))
            .unwrap();
        tracker.assert_indices_consistent();
        assert!(tracker.try_handle_commit_response(&response_frame(5, 5_500)).unwrap());

        let finished = tracker.finished();
        assert_eq!(finished.len(), 1);
        let transaction = &finished[0];
        assert_eq!(transaction.transaction_id(), "t1");
        assert_eq!(transaction.request_latencies_us(), [1_000, 1_000, 1_500]);
        assert_eq!(transaction.total_us(), 5_500);
        assert_eq!(transaction.server_us(), 3_500);
        assert_eq!(transaction.client_us(), 2_000);
        assert_eq!(tracker.counters().processed, 6);
        assert_eq!(tracker.open_transactions(), 0);
    }

    #[test]
    fn new_begin_on_same_session_aborts_previous() {
        let mut tracker = tracker();

        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        // The first transaction still has a request outstanding when the
        // session starts over on a fresh stream.
        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 2"), &request_frame(3, 10_000))
            .unwrap();
        tracker.assert_indices_consistent();

        assert_eq!(tracker.counters().transactions_aborted, 1);
        assert!(tracker.finished().is_empty());
        assert_eq!(tracker.open_transactions(), 1);
        // The old stream no longer claims responses.
        assert!(!tracker.try_handle_data_query_response(&response_frame(1, 11_000)).unwrap());
    }

    #[test]
    fn transaction_id_mismatch_evicts() {
        let mut tracker = tracker();

        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        assert!(tracker.try_handle_data_query_response(&response_frame(1, 1_000)).unwrap());
        tracker
            .handle_data_query_request(&continue_request("s1", "t1"), &request_frame(3, 2_000))
            .unwrap();
        assert!(tracker.try_handle_data_query_response(&response_frame(3, 3_000)).unwrap());

        tracker
            .handle_data_query_request(&continue_request("s1", "t2"), &request_frame(5, 4_000))
            .unwrap();
        tracker.assert_indices_consistent();

        assert_eq!(tracker.counters().transaction_id_mismatch, 1);
        assert_eq!(tracker.open_transactions(), 0);
        assert!(tracker.finished().is_empty());
    }

    #[test]
    fn stream_reuse_drops_the_streams_transaction() {
        let mut tracker = tracker();

        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        tracker
            .handle_data_query_request(&begin_request("s2", "SELECT 2"), &request_frame(1, 500))
            .unwrap();
        tracker.assert_indices_consistent();

        assert_eq!(tracker.counters().request_response_mismatch, 1);
        // s1 died with the stream; s2 never got installed.
        assert_eq!(tracker.open_transactions(), 0);
    }

    #[test]
    fn request_while_response_outstanding_evicts() {
        let mut tracker = tracker();

        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        tracker
            .handle_data_query_request(&continue_request("s1", "t1"), &request_frame(3, 1_000))
            .unwrap();
        tracker.assert_indices_consistent();

        assert_eq!(tracker.counters().request_response_mismatch, 1);
        assert_eq!(tracker.open_transactions(), 0);
        assert!(!tracker.try_handle_data_query_response(&response_frame(1, 2_000)).unwrap());
    }

    #[test]
    fn orphan_commit_response_is_not_claimed() {
        let mut tracker = tracker();
        assert!(!tracker.try_handle_commit_response(&response_frame(9, 1_000)).unwrap());
        tracker.note_unclaimed_response();
        assert_eq!(tracker.counters().skipped, 1);
    }

    #[test]
    fn committing_stream_refuses_data_query_response_claim() {
        let mut tracker = tracker();

        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        assert!(tracker.try_handle_data_query_response(&response_frame(1, 1_000)).unwrap());
        tracker
            .handle_commit_request(&commit_request("s1", "t1"), &request_frame(3, 2_000))
            .unwrap();

        // The commit response looks like a data-query response on the wire;
        // the committing flag forces it through the commit handler.
        assert!(!tracker.try_handle_data_query_response(&response_frame(3, 3_000)).unwrap());
        assert!(tracker.try_handle_commit_response(&response_frame(3, 3_000)).unwrap());
        assert_eq!(tracker.finished().len(), 1);
    }

    #[test]
    fn idle_transaction_refuses_commit_response_claim() {
        let mut tracker = tracker();

        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        assert!(!tracker.try_handle_commit_response(&response_frame(1, 1_000)).unwrap());
        assert!(tracker.try_handle_data_query_response(&response_frame(1, 1_000)).unwrap());
    }

    #[test]
    fn continuation_with_empty_session_is_fatal() {
        let mut tracker = tracker();
        let result = tracker
            .handle_data_query_request(&continue_request("", "t1"), &request_frame(1, 0));
        assert!(matches!(result, Err(TrackerError::EmptySessionId { .. })));
    }

    #[test]
    fn continuation_for_unknown_session_is_skipped() {
        let mut tracker = tracker();
        tracker
            .handle_data_query_request(&continue_request("s9", "t9"), &request_frame(1, 0))
            .unwrap();
        assert_eq!(tracker.counters().skipped, 1);
        assert_eq!(tracker.open_transactions(), 0);
    }

    #[test]
    fn filter_rejects_opening_request() {
        let mut tracker = TransactionTracker::new(TransactionFilter::new_order());
        tracker
            .handle_data_query_request(
                &begin_request("s1", "SELECT * FROM warehouse"),
                &request_frame(1, 0),
            )
            .unwrap();
        assert_eq!(tracker.counters().skipped, 1);
        assert_eq!(tracker.open_transactions(), 0);
    }

    #[test]
    fn filter_accepts_new_order_opening_request() {
        let mut tracker = TransactionTracker::new(TransactionFilter::new_order());
        let text = format!("{NEW_ORDER_QUERY_FRAGMENT} FROM customer WHERE ...");
        tracker
            .handle_data_query_request(&begin_request("s1", &text), &request_frame(1, 0))
            .unwrap();
        assert_eq!(tracker.open_transactions(), 1);
    }

    #[test]
    fn negative_response_interval_clamps_to_zero() {
        let mut tracker = tracker();
        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 5_000))
            .unwrap();
        assert!(tracker.try_handle_data_query_response(&response_frame(1, 4_000)).unwrap());

        assert_eq!(tracker.counters().clock_skew_clamped, 1);
        let state = tracker.active_by_session.get("s1").unwrap();
        assert_eq!(state.request_latencies_us(), [0]);
    }

    #[test]
    fn adopted_transaction_id_is_kept() {
        let mut tracker = tracker();
        tracker
            .handle_data_query_request(&begin_request("s1", "SELECT 1"), &request_frame(1, 0))
            .unwrap();
        assert!(tracker.try_handle_data_query_response(&response_frame(1, 1_000)).unwrap());
        tracker
            .handle_data_query_request(&continue_request("s1", "t1"), &request_frame(3, 2_000))
            .unwrap();

        let state = tracker.active_by_session.get("s1").unwrap();
        assert_eq!(state.transaction_id(), "t1");
    }
}
