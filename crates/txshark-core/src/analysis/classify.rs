use prost::Message;
use tracing::trace;

use crate::ydb::{
    CommitTransactionRequest, CommitTransactionResponse, ExecuteDataQueryRequest,
    ExecuteDataQueryResponse,
};

use super::FrameInfo;
use super::tracker::{TrackerError, TransactionTracker};

/// Guess the message type of a protobuf blob and feed it to the tracker.
///
/// HPACK makes HTTP/2 headers undecodable mid-capture, so the gRPC method
/// is unknown; the type is guessed by trial decoding. Most blobs fail to
/// decode as three of the four candidates, which is expected and silent.
///
/// The order is load-bearing:
/// 1. `ExecuteDataQueryRequest` first — its field set is a superset of the
///    commit request's, so the reverse order would misclassify every
///    data query.
/// 2. `CommitTransactionRequest`.
/// 3. The two response types share their visible shape; only the stream's
///    transaction state tells them apart. The data-query handler is
///    consulted first and refuses streams that are committing, which the
///    commit handler then picks up.
pub(crate) fn classify_and_handle(
    tracker: &mut TransactionTracker,
    blob: &[u8],
    frame: &FrameInfo,
) -> Result<(), TrackerError> {
    if let Ok(request) = ExecuteDataQueryRequest::decode(blob) {
        if request.query.is_some() && !request.session_id.is_empty() {
            trace!(
                frame_number = frame.frame_number,
                session_id = %request.session_id,
                "execute data query request"
            );
            return tracker.handle_data_query_request(&request, frame);
        }
    }

    if let Ok(request) = CommitTransactionRequest::decode(blob) {
        if !request.session_id.is_empty() && !request.tx_id.is_empty() {
            trace!(
                frame_number = frame.frame_number,
                session_id = %request.session_id,
                tx_id = %request.tx_id,
                "commit transaction request"
            );
            return tracker.handle_commit_request(&request, frame);
        }
    }

    let mut response_shaped = false;

    if let Ok(response) = ExecuteDataQueryResponse::decode(blob) {
        if response.operation.is_some() {
            response_shaped = true;
            if tracker.try_handle_data_query_response(frame)? {
                trace!(
                    frame_number = frame.frame_number,
                    stream_id = frame.stream_id,
                    "execute data query response"
                );
                return Ok(());
            }
        }
    }

    if let Ok(response) = CommitTransactionResponse::decode(blob) {
        if response.operation.is_some() {
            response_shaped = true;
            if tracker.try_handle_commit_response(frame)? {
                trace!(
                    frame_number = frame.frame_number,
                    stream_id = frame.stream_id,
                    "commit transaction response"
                );
                return Ok(());
            }
        }
    }

    if response_shaped {
        tracker.note_unclaimed_response();
    }

    Ok(())
}
