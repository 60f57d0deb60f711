use std::fmt::Write;

use crate::{PercentileSet, REPORT_VERSION, Report, TransactionSummary};

use super::tracker::{TransactionState, TransactionTracker};

/// Render a duration as milliseconds with one decimal digit.
pub(crate) fn format_ms(us: u64) -> String {
    format!("{}.{}", us / 1000, (us % 1000) / 100)
}

fn percentile_set(sorted: &[u64]) -> Option<PercentileSet> {
    if sorted.is_empty() {
        return None;
    }
    let pick = |p: f64| {
        let index = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
        sorted[index]
    };
    Some(PercentileSet {
        p50: pick(0.5),
        p90: pick(0.9),
        p95: pick(0.95),
        p99: pick(0.99),
    })
}

fn summarize(state: &TransactionState) -> TransactionSummary {
    TransactionSummary {
        transaction_id: state.transaction_id().to_string(),
        session_id: state.session_id().to_string(),
        total_us: state.total_us(),
        client_us: state.client_us(),
        server_us: state.server_us(),
        request_latencies_us: state.request_latencies_us().to_vec(),
    }
}

pub(crate) fn build_report(tracker: TransactionTracker, frames_decoded: u64) -> Report {
    let transactions_open = tracker.open_transactions() as u64;
    let (mut finished, counters) = tracker.into_parts();
    finished.sort_by_key(TransactionState::total_us);

    let total: Vec<u64> = finished.iter().map(TransactionState::total_us).collect();
    let mut client: Vec<u64> = finished.iter().map(TransactionState::client_us).collect();
    client.sort_unstable();
    let mut server: Vec<u64> = finished.iter().map(TransactionState::server_us).collect();
    server.sort_unstable();
    let mut per_query: Vec<u64> = finished
        .iter()
        .flat_map(|state| state.request_latencies_us().iter().copied())
        .collect();
    per_query.sort_unstable();

    Report {
        report_version: REPORT_VERSION,
        frames_decoded,
        transactions_committed: finished.len() as u64,
        transactions_open,
        counters,
        total_time: percentile_set(&total),
        client_time: percentile_set(&client),
        server_time: percentile_set(&server),
        server_query_time: percentile_set(&per_query),
        transactions: finished.iter().map(summarize).collect(),
    }
}

fn write_percentiles(out: &mut String, title: &str, set: &Option<PercentileSet>) {
    let Some(set) = set else { return };
    let _ = writeln!(out, "{title} percentiles:");
    for (label, value) in [
        ("50", set.p50),
        ("90", set.p90),
        ("95", set.p95),
        ("99", set.p99),
    ] {
        let _ = writeln!(out, "{label}%: {} ms", format_ms(value));
    }
}

/// Render the report the way the tool prints it: counters, percentile
/// blocks, and the ranked transaction list, slowest first. `top_n` of
/// `None` prints every transaction.
pub fn render_text(report: &Report, top_n: Option<usize>) -> String {
    if report.transactions.is_empty() {
        return "No transactions finished\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Processed {} requests and responses, skipped {}",
        report.counters.processed, report.counters.skipped
    );
    let _ = writeln!(
        out,
        "Total transactions aborted: {}",
        report.counters.transactions_aborted
    );
    let _ = writeln!(
        out,
        "Total transaction id mismatch: {}",
        report.counters.transaction_id_mismatch
    );
    let _ = writeln!(
        out,
        "Total request-response mismatch: {}",
        report.counters.request_response_mismatch
    );
    let _ = writeln!(
        out,
        "Total transactions committed: {}",
        report.transactions_committed
    );

    write_percentiles(&mut out, "Total time", &report.total_time);
    write_percentiles(&mut out, "Client time", &report.client_time);
    write_percentiles(&mut out, "Server time", &report.server_time);
    write_percentiles(&mut out, "Server time query", &report.server_query_time);

    match top_n {
        Some(top_n) => {
            let _ = writeln!(out, "Top {top_n} transactions by latency:");
        }
        None => {
            let _ = writeln!(out, "Transactions by latency:");
        }
    }
    let limit = top_n.unwrap_or(report.transactions.len());
    for transaction in report.transactions.iter().rev().take(limit) {
        let _ = write!(
            out,
            "Transaction {} took {} ms (client and net: {} ms, server: {} ms), with {} requests:",
            transaction.transaction_id,
            format_ms(transaction.total_us),
            format_ms(transaction.client_us),
            format_ms(transaction.server_us),
            transaction.request_latencies_us.len()
        );
        for (index, latency) in transaction.request_latencies_us.iter().enumerate() {
            let _ = write!(out, " r{}: {}", index + 1, format_ms(*latency));
        }
        let _ = writeln!(out);
    }

    out
}
