//! Aggregation over the turn log.

use serde::Serialize;

use super::logger::{self, TurnLogEntry};

/// Aggregate statistics over logged conversation turns.
#[derive(Debug, Clone, Serialize)]
pub struct TurnStats {
    pub total_turns: usize,
    pub ok_turns: usize,
    pub fallback_turns: usize,
    pub fallback_pct: f64,
    pub avg_latency_ms: u64,
}

/// Compute turn statistics from the full log.
pub fn compute_stats() -> TurnStats {
    aggregate(&logger::read_all_entries())
}

fn aggregate(entries: &[TurnLogEntry]) -> TurnStats {
    let total = entries.len();
    let fallback = entries.iter().filter(|e| e.outcome == "fallback").count();
    let fallback_pct = if total == 0 {
        0.0
    } else {
        fallback as f64 / total as f64 * 100.0
    };
    let avg_latency_ms = if total == 0 {
        0
    } else {
        entries.iter().map(|e| e.latency_ms).sum::<u64>() / total as u64
    };

    TurnStats {
        total_turns: total,
        ok_turns: total - fallback,
        fallback_turns: fallback,
        fallback_pct,
        avg_latency_ms,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(outcome: &str, latency_ms: u64) -> TurnLogEntry {
        TurnLogEntry {
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            question_chars: 10,
            reply_chars: 20,
            latency_ms,
            outcome: outcome.to_string(),
            error: None,
        }
    }

    #[test]
    fn aggregates_counts_and_latency() {
        let entries = vec![entry("ok", 1000), entry("ok", 3000), entry("fallback", 500)];
        let stats = aggregate(&entries);
        assert_eq!(stats.total_turns, 3);
        assert_eq!(stats.ok_turns, 2);
        assert_eq!(stats.fallback_turns, 1);
        assert_eq!(stats.avg_latency_ms, 1500);
        assert!((stats.fallback_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_log_yields_zeroed_stats() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_turns, 0);
        assert_eq!(stats.avg_latency_ms, 0);
        assert_eq!(stats.fallback_pct, 0.0);
    }
}
