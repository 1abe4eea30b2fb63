use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Turn log entry (JSONL analytics)
// ---------------------------------------------------------------------------

/// A single entry in the structured turn log (`~/.fraudlens/turn-log.jsonl`).
///
/// One line per conversation turn, recording sizes, latency, and whether
/// the turn produced a real reply or the fallback. Message content is not
/// logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnLogEntry {
    pub timestamp: String,
    pub question_chars: usize,
    pub reply_chars: usize,
    pub latency_ms: u64,
    /// `"ok"` or `"fallback"`.
    pub outcome: String,
    /// Driver error message for fallback turns.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log the result of one conversation turn.
///
/// Best-effort — failures are silently ignored so logging never fails a
/// turn.
pub fn log_turn(question_chars: usize, reply_chars: usize, latency_ms: u64, error: Option<&str>) {
    let entry = TurnLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        question_chars,
        reply_chars,
        latency_ms,
        outcome: if error.is_some() { "fallback" } else { "ok" }.to_string(),
        error: error.map(|e| e.to_string()),
    };

    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all turn log entries.
///
/// Silently skips malformed lines. Returns an empty vec if the file does
/// not exist or cannot be read.
pub fn read_all_entries() -> Vec<TurnLogEntry> {
    let Some(path) = turn_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<TurnLogEntry>(&line).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &TurnLogEntry) -> Result<()> {
    let Some(path) = turn_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the turn log file.
pub fn turn_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fraudlens").join("turn-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_through_json() {
        let entry = TurnLogEntry {
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            question_chars: 25,
            reply_chars: 48,
            latency_ms: 1800,
            outcome: "ok".to_string(),
            error: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("error"));

        let back: TurnLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.latency_ms, 1800);
        assert_eq!(back.outcome, "ok");
    }

    #[test]
    fn fallback_entry_carries_the_error() {
        let entry = TurnLogEntry {
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            question_chars: 10,
            reply_chars: 57,
            latency_ms: 120_000,
            outcome: "fallback".to_string(),
            error: Some("run did not complete within 120s".to_string()),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("fallback"));
        assert!(json.contains("run did not complete"));
    }
}
