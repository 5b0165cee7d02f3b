// =============================================================================
// Alert deduplication ledger
// =============================================================================
//
// One record per instrument, owned exclusively by the scanning task; there
// is nothing to lock. Records live for the process lifetime only. A record
// is written when a notification was actually delivered, not when a signal
// was merely detected, so a failed send retries on the next eligible
// signal.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Delivery bookkeeping for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyRecord {
    pub sent_count: u64,
    pub last_sent: DateTime<Utc>,
}

/// Per-instrument cooldown ledger keyed by symbol.
#[derive(Debug)]
pub struct AlertLedger {
    cooldown: Duration,
    records: HashMap<String, NotifyRecord>,
}

impl AlertLedger {
    pub fn new(cooldown_secs: u64) -> Self {
        Self {
            cooldown: Duration::seconds(cooldown_secs as i64),
            records: HashMap::new(),
        }
    }

    /// True iff the instrument has never been notified, or the cooldown has
    /// fully elapsed since the last delivery (boundary inclusive).
    pub fn should_notify(&self, symbol: &str, now: DateTime<Utc>) -> bool {
        match self.records.get(symbol) {
            None => true,
            Some(rec) => now - rec.last_sent >= self.cooldown,
        }
    }

    /// Record a delivered notification. `last_sent` never moves backwards,
    /// even if the caller hands in an earlier timestamp.
    pub fn record_sent(&mut self, symbol: &str, now: DateTime<Utc>) {
        let rec = self
            .records
            .entry(symbol.to_string())
            .or_insert(NotifyRecord {
                sent_count: 0,
                last_sent: now,
            });
        rec.sent_count += 1;
        rec.last_sent = rec.last_sent.max(now);
    }

    /// Bookkeeping for one instrument, if any notification has gone out.
    pub fn record(&self, symbol: &str) -> Option<&NotifyRecord> {
        self.records.get(symbol)
    }

    /// Number of instruments notified at least once this process lifetime.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
