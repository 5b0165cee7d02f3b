// =============================================================================
// Trading-session window
// =============================================================================
//
// Session gating happens in the venue's local time, modeled as a fixed UTC
// offset (exchange sessions do not move with DST for the venues this
// scanner ships with). A window whose close precedes its open wraps past
// midnight.

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};

fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 15, 0).unwrap_or(NaiveTime::MIN)
}

fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).unwrap_or(NaiveTime::MIN)
}

fn default_true() -> bool {
    true
}

/// IST, the offset for the default NSE/BSE universe.
fn default_utc_offset_minutes() -> i32 {
    330
}

/// Local-time range during which the venue is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    #[serde(default = "default_open")]
    pub open: NaiveTime,

    #[serde(default = "default_close")]
    pub close: NaiveTime,

    /// Skip Saturdays and Sundays.
    #[serde(default = "default_true")]
    pub weekdays_only: bool,

    /// Venue local-time offset from UTC, in minutes (IST = 330).
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
            weekdays_only: true,
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl SessionWindow {
    /// A window that never gates; used by deployments that want pacing but
    /// no market-hours logic, and by tests.
    pub fn always_open() -> Self {
        Self {
            open: NaiveTime::MIN,
            close: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
            weekdays_only: false,
            utc_offset_minutes: 0,
        }
    }

    /// Whether `now` falls inside the session at the venue's local time.
    /// Both boundaries are inclusive.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        // An out-of-range offset falls back to UTC rather than failing the
        // whole scan.
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix());
        let local = now.with_timezone(&offset);

        if self.weekdays_only
            && matches!(local.weekday(), Weekday::Sat | Weekday::Sun)
        {
            return false;
        }

        let t = local.time();
        if self.open <= self.close {
            self.open <= t && t <= self.close
        } else {
            // Overnight window, e.g. 21:00 .. 02:00.
            t >= self.open || t <= self.close
        }
    }
}
