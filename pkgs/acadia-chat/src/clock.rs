//! Monotonic timestamp source for message appends
//!
//! The UI hands the controller wall-clock events; the store requires
//! non-decreasing timestamps per conversation. The clock clamps every
//! issued instant to the latest one handed out, so a backwards system
//! clock jump can never produce an out-of-order message.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

enum ClockSource {
    System,
    /// Deterministic source for tests: starts at a fixed instant and
    /// advances by a fixed step per call (a zero step produces ties).
    Fixed {
        current: DateTime<Utc>,
        step: Duration,
    },
}

struct ClockInner {
    source: ClockSource,
    last_issued: Option<DateTime<Utc>>,
}

/// Clamped timestamp source
pub struct MessageClock {
    inner: Mutex<ClockInner>,
}

impl MessageClock {
    /// Clock backed by the system time
    pub fn system() -> Self {
        Self {
            inner: Mutex::new(ClockInner {
                source: ClockSource::System,
                last_issued: None,
            }),
        }
    }

    /// Deterministic clock stepping from a fixed start
    pub fn fixed(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            inner: Mutex::new(ClockInner {
                source: ClockSource::Fixed {
                    current: start,
                    step,
                },
                last_issued: None,
            }),
        }
    }

    /// Next timestamp, never earlier than any previously issued one
    pub fn now(&self) -> DateTime<Utc> {
        let mut inner = self.inner.lock();
        let raw = match &mut inner.source {
            ClockSource::System => Utc::now(),
            ClockSource::Fixed { current, step } => {
                let instant = *current;
                *current += *step;
                instant
            }
        };

        let issued = match inner.last_issued {
            Some(last) if raw < last => last,
            _ => raw,
        };
        inner.last_issued = Some(issued);
        issued
    }
}

impl Default for MessageClock {
    fn default() -> Self {
        Self::system()
    }
}
