//! Time sources for task timestamps.

use time::{Duration, OffsetDateTime};

/// Supplies the current time to the store.
pub trait Clock {
    /// Current time. Implementations may advance internal state.
    fn now(&mut self) -> OffsetDateTime;
}

/// UTC wall clock that never repeats or goes backwards.
///
/// When the wall clock has not advanced past the previous reading (same
/// nanosecond, or a backwards jump), the previous reading plus one nanosecond
/// is returned instead.
#[derive(Debug, Default, Clone)]
pub struct SystemClock {
    last: Option<OffsetDateTime>,
}

impl SystemClock {
    /// Create a clock with no previous reading.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> OffsetDateTime {
        let wall = OffsetDateTime::now_utc();
        let next = match self.last {
            Some(last) if wall <= last => last + Duration::nanoseconds(1),
            _ => wall,
        };
        self.last = Some(next);
        next
    }
}

/// Clock that only moves when told to. Each reading advances it by `step`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: OffsetDateTime,
    step: Duration,
}

impl ManualClock {
    /// Start at `start`, advancing one second per reading.
    #[must_use]
    pub const fn starting_at(start: OffsetDateTime) -> Self {
        Self {
            current: start,
            step: Duration::SECOND,
        }
    }

    /// Change how far each reading advances the clock. A zero step freezes it.
    #[must_use]
    pub const fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Jump the clock by `delta` (may be negative).
    pub fn advance(&mut self, delta: Duration) {
        self.current += delta;
    }

    /// The value the next reading will return.
    #[must_use]
    pub const fn peek(&self) -> OffsetDateTime {
        self.current
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> OffsetDateTime {
        let now = self.current;
        self.current += self.step;
        now
    }
}
