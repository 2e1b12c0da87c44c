use std::time::{Duration, Instant};

/// How long the input loop waits for a key while nothing is scheduled.
pub const IDLE_POLL: Duration = Duration::from_millis(250);

/// A repeating timer for the game loop.
///
/// There is only ever one schedule: starting again replaces it, so at most
/// one tick is pending at any time.
#[derive(Debug, Default)]
pub struct Ticker {
    schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    period: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn start(&mut self, period: Duration, now: Instant) {
        self.schedule = Some(Schedule {
            period,
            last_tick: now,
        });
    }

    pub fn stop(&mut self) {
        self.schedule = None;
    }

    pub fn restart(&mut self, period: Duration, now: Instant) {
        self.stop();
        self.start(period, now);
    }

    #[cfg(test)]
    pub fn period(&self) -> Option<Duration> {
        self.schedule.map(|s| s.period)
    }

    /// How long to wait for input before the next tick is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        match self.schedule {
            Some(s) => (s.last_tick + s.period).saturating_duration_since(now),
            None => IDLE_POLL,
        }
    }

    /// Returns true, and starts the next period, when a tick is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        match &mut self.schedule {
            Some(s) if now.duration_since(s.last_tick) >= s.period => {
                s.last_tick = now;
                true
            }
            _ => false,
        }
    }
}
