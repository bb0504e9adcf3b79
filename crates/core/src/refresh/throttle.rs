use std::time::Duration;

use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Run,
    /// Suppressed; a single trailing run may happen at the given instant
    Deferred(Instant),
}

/// Leading-edge time window with one trailing run.
///
/// The first trigger in a quiet window runs immediately. Triggers inside the
/// window collapse into one pending trailing run at the end of the window;
/// nothing is queued beyond that.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            pending: false,
        }
    }

    pub fn try_acquire(&mut self, now: Instant) -> Admission {
        match self.window_end() {
            Some(end) if now < end => {
                self.pending = true;
                Admission::Deferred(end)
            }
            _ => {
                self.last_run = Some(now);
                self.pending = false;
                Admission::Run
            }
        }
    }

    /// When the trailing run is due, if one is pending
    pub fn pending_deadline(&self) -> Option<Instant> {
        if self.pending { self.window_end() } else { None }
    }

    pub fn clear_pending(&mut self) {
        self.pending = false;
    }

    fn window_end(&self) -> Option<Instant> {
        self.last_run.map(|last| last + self.interval)
    }
}
