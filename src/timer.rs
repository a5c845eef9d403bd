use std::time::{Duration, Instant};

/// Time oracle polled by the search loops.
///
/// Solvers call `start` when they resume work and `stop` before handing a
/// result back, so that only time spent searching is charged to the budget.
pub trait TimeKeeper {
    /// Resumes the clock.
    fn start(&mut self);

    /// Pauses the clock.
    fn stop(&mut self);

    /// Returns whether the budget still allows more work.
    fn has_time_left(&self) -> bool;

    /// Returns the time charged so far.
    fn elapsed(&self) -> Duration;
}

/// Timer.
#[derive(Clone, Debug)]
pub struct Timer {
    start: Instant,
    running: bool,
    elapsed_time: Duration,
    time_limit: Option<Duration>,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            running: true,
            elapsed_time: Duration::from_secs(0),
            time_limit: None,
        }
    }
}

impl Timer {
    /// Returns a running timer with the given time limit in seconds.
    ///
    /// A limit too large for a `Duration`, such as infinity, means no limit.
    pub fn with_time_limit(time_limit: f64) -> Self {
        Self {
            time_limit: Duration::try_from_secs_f64(time_limit.max(0.0)).ok(),
            ..Self::default()
        }
    }

    /// Returns whether the time limit is reached.
    pub fn check_time_limit(&self) -> bool {
        self.time_limit
            .is_some_and(|time_limit| self.elapsed() >= time_limit)
    }
}

impl TimeKeeper for Timer {
    fn start(&mut self) {
        if !self.running {
            self.start = Instant::now();
            self.running = true;
        }
    }

    fn stop(&mut self) {
        if self.running {
            self.elapsed_time += self.start.elapsed();
            self.running = false;
        }
    }

    fn has_time_left(&self) -> bool {
        !self.check_time_limit()
    }

    fn elapsed(&self) -> Duration {
        if self.running {
            self.elapsed_time + self.start.elapsed()
        } else {
            self.elapsed_time
        }
    }
}
