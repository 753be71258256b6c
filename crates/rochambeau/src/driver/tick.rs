//! # Tick Loop
//!
//! Fixed-timestep pacing for real-time runs. Simulated time is advanced by
//! [`crate::Simulation::tick`] alone; this loop only decides when wall-clock
//! time says the next tick is due.

use std::time::{Duration, Instant};

/// Fixed-timestep tick loop controller.
#[derive(Debug)]
pub struct TickLoop {
    /// Target tick duration.
    tick_duration: Duration,
    /// Time of last poll.
    last_tick: Instant,
    /// Wall-clock time owed to pending ticks.
    accumulator: Duration,
    /// Ticks begun.
    tick_count: u64,
    /// Tick timing statistics.
    stats: TickStats,
}

/// Tick timing statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickStats {
    /// Minimum tick duration observed.
    pub min_tick_us: u64,
    /// Maximum tick duration observed.
    pub max_tick_us: u64,
    /// Average tick duration (rolling).
    pub avg_tick_us: u64,
    /// Ticks that took longer than the budget.
    pub late_ticks: u64,
    /// Total ticks measured.
    pub total_ticks: u64,
}

impl TickStats {
    fn fresh(tick_duration: Duration) -> Self {
        Self {
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            avg_tick_us: micros(tick_duration),
            late_ticks: 0,
            total_ticks: 0,
        }
    }
}

impl TickLoop {
    /// Creates a loop ticking every `tick_duration`.
    #[must_use]
    pub fn new(tick_duration: Duration) -> Self {
        Self {
            tick_duration,
            last_tick: Instant::now(),
            accumulator: Duration::ZERO,
            tick_count: 0,
            stats: TickStats::fresh(tick_duration),
        }
    }

    /// Creates a loop ticking every `millis` milliseconds.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Returns true if a tick is due.
    #[must_use]
    pub fn should_tick(&mut self) -> bool {
        let now = Instant::now();
        self.accumulator += now.duration_since(self.last_tick);
        self.last_tick = now;

        self.accumulator >= self.tick_duration
    }

    /// Marks the start of a tick and returns its start time.
    #[must_use]
    pub fn begin_tick(&mut self) -> Instant {
        self.accumulator = self.accumulator.saturating_sub(self.tick_duration);
        self.tick_count += 1;
        Instant::now()
    }

    /// Marks the end of a tick started at `start`.
    pub fn end_tick(&mut self, start: Instant) {
        let duration = start.elapsed();
        let duration_us = micros(duration);

        self.stats.total_ticks += 1;
        self.stats.min_tick_us = self.stats.min_tick_us.min(duration_us);
        self.stats.max_tick_us = self.stats.max_tick_us.max(duration_us);
        self.stats.avg_tick_us = (self.stats.avg_tick_us * 15 + duration_us) / 16;

        if duration > self.tick_duration {
            self.stats.late_ticks += 1;
        }
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn time_until_next_tick(&self) -> Duration {
        let owed = self.accumulator + self.last_tick.elapsed();
        self.tick_duration.saturating_sub(owed)
    }

    /// Sleeps until the next tick is due.
    pub fn wait_for_next_tick(&self) {
        let remaining = self.time_until_next_tick();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }

    /// Drops any owed time, e.g. after a pause.
    pub fn resync(&mut self) {
        self.last_tick = Instant::now();
        self.accumulator = Duration::ZERO;
    }

    /// Ticks begun.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Tick statistics.
    #[must_use]
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Target tick duration.
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Resets statistics.
    pub fn reset_stats(&mut self) {
        self.stats = TickStats::fresh(self.tick_duration);
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
