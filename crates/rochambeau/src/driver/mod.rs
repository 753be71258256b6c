//! # Simulation Driver
//!
//! Runs a [`Simulation`] until it settles, runs out of ticks or is told to
//! stop. The presentation side steers the run through [`ControlSignal`]s on a
//! bounded channel; the driver drains the channel between ticks, so a tick is
//! never interrupted halfway.
//!
//! ## States
//!
//! ```text
//! Playing --Pause--> Paused --Resume--> Playing
//!    |                  |
//!    +----Terminate-----+--> Terminated
//!    +--single kind left---> Settled
//!    +--max_ticks reached--> Exhausted
//!    +--nobody left--------> Exhausted
//! ```

mod tick;

pub use tick::{TickLoop, TickStats};

use crossbeam_channel::{bounded, Receiver, Sender};
use rochambeau_core::{Kind, SimTime};
use tracing::{debug, info, warn};

use crate::config::{Pacing, ScheduleConfig};
use crate::error::SimResult;
use crate::population::KindCounts;
use crate::simulation::Simulation;

/// Queued control signals before senders block.
pub const CONTROL_QUEUE_CAPACITY: usize = 64;

/// Commands from the presentation side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlSignal {
    /// Stop ticking until resumed.
    Pause,
    /// Continue after a pause.
    Resume,
    /// Replace the population with a fresh one.
    Reset,
    /// End the run.
    Terminate,
}

/// Where a run stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Ticking.
    Playing,
    /// Waiting for a signal.
    Paused,
    /// Only this kind is left.
    Settled(Kind),
    /// `max_ticks` ticks were run, or there is no population to settle.
    Exhausted,
    /// Stopped by [`ControlSignal::Terminate`] or a closed channel while paused.
    Terminated,
}

impl RunState {
    /// True once the run has ended.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Settled(_) | Self::Exhausted | Self::Terminated)
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Final state.
    pub final_state: RunState,
    /// Ticks run by this call.
    pub ticks: u64,
    /// Simulated time at the end.
    pub sim_time: SimTime,
    /// Population at the end.
    pub counts: KindCounts,
    /// Wall-clock tick timings.
    pub stats: TickStats,
}

/// Drives a simulation according to a [`ScheduleConfig`].
#[derive(Debug)]
pub struct Driver {
    schedule: ScheduleConfig,
    control_rx: Receiver<ControlSignal>,
    state: RunState,
}

impl Driver {
    /// Creates a driver and the sender that controls it.
    #[must_use]
    pub fn new(schedule: ScheduleConfig) -> (Self, Sender<ControlSignal>) {
        let (control_tx, control_rx) = bounded(CONTROL_QUEUE_CAPACITY);
        (Self::with_receiver(schedule, control_rx), control_tx)
    }

    /// Creates a driver listening on an existing channel.
    #[must_use]
    pub fn with_receiver(schedule: ScheduleConfig, control_rx: Receiver<ControlSignal>) -> Self {
        Self {
            schedule,
            control_rx,
            state: RunState::Playing,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Runs until the simulation settles, `max_ticks` is reached or a
    /// [`ControlSignal::Terminate`] arrives.
    ///
    /// # Errors
    ///
    /// Propagates errors from ticking or resetting the simulation.
    pub fn run(&mut self, sim: &mut Simulation) -> SimResult<RunSummary> {
        let mut tick_loop = TickLoop::from_millis(self.schedule.tick_interval_ms);
        let mut ticks: u64 = 0;
        self.state = RunState::Playing;
        info!(
            pacing = ?self.schedule.pacing,
            max_ticks = self.schedule.max_ticks,
            counts = %sim.counts(),
            "run started"
        );

        loop {
            self.drain_controls(sim, &mut tick_loop)?;
            match self.state {
                RunState::Terminated => break,
                RunState::Paused => {
                    self.wait_while_paused(sim, &mut tick_loop)?;
                    continue;
                }
                _ => {}
            }

            if self.schedule.max_ticks > 0 && ticks >= self.schedule.max_ticks {
                self.state = RunState::Exhausted;
                break;
            }

            // An empty world never settles; stop instead of ticking it forever.
            if self.schedule.stop_when_settled && sim.counts().total() == 0 {
                info!("population empty");
                self.state = RunState::Exhausted;
                break;
            }

            if self.schedule.pacing == Pacing::RealTime && !tick_loop.should_tick() {
                tick_loop.wait_for_next_tick();
                continue;
            }

            let start = tick_loop.begin_tick();
            let report = sim.tick()?;
            tick_loop.end_tick(start);
            ticks += 1;

            if self.schedule.report_every > 0 && report.tick % self.schedule.report_every == 0 {
                info!(
                    tick = report.tick,
                    sim_ms = report.now.as_millis(),
                    counts = %report.counts,
                    "population report"
                );
            }

            if self.schedule.stop_when_settled {
                if let Some(kind) = report.counts.settled() {
                    self.state = RunState::Settled(kind);
                    break;
                }
            }
        }

        let summary = RunSummary {
            final_state: self.state,
            ticks,
            sim_time: sim.now(),
            counts: sim.counts(),
            stats: *tick_loop.stats(),
        };
        info!(
            state = ?summary.final_state,
            ticks,
            sim_ms = summary.sim_time.as_millis(),
            counts = %summary.counts,
            late_ticks = summary.stats.late_ticks,
            "run finished"
        );
        Ok(summary)
    }

    fn drain_controls(&mut self, sim: &mut Simulation, tick_loop: &mut TickLoop) -> SimResult<()> {
        while let Ok(signal) = self.control_rx.try_recv() {
            self.apply(signal, sim, tick_loop)?;
            if self.state == RunState::Terminated {
                break;
            }
        }
        Ok(())
    }

    fn wait_while_paused(&mut self, sim: &mut Simulation, tick_loop: &mut TickLoop) -> SimResult<()> {
        match self.control_rx.recv() {
            Ok(signal) => self.apply(signal, sim, tick_loop),
            Err(_) => {
                warn!("control channel closed while paused");
                self.state = RunState::Terminated;
                Ok(())
            }
        }
    }

    fn apply(
        &mut self,
        signal: ControlSignal,
        sim: &mut Simulation,
        tick_loop: &mut TickLoop,
    ) -> SimResult<()> {
        debug!(?signal, state = ?self.state, "control signal");
        match signal {
            ControlSignal::Pause => {
                if self.state == RunState::Playing {
                    self.state = RunState::Paused;
                    info!(tick = sim.tick_count(), "paused");
                }
            }
            ControlSignal::Resume => {
                if self.state == RunState::Paused {
                    self.state = RunState::Playing;
                    tick_loop.resync();
                    info!(tick = sim.tick_count(), "resumed");
                }
            }
            ControlSignal::Reset => sim.reset()?,
            ControlSignal::Terminate => self.state = RunState::Terminated,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn config(count: usize, max_ticks: u64) -> SimConfig {
        let mut config = SimConfig::default();
        config.population.count = count;
        config.population.seed = Some(17);
        config.schedule.pacing = Pacing::Unthrottled;
        config.schedule.max_ticks = max_ticks;
        config.schedule.report_every = 0;
        config
    }

    #[test]
    fn test_runs_to_max_ticks() {
        let config = config(30, 25);
        let mut sim = Simulation::new(&config).unwrap();
        let (mut driver, _controls) = Driver::new(config.schedule);
        // Keep the run going even if one kind wins early.
        driver.schedule.stop_when_settled = false;

        let summary = driver.run(&mut sim).unwrap();

        assert_eq!(summary.final_state, RunState::Exhausted);
        assert_eq!(summary.ticks, 25);
        assert_eq!(summary.sim_time, SimTime(25 * 30));
        assert_eq!(summary.counts.total(), 30);
        assert_eq!(summary.stats.total_ticks, 25);
    }

    #[test]
    fn test_terminate_before_first_tick() {
        let config = config(10, 0);
        let mut sim = Simulation::new(&config).unwrap();
        let (mut driver, controls) = Driver::new(config.schedule);
        controls.send(ControlSignal::Terminate).unwrap();

        let summary = driver.run(&mut sim).unwrap();

        assert_eq!(summary.final_state, RunState::Terminated);
        assert_eq!(summary.ticks, 0);
        assert!(driver.state().is_finished());
    }

    #[test]
    fn test_pause_with_closed_channel_terminates() {
        let config = config(10, 0);
        let mut sim = Simulation::new(&config).unwrap();
        let (mut driver, controls) = Driver::new(config.schedule);
        controls.send(ControlSignal::Pause).unwrap();
        drop(controls);

        let summary = driver.run(&mut sim).unwrap();
        assert_eq!(summary.final_state, RunState::Terminated);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn test_signals_applied_between_ticks() {
        let config = config(10, 5);
        let mut sim = Simulation::new(&config).unwrap();
        let (mut driver, controls) = Driver::new(config.schedule);
        driver.schedule.stop_when_settled = false;
        for signal in [ControlSignal::Pause, ControlSignal::Resume, ControlSignal::Reset] {
            controls.send(signal).unwrap();
        }

        let summary = driver.run(&mut sim).unwrap();
        assert_eq!(summary.final_state, RunState::Exhausted);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.counts.total(), 10);
    }

    #[test]
    fn test_uniform_population_settles_after_one_tick() {
        let config = config(1, 0);
        let mut sim = Simulation::new(&config).unwrap();
        let (mut driver, _controls) = Driver::new(config.schedule);

        let summary = driver.run(&mut sim).unwrap();
        assert!(matches!(summary.final_state, RunState::Settled(_)));
        assert_eq!(summary.ticks, 1);
    }

    #[test]
    fn test_empty_population_ends_run() {
        let mut config = config(0, 0);
        config.schedule.pacing = Pacing::RealTime;
        let mut sim = Simulation::new(&config).unwrap();
        let (mut driver, _controls) = Driver::new(config.schedule);

        let summary = driver.run(&mut sim).unwrap();
        assert_eq!(summary.final_state, RunState::Exhausted);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.counts.total(), 0);
        assert_eq!(summary.sim_time, SimTime::ZERO);
    }

    #[test]
    fn test_empty_population_runs_when_not_stopping_on_settle() {
        let config = config(0, 3);
        let mut sim = Simulation::new(&config).unwrap();
        let (mut driver, _controls) = Driver::new(config.schedule);
        driver.schedule.stop_when_settled = false;

        let summary = driver.run(&mut sim).unwrap();
        assert_eq!(summary.final_state, RunState::Exhausted);
        assert_eq!(summary.ticks, 3);
    }
}
