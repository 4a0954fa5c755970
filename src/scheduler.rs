// src/scheduler.rs

use std::time::Duration;

use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{EngineError, EngineResult, SinkResult};
use crate::pattern::Pattern;
use crate::registry::VoiceRegistry;
use crate::sink::AudioSink;
use crate::timer::{CancelHandle, RecurringTask};
use crate::voice::{Timbre, Voice};

/// Result of one scheduler wake-up.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The next cycle is still beyond the schedule-ahead window.
    Idle,

    /// A cycle was materialized and `triggers` notes were handed to the sink.
    Scheduled { cycle_start: f64, triggers: usize },

    /// Materializing failed; the voice set was rolled back. Triggers sent
    /// before the fault stay sent.
    Faulted { cycle_start: f64, error: EngineError },
}

/// Lookahead scheduler.
///
/// Wakes up every `lookahead_period`, and once the next cycle starts within
/// `schedule_ahead` seconds, asks every voice for one cycle of notes and
/// hands them to the audio sink with absolute start/stop times.
///
/// Single-threaded: `play` and friends take `&mut self` and are visible to
/// the next wake-up. No fault stops the loop.
pub struct Scheduler {
    config: SchedulerConfig,

    /// Current tempo; read when a cycle is advanced.
    cycles_per_second: f64,

    /// Absolute start of the first cycle not yet materialized.
    next_cycle_start_time: f64,

    registry: VoiceRegistry,

    /// Present once started.
    task: Option<RecurringTask>,

    clock: Box<dyn Clock>,
    sink: Box<dyn AudioSink>,
    diagnostics: Box<dyn Diagnostics>,
}

impl Scheduler {
    pub fn new(
        config: SchedulerConfig,
        clock: Box<dyn Clock>,
        sink: Box<dyn AudioSink>,
        diagnostics: Box<dyn Diagnostics>,
    ) -> Self {
        let next_cycle_start_time = clock.now() + config.start_delay;
        Self {
            cycles_per_second: config.cycles_per_second,
            config,
            next_cycle_start_time,
            registry: VoiceRegistry::new(),
            task: None,
            clock,
            sink,
            diagnostics,
        }
    }

    // -------------------------------
    // MARK: Loop control
    // -------------------------------

    /// Arm the loop: the first cycle starts `start_delay` from now.
    ///
    /// Calling it again while running returns the existing handle.
    pub fn start(&mut self) -> CancelHandle {
        if let Some(task) = self.task.as_ref().filter(|t| !t.is_cancelled()) {
            return task.cancel_handle();
        }

        let now = self.clock.now();
        self.next_cycle_start_time = now + self.config.start_delay;
        let task = RecurringTask::new(self.config.lookahead_period, now);
        let handle = task.cancel_handle();
        self.task = Some(task);

        log::info!(
            "scheduler started, first cycle at {:.3}s ({} cycles/s)",
            self.next_cycle_start_time,
            self.cycles_per_second
        );
        handle
    }

    /// Cancel the recurring wake-up. Voices are left untouched.
    pub fn shutdown(&mut self) {
        if let Some(task) = &self.task {
            task.cancel_handle().cancel();
            log::info!("scheduler shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Wake up if the recurring task is due at the clock's current time.
    ///
    /// Returns `None` when not started, cancelled, or not yet due.
    pub fn poll(&mut self) -> Option<TickOutcome> {
        let now = self.clock.now();
        let task = self.task.as_mut()?;
        if task.fire_if_due(now) {
            Some(self.wake())
        } else {
            None
        }
    }

    /// Drive the loop on the calling thread until cancelled.
    ///
    /// Sleeps between wake-ups, so it needs a clock that advances by itself.
    pub fn run(&mut self) {
        self.drive(None);
    }

    /// Drive the loop until the clock reaches `deadline` or the loop is
    /// cancelled.
    pub fn run_until(&mut self, deadline: f64) {
        self.drive(Some(deadline));
    }

    fn drive(&mut self, deadline: Option<f64>) {
        if !self.is_running() {
            self.start();
        }

        while self.is_running() {
            let now = self.clock.now();
            if deadline.is_some_and(|d| now >= d) {
                break;
            }

            self.poll();

            let Some(next_wake) = self.task.as_ref().map(RecurringTask::next_wake) else {
                break;
            };
            let mut wait = next_wake - self.clock.now();
            if let Some(d) = deadline {
                wait = wait.min(d - self.clock.now());
            }
            if wait > 0.0 {
                std::thread::sleep(Duration::from_secs_f64(wait));
            }
        }
    }

    // -------------------------------
    // MARK: Wake-up
    // -------------------------------

    /// One wake-up of the loop.
    ///
    /// Materializes at most one cycle. On a fault the remaining voices are
    /// skipped, the error is reported and the voice set is rolled back to the
    /// last snapshot. Either way the batch of `play` calls is closed.
    pub fn wake(&mut self) -> TickOutcome {
        let now = self.clock.now();
        if self.next_cycle_start_time - now > self.config.schedule_ahead {
            return TickOutcome::Idle;
        }

        let cycle_start = self.next_cycle_start_time;
        let cycle_length = 1.0 / self.cycles_per_second;
        self.next_cycle_start_time += cycle_length;

        let outcome = match self.materialize(cycle_start, cycle_length) {
            Ok(triggers) => {
                log::debug!(
                    "cycle at {:.3}s: {} triggers from {} voices",
                    cycle_start,
                    triggers,
                    self.registry.len()
                );
                TickOutcome::Scheduled {
                    cycle_start,
                    triggers,
                }
            }
            Err(error) => {
                log::error!("cycle at {:.3}s aborted: {}", cycle_start, error);
                self.diagnostics.print_error(&error.to_string());
                if self.registry.restore() {
                    log::warn!("rolled back to {} voices", self.registry.len());
                }
                TickOutcome::Faulted { cycle_start, error }
            }
        };

        self.registry.flush();
        outcome
    }

    /// Pull one cycle from every voice and trigger its non-rest notes.
    fn materialize(&mut self, cycle_start: f64, cycle_length: f64) -> EngineResult<usize> {
        let mut voices = self.registry.voices();
        voices.sort_by(|a, b| a.id.cmp(&b.id));

        let mut triggers = 0;
        for voice in &voices {
            let notes = voice.next_cycle().map_err(|source| EngineError::Pattern {
                voice: voice.id.clone(),
                source,
            })?;

            for note in notes.iter().filter(|n| !n.is_rest()) {
                let start = cycle_start + note.start * cycle_length;
                let duration = note.duration * cycle_length;

                self.trigger(&voice.timbre, note.frequency, start, duration)
                    .map_err(|source| EngineError::Sink {
                        voice: voice.id.clone(),
                        source,
                    })?;
                triggers += 1;
            }
        }
        Ok(triggers)
    }

    #[inline]
    fn trigger(&mut self, timbre: &Timbre, frequency: f64, start: f64, duration: f64) -> SinkResult<()> {
        let handle = self.sink.create_voice_handle(timbre, frequency)?;
        self.sink.schedule_start(handle, start)?;
        self.sink.schedule_stop(handle, start + duration)
    }

    // -------------------------------
    // MARK: Live-coding surface
    // -------------------------------

    /// Add or replace the voice `id`, unmuting the output first.
    ///
    /// Takes effect at the next materialized cycle.
    pub fn play(
        &mut self,
        id: impl Into<String>,
        timbre: impl Into<Timbre>,
        pattern: impl Pattern + 'static,
    ) -> EngineResult<()> {
        self.unmute()?;

        let voice = Voice::new(id, timbre.into(), Box::new(pattern));
        log::info!("play '{}' ({})", voice.id, voice.timbre);
        self.registry.play(voice);

        self.report_voices();
        Ok(())
    }

    /// Mute the output and remove every voice. The loop keeps running.
    ///
    /// Sounds already handed to the sink play out.
    pub fn stop(&mut self) -> EngineResult<()> {
        let muted = self.mute();
        self.registry.clear();
        log::info!("stopped all voices");
        muted
    }

    /// Change the tempo from the next cycle advance on.
    pub fn set_cycles_per_second(&mut self, cycles_per_second: f64) -> EngineResult<()> {
        if !cycles_per_second.is_finite() || cycles_per_second <= 0.0 {
            log::warn!("ignoring tempo {}", cycles_per_second);
            return Err(EngineError::InvalidTempo(cycles_per_second));
        }
        log::info!("tempo {} cycles/s", cycles_per_second);
        self.cycles_per_second = cycles_per_second;
        Ok(())
    }

    pub fn mute(&mut self) -> EngineResult<()> {
        let now = self.clock.now();
        self.sink.set_master_gain(0.0, now).map_err(EngineError::Gain)
    }

    pub fn unmute(&mut self) -> EngineResult<()> {
        let now = self.clock.now();
        self.sink.set_master_gain(1.0, now).map_err(EngineError::Gain)
    }

    fn report_voices(&mut self) {
        self.diagnostics.clear();
        for line in self.registry.summary() {
            self.diagnostics.print(&line);
        }
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    #[inline]
    pub fn cycles_per_second(&self) -> f64 {
        self.cycles_per_second
    }

    #[inline]
    pub fn next_cycle_start_time(&self) -> f64 {
        self.next_cycle_start_time
    }

    pub fn registry(&self) -> &VoiceRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}
