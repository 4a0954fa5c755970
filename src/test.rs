// src/test.rs
//
// Test doubles and end-to-end scenarios driven by a manual clock.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clock::{Clock, ManualClock};
use crate::config::SchedulerConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{PatternError, PatternResult, SinkError, SinkResult};
use crate::note::Note;
use crate::pattern::Pattern;
use crate::scheduler::Scheduler;
use crate::sink::{AudioSink, VoiceHandle};
use crate::voice::Timbre;

// ═══════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════

/// One note handed to the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub timbre: Timbre,
    pub frequency: f64,
    pub start: f64,
    pub stop: f64,
}

#[derive(Debug, Default)]
struct SinkLog {
    triggers: Vec<Trigger>,
    gains: Vec<f32>,
}

/// Records trigger requests. Rejects `Timbre::Custom` like a backend
/// without sample support would.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
}

impl RecordingSink {
    pub fn triggers(&self) -> Vec<Trigger> {
        self.log.borrow().triggers.clone()
    }

    pub fn gains(&self) -> Vec<f32> {
        self.log.borrow().gains.clone()
    }
}

impl AudioSink for RecordingSink {
    fn create_voice_handle(&mut self, timbre: &Timbre, frequency: f64) -> SinkResult<VoiceHandle> {
        if let Timbre::Custom(name) = timbre {
            return Err(SinkError::UnsupportedTimbre(name.clone()));
        }
        let mut log = self.log.borrow_mut();
        log.triggers.push(Trigger {
            timbre: timbre.clone(),
            frequency,
            start: f64::NAN,
            stop: f64::NAN,
        });
        Ok(VoiceHandle(log.triggers.len() as u64 - 1))
    }

    fn schedule_start(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()> {
        match self.log.borrow_mut().triggers.get_mut(handle.0 as usize) {
            Some(trigger) => {
                trigger.start = at;
                Ok(())
            }
            None => Err(SinkError::Rejected(format!("unknown handle {}", handle.0))),
        }
    }

    fn schedule_stop(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()> {
        match self.log.borrow_mut().triggers.get_mut(handle.0 as usize) {
            Some(trigger) => {
                trigger.stop = at;
                Ok(())
            }
            None => Err(SinkError::Rejected(format!("unknown handle {}", handle.0))),
        }
    }

    fn set_master_gain(&mut self, value: f32, _at: f64) -> SinkResult<()> {
        self.log.borrow_mut().gains.push(value);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct DiagnosticsLog {
    lines: Vec<String>,
    errors: Vec<String>,
}

/// Keeps what would be on screen: `clear` empties the status lines but
/// errors are kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    log: Rc<RefCell<DiagnosticsLog>>,
}

impl RecordingDiagnostics {
    pub fn lines(&self) -> Vec<String> {
        self.log.borrow().lines.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.log.borrow().errors.clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn clear(&mut self) {
        self.log.borrow_mut().lines.clear();
    }

    fn print(&mut self, text: &str) {
        self.log.borrow_mut().lines.push(text.to_string());
    }

    fn print_error(&mut self, text: &str) {
        self.log.borrow_mut().errors.push(text.to_string());
    }
}

/// Fails on every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FailingPattern;

impl Pattern for FailingPattern {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        Err(PatternError::Custom("broken pattern".into()))
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(*self)
    }
}

/// Plays a single 220 Hz note for `remaining` cycles, then fails.
#[derive(Debug, Clone)]
pub struct FailsAfter {
    remaining: usize,
}

impl FailsAfter {
    pub fn new(remaining: usize) -> Self {
        Self { remaining }
    }
}

impl Pattern for FailsAfter {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        if self.remaining == 0 {
            return Err(PatternError::Custom("pattern wore out".into()));
        }
        self.remaining -= 1;
        Ok(vec![Note::new(220.0, 0.0, 1.0)])
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}

/// Scheduler wired to recording doubles and a manual clock.
pub struct Harness {
    pub scheduler: Scheduler,
    pub clock: ManualClock,
    pub sink: RecordingSink,
    pub diagnostics: RecordingDiagnostics,
}

impl Harness {
    pub fn new(config: SchedulerConfig) -> Self {
        let clock = ManualClock::new(0.0);
        let sink = RecordingSink::default();
        let diagnostics = RecordingDiagnostics::default();
        let scheduler = Scheduler::new(
            config,
            Box::new(clock.clone()),
            Box::new(sink.clone()),
            Box::new(diagnostics.clone()),
        );
        Self {
            scheduler,
            clock,
            sink,
            diagnostics,
        }
    }

    /// Default config, started at t = 0 (first cycle at 0.5s).
    pub fn started() -> Self {
        let mut harness = Self::new(SchedulerConfig::default());
        harness.scheduler.start();
        harness
    }

    /// Poll every millisecond up to `until`.
    pub fn run_to(&mut self, until: f64) {
        let mut now = self.clock.now();
        while now < until {
            now = (now + 0.001).min(until);
            self.clock.set(now);
            self.scheduler.poll();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// End-to-end scenarios
// ═══════════════════════════════════════════════════════════════════

mod scenarios {
    use super::*;
    use crate::pattern::{PatternExt, chord, list};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_live_session_hot_swap() {
        let mut h = Harness::started();
        h.scheduler.play("drone", "sine", chord(vec![110.0, 165.0])).unwrap();
        h.run_to(1.0);

        // first cycle: both chord notes for the whole cycle
        let triggers = h.sink.triggers();
        assert_eq!(triggers.len(), 2);
        assert!(triggers.iter().all(|t| approx(t.start, 0.5) && approx(t.stop, 1.5)));

        // swap the drone out mid-cycle; the swap lands on the next cycle
        h.scheduler.play("drone", "triangle", list(vec![220.0, 0.0])).unwrap();
        h.run_to(2.0);

        let triggers = h.sink.triggers();
        assert_eq!(triggers.len(), 3);
        assert_eq!(triggers[2].timbre, Timbre::Triangle);
        assert!(approx(triggers[2].start, 1.5));
        assert!(approx(triggers[2].stop, 2.0));
    }

    #[test]
    fn test_stateful_voices_stay_in_step() {
        let mut h = Harness::started();
        h.scheduler.play("kick", "sine", list(vec![60.0]).every(2)).unwrap();
        h.scheduler
            .play("pad", "square", list(vec![300.0, 400.0]).divide(2))
            .unwrap();
        h.run_to(4.0);

        // cycles at 0.5, 1.5, 2.5, 3.5
        let triggers = h.sink.triggers();
        let kicks: Vec<f64> = triggers
            .iter()
            .filter(|t| t.frequency == 60.0)
            .map(|t| t.start)
            .collect();
        assert_eq!(kicks.len(), 2);
        assert!(approx(kicks[0], 1.5));
        assert!(approx(kicks[1], 3.5));

        let pads: Vec<(f64, f64)> = triggers
            .iter()
            .filter(|t| t.timbre == Timbre::Square)
            .map(|t| (t.frequency, t.start))
            .collect();
        assert_eq!(pads.len(), 4);
        assert_eq!(pads[0].0, 300.0);
        assert_eq!(pads[1].0, 400.0);
        assert_eq!(pads[2].0, 300.0);
        assert!(approx(pads[1].1, 1.5));
    }

    #[test]
    fn test_broken_voice_never_silences_others() {
        let mut h = Harness::started();
        h.scheduler.play("a", "sine", list(vec![440.0, 660.0])).unwrap();
        h.run_to(1.0);

        h.scheduler.play("b", "sine", FailingPattern).unwrap();
        h.run_to(5.0);

        // 'a' sounded on every cycle (0.5 .. 4.5)
        let a_starts: Vec<f64> = h
            .sink
            .triggers()
            .iter()
            .filter(|t| t.frequency == 440.0)
            .map(|t| t.start)
            .collect();
        assert_eq!(a_starts.len(), 5);
        assert_eq!(h.diagnostics.errors().len(), 1);
        assert!(!h.scheduler.registry().contains("b"));
    }

    #[test]
    fn test_voice_breaking_later_is_dropped() {
        let mut h = Harness::started();
        h.scheduler.play("z", "sine", list(vec![440.0])).unwrap();
        h.run_to(1.0);

        // sorts before 'z', plays twice and then breaks on its own
        h.scheduler.play("a", "square", FailsAfter::new(2)).unwrap();
        h.run_to(7.0);

        // cycles 0.5 .. 6.5; the one at 3.5 aborted before reaching 'z'
        let z_starts: Vec<f64> = h
            .sink
            .triggers()
            .iter()
            .filter(|t| t.frequency == 440.0)
            .map(|t| t.start)
            .collect();
        assert_eq!(z_starts.len(), 6);
        assert!(z_starts.iter().all(|s| !approx(*s, 3.5)));

        let a_count = h.sink.triggers().iter().filter(|t| t.frequency == 220.0).count();
        assert_eq!(a_count, 2);
        assert!(!h.scheduler.registry().contains("a"));
        assert_eq!(h.diagnostics.errors().len(), 1);
    }

    #[test]
    fn test_tempo_change_mid_stream() {
        let mut h = Harness::started();
        h.scheduler.play("a", "sine", list(vec![440.0])).unwrap();
        h.run_to(1.0);

        h.scheduler.set_cycles_per_second(2.0).unwrap();
        h.run_to(3.0);

        let starts: Vec<f64> = h.sink.triggers().iter().map(|t| t.start).collect();
        // 0.5 at 1 c/s, then 1.5 (already pending), 2.0, 2.5, 3.0
        assert_eq!(starts.len(), 5);
        for (got, want) in starts.iter().zip([0.5, 1.5, 2.0, 2.5, 3.0]) {
            assert!(approx(*got, want), "{} != {}", got, want);
        }
    }

    #[test]
    fn test_stop_then_play_again() {
        let mut h = Harness::started();
        h.scheduler.play("a", "sine", list(vec![440.0])).unwrap();
        h.run_to(1.0);
        h.scheduler.stop().unwrap();
        h.run_to(2.0);
        assert_eq!(h.sink.triggers().len(), 1);

        h.scheduler.play("b", "sine", list(vec![880.0])).unwrap();
        h.run_to(3.0);
        assert_eq!(h.sink.triggers().len(), 2);
        assert_eq!(h.sink.gains(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_random_choice_voice() {
        use crate::random::ScriptedRandom;

        let mut h = Harness::started();
        let pattern = list(vec![100.0, 200.0, 300.0]).choose_rand_with(ScriptedRandom::new(vec![1, 2]));
        h.scheduler.play("r", "sine", pattern).unwrap();
        h.run_to(2.0);

        let freqs: Vec<f64> = h.sink.triggers().iter().map(|t| t.frequency).collect();
        assert_eq!(freqs, vec![200.0, 300.0]);
        assert!(h.sink.triggers().iter().all(|t| approx(t.stop - t.start, 1.0)));
    }
}
