//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { livecycle_init, LiveEngine, list, chord } from './livecycle.js';
//!
//! await init();
//! livecycle_init();
//!
//! const ctx = new AudioContext();
//! const engine = new LiveEngine(mySink, ctx, myDiagnostics);
//! engine.start();
//! setInterval(() => engine.wake(), engine.lookaheadPeriodMs());
//!
//! // from evaluated user code:
//! engine.play("arp", "square", list([220, 330, 0, 440]).join(chord([110])).every(2));
//! ```
//!
//! The sink object must provide `createVoiceHandle(timbre, frequency)`,
//! `scheduleStart(handle, time)`, `scheduleStop(handle, time)` and
//! `setMasterGain(value, time)`; exceptions it throws become sink faults.
//! The clock is anything with a `currentTime` property in seconds, such as
//! an `AudioContext`.

use wasm_bindgen::prelude::*;

use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{SinkError, SinkResult};
use crate::pattern::{self, Pattern, PatternExt};
use crate::scheduler::{Scheduler, TickOutcome};
use crate::sink::{AudioSink, VoiceHandle};
use crate::voice::Timbre;

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn livecycle_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// JavaScript collaborators
// ═══════════════════════════════════════════════════════════════════════════

#[wasm_bindgen]
extern "C" {
    /// Audio backend implemented in JavaScript.
    pub type JsAudioSink;

    #[wasm_bindgen(method, catch, js_name = createVoiceHandle)]
    fn create_voice_handle(this: &JsAudioSink, timbre: &str, frequency: f64) -> Result<f64, JsValue>;

    #[wasm_bindgen(method, catch, js_name = scheduleStart)]
    fn schedule_start(this: &JsAudioSink, handle: f64, at: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = scheduleStop)]
    fn schedule_stop(this: &JsAudioSink, handle: f64, at: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setMasterGain)]
    fn set_master_gain(this: &JsAudioSink, value: f32, at: f64) -> Result<(), JsValue>;

    /// Time source, e.g. an `AudioContext`.
    pub type JsClock;

    #[wasm_bindgen(method, getter, js_name = currentTime)]
    fn current_time(this: &JsClock) -> f64;

    /// Diagnostics panel implemented in JavaScript.
    pub type JsDiagnostics;

    #[wasm_bindgen(method)]
    fn clear(this: &JsDiagnostics);

    #[wasm_bindgen(method)]
    fn print(this: &JsDiagnostics, text: &str);

    #[wasm_bindgen(method, js_name = printError)]
    fn print_error(this: &JsDiagnostics, text: &str);
}

fn js_error_text(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

struct WebSink(JsAudioSink);

impl AudioSink for WebSink {
    fn create_voice_handle(&mut self, timbre: &Timbre, frequency: f64) -> SinkResult<VoiceHandle> {
        let handle = self
            .0
            .create_voice_handle(&timbre.to_string(), frequency)
            .map_err(|e| SinkError::Rejected(js_error_text(e)))?;
        Ok(VoiceHandle(handle as u64))
    }

    fn schedule_start(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()> {
        self.0
            .schedule_start(handle.0 as f64, at)
            .map_err(|e| SinkError::Rejected(js_error_text(e)))
    }

    fn schedule_stop(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()> {
        self.0
            .schedule_stop(handle.0 as f64, at)
            .map_err(|e| SinkError::Rejected(js_error_text(e)))
    }

    fn set_master_gain(&mut self, value: f32, at: f64) -> SinkResult<()> {
        self.0
            .set_master_gain(value, at)
            .map_err(|e| SinkError::Rejected(js_error_text(e)))
    }
}

struct WebClock(JsClock);

impl Clock for WebClock {
    fn now(&self) -> f64 {
        self.0.current_time()
    }
}

struct WebDiagnostics(JsDiagnostics);

impl Diagnostics for WebDiagnostics {
    fn clear(&mut self) {
        self.0.clear();
    }

    fn print(&mut self, text: &str) {
        self.0.print(text);
    }

    fn print_error(&mut self, text: &str) {
        self.0.print_error(text);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Patterns
// ═══════════════════════════════════════════════════════════════════════════

/// A pattern built from JavaScript. Combinators return new patterns and
/// leave their operands untouched.
#[wasm_bindgen]
pub struct LivePattern {
    inner: Box<dyn Pattern>,
}

impl LivePattern {
    fn wrap(pattern: impl Pattern + 'static) -> LivePattern {
        LivePattern {
            inner: pattern.boxed(),
        }
    }
}

/// Equally spaced notes; values <= 0 are rests.
#[wasm_bindgen]
pub fn list(frequencies: Vec<f64>) -> LivePattern {
    LivePattern::wrap(pattern::list(frequencies))
}

/// Simultaneous notes for the whole cycle.
#[wasm_bindgen]
pub fn chord(frequencies: Vec<f64>) -> LivePattern {
    LivePattern::wrap(pattern::chord(frequencies))
}

#[wasm_bindgen]
impl LivePattern {
    pub fn join(&self, other: &LivePattern) -> LivePattern {
        LivePattern::wrap(self.inner.clone().join(other.inner.clone()))
    }

    pub fn times(&self, n: i32) -> LivePattern {
        LivePattern::wrap(self.inner.clone().times(n as i64))
    }

    pub fn divide(&self, n: i32) -> LivePattern {
        LivePattern::wrap(self.inner.clone().divide(n as i64))
    }

    pub fn every(&self, n: i32) -> LivePattern {
        LivePattern::wrap(self.inner.clone().every(n as i64))
    }

    #[wasm_bindgen(js_name = chooseRand)]
    pub fn choose_rand(&self) -> LivePattern {
        LivePattern::wrap(self.inner.clone().choose_rand())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════════════════════════════════════

/// The scheduler as seen from the embedding page.
///
/// The page drives the loop: call `wake()` every `lookaheadPeriodMs()`.
#[wasm_bindgen]
pub struct LiveEngine {
    scheduler: Scheduler,
}

#[wasm_bindgen]
impl LiveEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(sink: JsAudioSink, clock: JsClock, diagnostics: JsDiagnostics) -> LiveEngine {
        LiveEngine {
            scheduler: Scheduler::new(
                SchedulerConfig::default(),
                Box::new(WebClock(clock)),
                Box::new(WebSink(sink)),
                Box::new(WebDiagnostics(diagnostics)),
            ),
        }
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }

    /// One wake-up; the page's interval timer is the recurring task.
    /// Returns `true` when a cycle was materialized.
    pub fn wake(&mut self) -> bool {
        if !self.scheduler.is_running() {
            return false;
        }
        matches!(self.scheduler.wake(), TickOutcome::Scheduled { .. })
    }

    #[wasm_bindgen(js_name = lookaheadPeriodMs)]
    pub fn lookahead_period_ms(&self) -> u32 {
        self.scheduler.config().lookahead_period.as_millis() as u32
    }

    pub fn play(&mut self, id: &str, timbre: &str, pattern: &LivePattern) -> Result<(), JsError> {
        self.scheduler
            .play(id, timbre, pattern.inner.clone())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setCyclesPerSecond)]
    pub fn set_cycles_per_second(&mut self, value: f64) -> Result<(), JsError> {
        self.scheduler
            .set_cycles_per_second(value)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn stop(&mut self) -> Result<(), JsError> {
        self.scheduler.stop().map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn mute(&mut self) -> Result<(), JsError> {
        self.scheduler.mute().map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn unmute(&mut self) -> Result<(), JsError> {
        self.scheduler.unmute().map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = voiceCount)]
    pub fn voice_count(&self) -> u32 {
        self.scheduler.registry().len() as u32
    }
}
