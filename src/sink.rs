// src/sink.rs
//
// Boundary to the sound-producing backend.
//
// The scheduler treats every call as fire-and-forget: it hands off absolute
// start/stop times and moves on without waiting for audio to happen.

use crate::error::SinkResult;
use crate::voice::Timbre;

/// Backend-assigned identifier for one triggered sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceHandle(pub u64);

/// Sound-producing backend.
pub trait AudioSink {
    /// Prepare one sound of the given timbre and frequency.
    fn create_voice_handle(&mut self, timbre: &Timbre, frequency: f64) -> SinkResult<VoiceHandle>;

    /// Start the sound at absolute time `at` (seconds).
    fn schedule_start(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()>;

    /// Stop the sound at absolute time `at` (seconds).
    fn schedule_stop(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()>;

    /// Set the master output gain, applied instantly at `at`.
    fn set_master_gain(&mut self, value: f32, at: f64) -> SinkResult<()>;
}

/// Sink that only logs what it would play.
///
/// Used by the demo binary; handy when no audio backend is attached.
#[derive(Debug)]
pub struct LogSink {
    next_handle: u64,
    gain: f32,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            next_handle: 0,
            gain: 1.0,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for LogSink {
    fn create_voice_handle(&mut self, timbre: &Timbre, frequency: f64) -> SinkResult<VoiceHandle> {
        let handle = VoiceHandle(self.next_handle);
        self.next_handle += 1;
        log::info!("voice #{}: {} @ {:.2} Hz", handle.0, timbre, frequency);
        Ok(handle)
    }

    fn schedule_start(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()> {
        log::info!("voice #{}: start at {:.3}s", handle.0, at);
        Ok(())
    }

    fn schedule_stop(&mut self, handle: VoiceHandle, at: f64) -> SinkResult<()> {
        log::debug!("voice #{}: stop at {:.3}s", handle.0, at);
        Ok(())
    }

    fn set_master_gain(&mut self, value: f32, at: f64) -> SinkResult<()> {
        self.gain = value;
        log::info!("master gain {} at {:.3}s", value, at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sink_hands_out_fresh_handles() {
        let mut sink = LogSink::new();
        let a = sink.create_voice_handle(&Timbre::Sine, 440.0).unwrap();
        let b = sink.create_voice_handle(&Timbre::Sine, 220.0).unwrap();
        assert_ne!(a, b);

        sink.set_master_gain(0.0, 1.0).unwrap();
        assert_eq!(sink.gain(), 0.0);
    }
}
