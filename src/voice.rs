// src/voice.rs

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::PatternResult;
use crate::note::Note;
use crate::pattern::Pattern;

pub type VoiceId = String;

/// Sound descriptor handed to the audio sink.
///
/// The engine never interprets it; sinks may reject timbres they cannot
/// render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timbre {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Custom(String),
}

impl FromStr for Timbre {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "sine" => Timbre::Sine,
            "square" => Timbre::Square,
            "sawtooth" | "saw" => Timbre::Sawtooth,
            "triangle" => Timbre::Triangle,
            _ => Timbre::Custom(s.to_string()),
        })
    }
}

impl From<&str> for Timbre {
    fn from(s: &str) -> Self {
        match s.parse::<Timbre>() {
            Ok(timbre) => timbre,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Timbre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timbre::Sine => f.write_str("sine"),
            Timbre::Square => f.write_str("square"),
            Timbre::Sawtooth => f.write_str("sawtooth"),
            Timbre::Triangle => f.write_str("triangle"),
            Timbre::Custom(name) => f.write_str(name),
        }
    }
}

/// A named (timbre, pattern) pair scheduled independently of other voices.
///
/// Cloning a voice shares its pattern: the registry's rollback snapshot and
/// the live map see the same pattern state.
#[derive(Debug, Clone)]
pub struct Voice {
    pub id: VoiceId,
    pub timbre: Timbre,
    pattern: Rc<RefCell<Box<dyn Pattern>>>,
}

impl Voice {
    pub fn new(id: impl Into<VoiceId>, timbre: Timbre, pattern: Box<dyn Pattern>) -> Self {
        Self {
            id: id.into(),
            timbre,
            pattern: Rc::new(RefCell::new(pattern)),
        }
    }

    /// Advance this voice's pattern by one cycle.
    pub fn next_cycle(&self) -> PatternResult<Vec<Note>> {
        self.pattern.borrow_mut().next_cycle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{PatternExt, list};

    #[test]
    fn test_timbre_parsing() {
        assert_eq!(Timbre::from("Sine"), Timbre::Sine);
        assert_eq!(Timbre::from("saw"), Timbre::Sawtooth);
        assert_eq!(Timbre::from("fm-bell"), Timbre::Custom("fm-bell".into()));
        assert_eq!(Timbre::Triangle.to_string(), "triangle");
    }

    #[test]
    fn test_voice_clones_share_pattern_state() {
        let voice = Voice::new("hat", Timbre::Square, list(vec![1.0]).every(2).boxed());
        let snapshot = voice.clone();

        assert!(voice.next_cycle().unwrap().is_empty());
        // shared counter: the snapshot continues where the live voice left off
        assert_eq!(snapshot.next_cycle().unwrap().len(), 1);
    }
}
