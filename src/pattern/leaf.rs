// src/pattern/leaf.rs
//
// Leaf patterns: static frequency data, no hidden state.

use super::Pattern;
use crate::error::{PatternError, PatternResult};
use crate::note::Note;

fn check_finite(frequencies: &[f64]) -> PatternResult<()> {
    match frequencies.iter().position(|f| !f.is_finite()) {
        Some(index) => Err(PatternError::NonFiniteFrequency {
            index,
            value: frequencies[index],
        }),
        None => Ok(()),
    }
}

/// N notes spaced equally across the cycle, in input order.
///
/// Rests are emitted like any other note.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    frequencies: Vec<f64>,
}

impl List {
    pub fn new(frequencies: impl Into<Vec<f64>>) -> Self {
        Self {
            frequencies: frequencies.into(),
        }
    }
}

impl Pattern for List {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        check_finite(&self.frequencies)?;

        let count = self.frequencies.len();
        let duration = 1.0 / count as f64;
        Ok(self
            .frequencies
            .iter()
            .enumerate()
            .map(|(i, &freq)| Note::new(freq, i as f64 * duration, duration))
            .collect())
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}

/// All notes start together and last the whole cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    frequencies: Vec<f64>,
}

impl Chord {
    pub fn new(frequencies: impl Into<Vec<f64>>) -> Self {
        Self {
            frequencies: frequencies.into(),
        }
    }
}

impl Pattern for Chord {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        check_finite(&self.frequencies)?;

        Ok(self
            .frequencies
            .iter()
            .map(|&freq| Note::new(freq, 0.0, 1.0))
            .collect())
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}
