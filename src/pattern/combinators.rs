// src/pattern/combinators.rs
//
// Combinator patterns.
//
// Combinators own their children. `Divide` and `EveryN` carry a cycle
// counter that advances once per `next_cycle` call.

use super::{Pattern, clamp_factor, compress};
use crate::error::{PatternError, PatternResult};
use crate::note::{Note, Span};
use crate::random::RandomSource;

// ═══════════════════════════════════════════════════════════════════
// RandomChoice
// ═══════════════════════════════════════════════════════════════════

/// Emits one uniformly chosen note of the child, stretched over the cycle.
#[derive(Debug, Clone)]
pub struct RandomChoice {
    pattern: Box<dyn Pattern>,
    random: Box<dyn RandomSource>,
}

impl RandomChoice {
    pub fn new(pattern: Box<dyn Pattern>, random: Box<dyn RandomSource>) -> Self {
        Self { pattern, random }
    }
}

impl Pattern for RandomChoice {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        let notes = self.pattern.next_cycle()?;
        if notes.is_empty() {
            return Ok(notes);
        }

        let index = self.random.uniform_index(notes.len());
        let chosen = notes
            .get(index)
            .ok_or(PatternError::RandomIndexOutOfRange {
                index,
                len: notes.len(),
            })?;

        Ok(vec![Note::new(chosen.frequency, 0.0, 1.0)])
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Join
// ═══════════════════════════════════════════════════════════════════

/// Plays two patterns back to back within one cycle.
///
/// The cycle is split proportionally to each side's note count. When one
/// side is silent the other is returned as is.
#[derive(Debug, Clone)]
pub struct Join {
    first: Box<dyn Pattern>,
    second: Box<dyn Pattern>,
}

impl Join {
    pub fn new(first: Box<dyn Pattern>, second: Box<dyn Pattern>) -> Self {
        Self { first, second }
    }
}

impl Pattern for Join {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        let first = self.first.next_cycle()?;
        let second = self.second.next_cycle()?;

        if first.is_empty() {
            return Ok(second);
        }
        if second.is_empty() {
            return Ok(first);
        }

        let split = first.len() as f64 / (first.len() + second.len()) as f64;

        let mut out = Vec::with_capacity(first.len() + second.len());
        out.extend(compress(first, Span::new(0.0, split)));
        out.extend(compress(second, Span::new(split, 1.0)));
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Multiply
// ═══════════════════════════════════════════════════════════════════

/// Repeats a pattern `factor` times per cycle.
///
/// The child is evaluated once per repetition, so stateful children advance
/// `factor` times per cycle.
#[derive(Debug, Clone)]
pub struct Multiply {
    pattern: Box<dyn Pattern>,
    factor: usize,
}

impl Multiply {
    /// `factor <= 0` is treated as 1.
    pub fn new(pattern: Box<dyn Pattern>, factor: i64) -> Self {
        Self {
            pattern,
            factor: clamp_factor(factor),
        }
    }

    pub fn factor(&self) -> usize {
        self.factor
    }
}

impl Pattern for Multiply {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        let mut out = Vec::new();
        for i in 0..self.factor {
            let notes = self.pattern.next_cycle()?;
            out.extend(compress(notes, Span::slice(i, self.factor)));
        }
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Divide
// ═══════════════════════════════════════════════════════════════════

/// Stretches a pattern across `factor` cycles.
///
/// The child is evaluated once when the counter is at zero; each call then
/// plays the notes starting inside the current `1/factor` window, scaled up
/// to the full cycle.
#[derive(Debug, Clone)]
pub struct Divide {
    pattern: Box<dyn Pattern>,
    factor: usize,
    counter: usize,
    cached: Vec<Note>,
}

impl Divide {
    /// `factor <= 0` is treated as 1.
    pub fn new(pattern: Box<dyn Pattern>, factor: i64) -> Self {
        Self {
            pattern,
            factor: clamp_factor(factor),
            counter: 0,
            cached: Vec::new(),
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }
}

impl Pattern for Divide {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        if self.counter == 0 {
            self.cached = self.pattern.next_cycle()?;
        }

        let window = Span::slice(self.counter, self.factor);
        let out = self
            .cached
            .iter()
            .filter(|note| window.contains(note.start))
            .map(|note| note.remapped(window, Span::CYCLE))
            .collect();

        self.counter = (self.counter + 1) % self.factor;
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════
// EveryN
// ═══════════════════════════════════════════════════════════════════

/// Plays the child on the last of every `factor` cycles, silence otherwise.
///
/// The child is only evaluated on the cycles it plays.
#[derive(Debug, Clone)]
pub struct EveryN {
    pattern: Box<dyn Pattern>,
    factor: usize,
    counter: usize,
}

impl EveryN {
    /// `factor <= 0` is treated as 1.
    pub fn new(pattern: Box<dyn Pattern>, factor: i64) -> Self {
        Self {
            pattern,
            factor: clamp_factor(factor),
            counter: 0,
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }
}

impl Pattern for EveryN {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        let playing = self.counter == self.factor - 1;
        self.counter = (self.counter + 1) % self.factor;

        if playing {
            self.pattern.next_cycle()
        } else {
            Ok(Vec::new())
        }
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        Box::new(self.clone())
    }
}
