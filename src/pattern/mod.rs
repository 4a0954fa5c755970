// src/pattern/mod.rs
//
// Rhythmic pattern algebra.
//
// A pattern is a tree: leaves hold frequency lists, combinators wrap one or
// two child patterns and transform or compose their notes. The scheduler
// asks each voice's pattern for exactly one cycle of notes per tick.

mod combinators;
mod leaf;

pub use combinators::{Divide, EveryN, Join, Multiply, RandomChoice};
pub use leaf::{Chord, List};

use std::fmt::Debug;

use crate::error::PatternResult;
use crate::note::{Note, Span};
use crate::random::{RandomSource, Rng};

/// Core pattern trait.
///
/// Patterns:
/// - produce the notes of the NEXT cycle on every call
/// - may carry hidden state advanced by each call (`Divide`, `EveryN`)
/// - never mutate notes received from a child; they emit remapped copies
///
/// Call `next_cycle` exactly once per intended cycle, otherwise stateful
/// nodes fall out of step with the clock.
pub trait Pattern: Debug {
    /// Notes for the next cycle, ordered as produced.
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>>;

    /// Deep copy, including any hidden state.
    fn clone_box(&self) -> Box<dyn Pattern>;
}

impl Clone for Box<dyn Pattern> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl Pattern for Box<dyn Pattern> {
    fn next_cycle(&mut self) -> PatternResult<Vec<Note>> {
        (**self).next_cycle()
    }

    fn clone_box(&self) -> Box<dyn Pattern> {
        (**self).clone_box()
    }
}

/// Equally spaced notes within one cycle. Non-positive values are rests.
pub fn list(frequencies: impl Into<Vec<f64>>) -> List {
    List::new(frequencies)
}

/// Simultaneous notes lasting the whole cycle.
pub fn chord(frequencies: impl Into<Vec<f64>>) -> Chord {
    Chord::new(frequencies)
}

/// Chainable combinators available on every pattern.
///
/// Each method consumes the operand and returns a new pattern; clone first
/// to reuse a pattern elsewhere.
pub trait PatternExt: Pattern + Sized + 'static {
    fn boxed(self) -> Box<dyn Pattern> {
        Box::new(self)
    }

    /// Play `self` then `other` within one cycle, sized by note count.
    fn join(self, other: impl Pattern + 'static) -> Join {
        Join::new(self.boxed(), Box::new(other))
    }

    /// Repeat the pattern `n` times per cycle.
    fn times(self, n: i64) -> Multiply {
        Multiply::new(self.boxed(), n)
    }

    /// Stretch the pattern across `n` cycles.
    fn divide(self, n: i64) -> Divide {
        Divide::new(self.boxed(), n)
    }

    /// Play only on every `n`-th cycle.
    fn every(self, n: i64) -> EveryN {
        EveryN::new(self.boxed(), n)
    }

    /// Pick one note per cycle with an entropy-seeded source.
    fn choose_rand(self) -> RandomChoice {
        self.choose_rand_with(Rng::default())
    }

    /// Pick one note per cycle with the given source.
    fn choose_rand_with(self, random: impl RandomSource + 'static) -> RandomChoice {
        RandomChoice::new(self.boxed(), Box::new(random))
    }
}

impl<P: Pattern + 'static> PatternExt for P {}

/// Clamp a user-supplied repeat/division factor to at least one.
pub(crate) fn clamp_factor(n: i64) -> usize {
    if n <= 0 {
        1
    } else {
        usize::try_from(n).unwrap_or(usize::MAX)
    }
}

/// Compress `notes` from the whole cycle into `to`.
pub(crate) fn compress(notes: Vec<Note>, to: Span) -> impl Iterator<Item = Note> {
    notes
        .into_iter()
        .map(move |note| note.remapped(Span::CYCLE, to))
}
