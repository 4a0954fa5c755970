// src/note.rs

/// One note within a cycle.
///
/// `start` and `duration` are fractions of the cycle length, so a note with
/// `start == 0.5` begins halfway through the cycle. A non-positive frequency
/// marks a rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency: f64,
    pub start: f64,
    pub duration: f64,
}

impl Note {
    #[inline]
    pub fn new(frequency: f64, start: f64, duration: f64) -> Self {
        Self {
            frequency,
            start,
            duration,
        }
    }

    /// Rests are produced by patterns and dropped by the scheduler.
    #[inline]
    pub fn is_rest(&self) -> bool {
        self.frequency <= 0.0
    }

    /// Copy of this note with its timing moved from `from` into `to`.
    ///
    /// The start point is mapped linearly, the duration is scaled by the
    /// ratio of the two span lengths.
    pub fn remapped(&self, from: Span, to: Span) -> Note {
        Note {
            frequency: self.frequency,
            start: from.map_to(self.start, to),
            duration: self.duration * to.len() / from.len(),
        }
    }
}

/// Half-open window `[start, end)` of a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    /// The whole cycle.
    pub const CYCLE: Span = Span {
        start: 0.0,
        end: 1.0,
    };

    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The `index`-th of `count` equal slices of the cycle.
    #[inline]
    pub fn slice(index: usize, count: usize) -> Self {
        let count = count as f64;
        Self::new(index as f64 / count, (index + 1) as f64 / count)
    }

    #[inline]
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.end
    }

    /// Map a position in this span linearly onto `to`.
    #[inline]
    pub fn map_to(&self, position: f64, to: Span) -> f64 {
        to.start + (position - self.start) / self.len() * to.len()
    }
}
