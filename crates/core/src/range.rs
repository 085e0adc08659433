//! Two-handle numeric range input.
//!
//! Maps a fixed integer domain onto a pair of handles that may touch the domain
//! endpoints but never cross or coincide. Every update clamps instead of rejecting,
//! and returns the emitted selection together with the derived track geometry so
//! the caller decides how (and whether) to render it.

use tracing::trace;

/// The current handle positions. `domain_min <= min <= max <= domain_max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelection {
    pub min: i64,
    pub max: i64,
}

/// Filled track segment in integer percent of the domain width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackGeometry {
    pub left: i64,
    pub width: i64,
}

/// What a handle update emits: the validated pair and where the track now sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeChange {
    pub selection: RangeSelection,
    pub track: TrackGeometry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeInput {
    domain_min: i64,
    domain_max: i64,
    selection: RangeSelection,
}

impl RangeInput {
    /// Create an input spanning `[domain_min, domain_max]` with both handles at the ends.
    /// A reversed domain is swapped rather than rejected.
    pub fn new(domain_min: i64, domain_max: i64) -> Self {
        let (lo, hi) = ordered(domain_min, domain_max);
        Self { domain_min: lo, domain_max: hi, selection: RangeSelection { min: lo, max: hi } }
    }

    /// Create an input with an initial selection, clamped into the domain.
    pub fn with_selection(domain_min: i64, domain_max: i64, min: i64, max: i64) -> Self {
        let mut input = Self::new(domain_min, domain_max);
        input.selection = input.clamp_pair(min, max);
        input
    }

    pub fn domain(&self) -> (i64, i64) {
        (self.domain_min, self.domain_max)
    }

    pub fn selection(&self) -> RangeSelection {
        self.selection
    }

    /// Move the low handle. Result is `clamp(candidate, domain_min, max - 1)`,
    /// saturating at `domain_min` when there is no room below `max`.
    pub fn set_min(&mut self, candidate: i64) -> RangeChange {
        let upper = self.selection.max.saturating_sub(1);
        let min = candidate.min(upper).max(self.domain_min);
        self.selection.min = min;
        trace!(candidate, min, "range min updated");
        self.change()
    }

    /// Move the high handle. Result is lower-bounded strictly above the current
    /// `min` and capped at `domain_max`; the left track edge does not move.
    pub fn set_max(&mut self, candidate: i64) -> RangeChange {
        let lower = self.selection.min.saturating_add(1);
        let max = candidate.max(lower).min(self.domain_max);
        self.selection.max = max;
        trace!(candidate, max, "range max updated");
        self.change()
    }

    /// Replace the domain, re-clamping the current selection into it.
    pub fn set_domain(&mut self, domain_min: i64, domain_max: i64) -> RangeChange {
        let (lo, hi) = ordered(domain_min, domain_max);
        self.domain_min = lo;
        self.domain_max = hi;
        self.selection = self.clamp_pair(self.selection.min, self.selection.max);
        self.change()
    }

    /// Put both handles back on the domain endpoints.
    pub fn reset(&mut self) -> RangeChange {
        self.selection = RangeSelection { min: self.domain_min, max: self.domain_max };
        self.change()
    }

    /// `round(100 * (v - domain_min) / (domain_max - domain_min))`, with `v` clamped
    /// into the domain so the result is always `0..=100`. A zero-width domain maps
    /// every value to 0.
    pub fn percent(&self, value: i64) -> i64 {
        let lo = i128::from(self.domain_min);
        let span = i128::from(self.domain_max) - lo;
        if span <= 0 {
            return 0;
        }
        let offset = i128::from(value.clamp(self.domain_min, self.domain_max)) - lo;
        // Half rounds up. Widened so full-width i64 domains cannot overflow.
        ((200 * offset + span) / (2 * span)) as i64
    }

    pub fn track(&self) -> TrackGeometry {
        let left = self.percent(self.selection.min);
        let right = self.percent(self.selection.max);
        TrackGeometry { left, width: right - left }
    }

    fn change(&self) -> RangeChange {
        RangeChange { selection: self.selection, track: self.track() }
    }

    fn clamp_pair(&self, min: i64, max: i64) -> RangeSelection {
        let (min, max) = ordered(min, max);
        let max = max.clamp(self.domain_min, self.domain_max);
        let min = min.clamp(self.domain_min, self.domain_max);
        if min < max || self.domain_max == self.domain_min {
            return RangeSelection { min, max };
        }
        // Coinciding handles: open them up by one step inside the domain.
        if max < self.domain_max {
            RangeSelection { min, max: max + 1 }
        } else {
            RangeSelection { min: min - 1, max }
        }
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
