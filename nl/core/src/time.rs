//! Time management types and utilities

use core::fmt;

/// Monotonic microsecond time source
///
/// Only used to measure how long a tick kept the loop busy. Implementations
/// must never block.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&self) -> u64;
}

/// Clock that always reads zero, which disables tick measurement
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClock;

impl Clock for NullClock {
    fn now_us(&self) -> u64 {
        0
    }
}

/// Loop iteration counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TickCount(u64);

impl TickCount {
    /// Zero tick, the value before the first sweep
    pub const ZERO: Self = Self(0);

    /// Create a new tick count
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Get the raw tick value
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Increment the tick counter
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Calculate elapsed ticks since a previous tick
    pub fn elapsed_since(self, previous: TickCount) -> u64 {
        self.0.wrapping_sub(previous.0)
    }
}

impl fmt::Display for TickCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick:{}", self.0)
    }
}

/// Upper bound on how long a single module may hold the loop in `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TickBudget {
    micros: u64,
}

impl TickBudget {
    /// Create a budget from microseconds
    pub const fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    /// Create a budget from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            micros: millis.saturating_mul(1000),
        }
    }

    pub const fn as_micros(&self) -> u64 {
        self.micros
    }

    /// Check whether an observed duration exceeds the budget
    pub const fn is_exceeded_by(&self, elapsed_us: u64) -> bool {
        elapsed_us > self.micros
    }
}

impl fmt::Display for TickBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.micros)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickCount {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "tick:{}", self.0);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickBudget {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}us", self.micros);
    }
}
