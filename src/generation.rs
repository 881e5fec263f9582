use std::fmt;

/// Identifies one dispatched query. Later dispatches compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic generation clock, owned by the driver task.
#[derive(Debug, Default)]
pub(crate) struct GenerationClock {
    last: u64,
}

impl GenerationClock {
    /// Starts before generation 1.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the next generation.
    pub(crate) const fn next(&mut self) -> Generation {
        self.last += 1;
        Generation(self.last)
    }
}
