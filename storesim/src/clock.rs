use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// A point in simulation time, measured in ticks.
#[derive(
    From,
    Into,
    Debug,
    Default,
    PartialEq,
    PartialOrd,
    Eq,
    Ord,
    Serialize,
    Deserialize,
    Copy,
    Clone,
    Hash,
    Display,
)]
#[serde(transparent)]
pub struct Tick(u64);

impl Tick {
    /// Tick as a real number, to be compared against randomly drawn points in time.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Number of ticks that passed since `earlier`, or `None` if `earlier` is in the future.
    #[must_use]
    pub fn since(self, earlier: Tick) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }

    /// Returns `true` if this tick is at or past the real-valued point in time `time`.
    #[must_use]
    pub fn reached(self, time: f64) -> bool {
        self.as_f64() >= time
    }
}

/// Simulation clock. It only moves forward, one tick at a time.
#[derive(Debug, Default, Clone)]
pub struct SimulationClock {
    now: Tick,
}

impl SimulationClock {
    /// Returns the current simulation time.
    #[must_use]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Moves the clock forward by exactly one tick and returns the new time.
    pub fn advance(&mut self) -> Tick {
        self.now = Tick(self.now.0 + 1);
        self.now
    }
}
