use std::fmt;

use serde::Serialize;

/// Aggregate statistics of completed services. They are only updated at the moment a
/// server finishes serving a customer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    total_time_in_system: u64,
    total_completions: u64,
}

impl Statistics {
    /// Registers a completed service of a customer that spent `time_in_system` ticks in the
    /// system.
    pub fn record_completion(&mut self, time_in_system: u64) {
        self.total_time_in_system += time_in_system;
        self.total_completions += 1;
    }

    /// Sum of the times in system of all served customers.
    #[must_use]
    pub fn total_time_in_system(&self) -> u64 {
        self.total_time_in_system
    }

    /// Number of completed services.
    #[must_use]
    pub fn total_completions(&self) -> u64 {
        self.total_completions
    }

    /// Average time in system of served customers, or 0 if nobody has been served yet.
    #[must_use]
    pub fn mean_time_in_system(&self) -> f64 {
        if self.total_completions == 0 {
            0.0
        } else {
            self.total_time_in_system as f64 / self.total_completions as f64
        }
    }
}

/// Summary of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Average time in system of served customers, in ticks.
    pub mean_time_in_system: f64,
    /// Number of customers waiting in the queue at the end of the run.
    pub final_queue_length: usize,
    /// Number of customers that completed service.
    pub throughput: u64,
    /// Number of customers admitted to the store.
    pub arrivals: u64,
    /// Number of customers still being served at the end of the run.
    pub in_service: usize,
    /// Number of ticks simulated.
    pub ticks: u64,
    /// Seed of the random number generators, if known.
    pub seed: Option<u64>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average time in system: {}", self.mean_time_in_system)?;
        writeln!(f, "Queue length: {}", self.final_queue_length)?;
        writeln!(f, "Throughput: {}", self.throughput)?;
        writeln!(f, "Arrivals: {}", self.arrivals)?;
        writeln!(f, "In service: {}", self.in_service)?;
        write!(f, "Ticks: {}", self.ticks)?;
        if let Some(seed) = self.seed {
            write!(f, "\nSeed: {}", seed)?;
        }
        Ok(())
    }
}
