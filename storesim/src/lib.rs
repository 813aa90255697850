//! Single-stage queueing simulation of a store: a number of identical servers (cashiers)
//! pull customers from one shared FIFO line, customers arrive according to a Poisson process,
//! and service durations are exponentially distributed.
//!
//! The simulation advances in discrete ticks. At each tick, [`StoreModel`] first checks whether
//! a customer arrives, then steps every [`Server`], and finally advances the clock.
//!
//! # Examples
//!
//! ```
//! # use storesim::{StoreConfig, StoreModel};
//! # fn main() -> storesim::Result<()> {
//! let config = StoreConfig::new(1, 1.0, 2.5)?.seed(17);
//! let mut model = StoreModel::new(&config)?;
//! model.run(1000)?;
//! let report = model.report();
//! assert!(report.throughput > 0);
//! assert!(report.mean_time_in_system >= 2.5);
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::default_trait_access,
    clippy::cast_precision_loss
)]
#![deny(unsafe_code)]

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

mod clock;
pub use clock::{SimulationClock, Tick};

mod config;
pub use config::StoreConfig;

mod customer;
pub use customer::Customer;

mod model;
pub use model::{Event, StoreModel, TimedEvent};

mod queue;
pub use queue::CustomerQueue;

mod random;
pub use random::{ExponentialSource, RandomVariateSource, ARRIVAL_STREAM, SERVICE_STREAM};

mod report;
pub use report::{Report, Statistics};

mod server;
pub use server::{Completion, Server, ServerState, ServerStep};

/// Customer ID.
#[derive(
    From,
    Into,
    Debug,
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
pub struct CustomerId(usize);

/// Server ID.
#[derive(
    From,
    Into,
    Debug,
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
pub struct ServerId(usize);

/// Error type encompassing all simulation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One of the construction parameters is not strictly positive.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A random variate was requested with a rate that is not strictly positive.
    #[error("invalid rate parameter of the exponential distribution: {0}")]
    InvalidParameter(f64),

    /// A customer record was used in a way that breaks its life cycle, e.g., its service
    /// was started twice.
    #[error("protocol violation for customer {customer}: {reason}")]
    ProtocolViolation {
        /// Offending customer.
        customer: CustomerId,
        /// What went wrong.
        reason: String,
    },

    /// The simulation observed a state that should be impossible. This signals a defect,
    /// and the run must not continue, because the statistics could no longer be trusted.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

/// Result alias using [`Error`](enum.Error.html).
pub type Result<T> = std::result::Result<T, Error>;
