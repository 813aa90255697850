use std::mem;

use serde::Serialize;

use crate::{
    Customer, CustomerId, CustomerQueue, Error, ExponentialSource, Result, ServerId, Statistics,
    Tick,
};

/// State of a server: either it is idle, or it serves exactly one customer that will be
/// done at `completion_time`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerState {
    /// Waiting for customers.
    Idle,
    /// Serving a customer.
    Busy {
        /// The customer being served.
        customer: Customer,
        /// The time at which the service finishes. Service durations are continuous, so this
        /// is a real number; the service is finished at the first tick at or past this point.
        completion_time: f64,
    },
}

/// Record of a finished service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// The customer that was served.
    pub customer: CustomerId,
    /// When the customer joined the queue.
    pub arrival_time: Tick,
    /// When the service started.
    pub service_start_time: Tick,
    /// Number of ticks between the arrival and the end of the service.
    pub time_in_system: u64,
}

/// What a server did during one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServerStep {
    /// The service that was completed this tick.
    pub completed: Option<Completion>,
    /// The customer whose service started this tick.
    pub started: Option<CustomerId>,
}

/// A server (e.g., a cashier) that serves one customer at a time.
///
/// At each tick, the server first checks if the current service is finished, and if so,
/// records it and releases the customer. Then, if it is idle, it takes the next customer
/// from the front of the queue. Thus, a server freed at some tick can start serving the
/// next customer within the same tick.
#[derive(Debug, Clone)]
pub struct Server {
    id: ServerId,
    service_rate: f64,
    state: ServerState,
}

impl Server {
    /// Constructs an idle server that takes `mean_service_time` ticks on average to serve a
    /// customer.
    #[must_use]
    pub fn new(id: ServerId, mean_service_time: f64) -> Self {
        Self {
            id,
            service_rate: 1.0 / mean_service_time,
            state: ServerState::Idle,
        }
    }

    /// The ID of the server.
    #[must_use]
    pub fn id(&self) -> ServerId {
        self.id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Returns `true` if the server is serving a customer.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.state, ServerState::Busy { .. })
    }

    /// The customer being served, if any.
    #[must_use]
    pub fn current_customer(&self) -> Option<&Customer> {
        match &self.state {
            ServerState::Busy { customer, .. } => Some(customer),
            ServerState::Idle => None,
        }
    }

    /// The time when the current service finishes, if any.
    #[must_use]
    pub fn completion_time(&self) -> Option<f64> {
        match &self.state {
            ServerState::Busy {
                completion_time, ..
            } => Some(*completion_time),
            ServerState::Idle => None,
        }
    }

    /// Performs the server's work for the tick `now`.
    ///
    /// # Errors
    ///
    /// Fails if an impossible state is observed, or if the service duration could not be
    /// drawn. Either way, the simulation must not continue.
    pub fn step<S>(
        &mut self,
        now: Tick,
        queue: &mut CustomerQueue,
        durations: &mut S,
        stats: &mut Statistics,
    ) -> Result<ServerStep>
    where
        S: ExponentialSource + ?Sized,
    {
        let mut step = ServerStep::default();
        if self.completion_time().map_or(false, |time| now.reached(time)) {
            step.completed = Some(self.complete_service(now, stats)?);
        }
        if !self.is_busy() && !queue.is_empty() {
            step.started = Some(self.begin_service(now, queue, durations)?);
        }
        Ok(step)
    }

    fn complete_service(&mut self, now: Tick, stats: &mut Statistics) -> Result<Completion> {
        let customer = match mem::replace(&mut self.state, ServerState::Idle) {
            ServerState::Busy { customer, .. } => customer,
            ServerState::Idle => {
                return Err(Error::InternalInvariantViolation(format!(
                    "server {} completed a service while idle",
                    self.id
                )));
            }
        };
        let service_start_time = customer.service_start_time().ok_or_else(|| {
            Error::InternalInvariantViolation(format!(
                "customer {} served by server {} has no service start time",
                customer.id(),
                self.id
            ))
        })?;
        let time_in_system = now.since(customer.arrival_time()).ok_or_else(|| {
            Error::InternalInvariantViolation(format!(
                "customer {} completed at tick {} before its arrival at tick {}",
                customer.id(),
                now,
                customer.arrival_time()
            ))
        })?;
        stats.record_completion(time_in_system);
        log::debug!(
            "[{}] Server {} finished serving customer {} ({} ticks in system)",
            now,
            self.id,
            customer.id(),
            time_in_system
        );
        Ok(Completion {
            customer: customer.id(),
            arrival_time: customer.arrival_time(),
            service_start_time,
            time_in_system,
        })
    }

    fn begin_service<S>(
        &mut self,
        now: Tick,
        queue: &mut CustomerQueue,
        durations: &mut S,
    ) -> Result<CustomerId>
    where
        S: ExponentialSource + ?Sized,
    {
        if self.is_busy() {
            return Err(Error::InternalInvariantViolation(format!(
                "server {} began a service while busy",
                self.id
            )));
        }
        let waiting = queue.len();
        let mut customer = queue.dequeue_front().ok_or_else(|| {
            Error::InternalInvariantViolation(format!(
                "queue reported {} waiting customers but had none at the front",
                waiting
            ))
        })?;
        customer.mark_service_start(now)?;
        let duration = durations.draw_exponential(self.service_rate)?;
        let completion_time = now.as_f64() + duration;
        log::debug!(
            "[{}] Server {} picked up customer {} (done at {:.3})",
            now,
            self.id,
            customer.id(),
            completion_time
        );
        let customer_id = customer.id();
        self.state = ServerState::Busy {
            customer,
            completion_time,
        };
        Ok(customer_id)
    }
}
