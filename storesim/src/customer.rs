use crate::{CustomerId, Error, Result, Tick};

/// A customer of the store. It carries no behavior, only the timestamps needed to compute
/// the time it spent in the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    arrival_time: Tick,
    service_start_time: Option<Tick>,
}

impl Customer {
    /// Creates a customer that arrived at `arrival_time` and has not been served yet.
    #[must_use]
    pub fn new(id: CustomerId, arrival_time: Tick) -> Self {
        Self {
            id,
            arrival_time,
            service_start_time: None,
        }
    }

    /// The ID of this customer, unique throughout the entire simulation.
    #[must_use]
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// The time of the simulation when the customer joined the queue.
    #[must_use]
    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    /// The time of the simulation when a server started serving the customer, if it did.
    #[must_use]
    pub fn service_start_time(&self) -> Option<Tick> {
        self.service_start_time
    }

    /// Records the start of service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] if the service has already started, or if `time`
    /// precedes the arrival.
    pub fn mark_service_start(&mut self, time: Tick) -> Result<()> {
        if let Some(start) = self.service_start_time {
            return Err(Error::ProtocolViolation {
                customer: self.id,
                reason: format!("service already started at tick {}", start),
            });
        }
        if time < self.arrival_time {
            return Err(Error::ProtocolViolation {
                customer: self.id,
                reason: format!(
                    "service cannot start at tick {} before arrival at tick {}",
                    time, self.arrival_time
                ),
            });
        }
        self.service_start_time = Some(time);
        Ok(())
    }
}
