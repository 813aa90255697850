use serde::Serialize;

use crate::{
    Customer, CustomerId, CustomerQueue, ExponentialSource, RandomVariateSource, Report, Result,
    Server, ServerId, ServerStep, SimulationClock, Statistics, StoreConfig, Tick, ARRIVAL_STREAM,
    SERVICE_STREAM,
};

/// Something that happened in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A customer joined the queue.
    Arrival {
        /// The new customer.
        customer: CustomerId,
    },
    /// A server took a customer from the front of the queue.
    ServiceStarted {
        /// The server.
        server: ServerId,
        /// The customer.
        customer: CustomerId,
    },
    /// A server finished serving a customer, who then left the store.
    ServiceCompleted {
        /// The server.
        server: ServerId,
        /// The customer.
        customer: CustomerId,
        /// Ticks between the arrival and the completion.
        time_in_system: u64,
    },
}

/// Event with the tick at which it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    /// Simulation time.
    pub time: Tick,
    /// Event.
    pub event: Event,
}

/// The main simulation object. It owns the clock, the queue, all the servers, the arrival
/// schedule, and the statistics.
///
/// Each call to [`step`](Self::step) simulates one tick:
/// 1. if the next arrival is due, one new customer joins the queue, and the following
///    arrival is scheduled; at most one customer arrives per tick,
/// 2. every server, in the order of their IDs, completes its service if due and takes the
///    next customer from the queue if idle,
/// 3. the clock moves forward by one tick.
pub struct StoreModel<V = RandomVariateSource> {
    clock: SimulationClock,
    queue: CustomerQueue,
    servers: Vec<Server>,
    arrival_source: V,
    service_source: V,
    arrival_rate: f64,
    next_arrival_time: f64,
    next_customer_id: usize,
    admitted: u64,
    stats: Statistics,
    seed: Option<u64>,
    events: Option<Vec<TimedEvent>>,
}

impl StoreModel<RandomVariateSource> {
    /// Constructs a model with random variate sources seeded with the configured seed, or with
    /// a random one if none is configured. The seed in use is logged and reported.
    ///
    /// # Errors
    ///
    /// Fails only if the first inter-arrival time cannot be drawn.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let seed = config.seed_value().unwrap_or_else(rand::random);
        log::info!("Seeding random number generators with {}", seed);
        let mut model = Self::with_sources(
            config,
            RandomVariateSource::seeded(seed, ARRIVAL_STREAM),
            RandomVariateSource::seeded(seed, SERVICE_STREAM),
        )?;
        model.seed = Some(seed);
        Ok(model)
    }
}

impl<V: ExponentialSource> StoreModel<V> {
    /// Constructs a model drawing inter-arrival times from `arrival_source` and service
    /// durations from `service_source`. The seed in `config` is ignored.
    ///
    /// # Errors
    ///
    /// Fails if the first inter-arrival time cannot be drawn.
    pub fn with_sources(
        config: &StoreConfig,
        mut arrival_source: V,
        service_source: V,
    ) -> Result<Self> {
        let next_arrival_time = arrival_source.draw_exponential(config.mean_arrival_rate())?;
        let servers = (0..config.num_servers())
            .map(|id| Server::new(ServerId::from(id), config.mean_service_time()))
            .collect();
        log::info!(
            "Store with {} servers, {} arrivals per tick, and mean service time of {} ticks",
            config.num_servers(),
            config.mean_arrival_rate(),
            config.mean_service_time()
        );
        Ok(Self {
            clock: SimulationClock::default(),
            queue: CustomerQueue::default(),
            servers,
            arrival_source,
            service_source,
            arrival_rate: config.mean_arrival_rate(),
            next_arrival_time,
            next_customer_id: 0,
            admitted: 0,
            stats: Statistics::default(),
            seed: None,
            events: if config.records_events() {
                Some(Vec::new())
            } else {
                None
            },
        })
    }

    /// Simulates a single tick.
    ///
    /// # Errors
    ///
    /// Fails if the simulation reached an invalid state; the model must not be stepped again
    /// after that.
    pub fn step(&mut self) -> Result<()> {
        let now = self.clock.now();
        if now.reached(self.next_arrival_time) {
            self.admit(now)?;
        }
        for server in &mut self.servers {
            let step = server.step(
                now,
                &mut self.queue,
                &mut self.service_source,
                &mut self.stats,
            )?;
            if let Some(events) = &mut self.events {
                record_server_step(events, now, server.id(), step);
            }
        }
        log::trace!(
            "[{}] waiting: {}, busy: {}, served: {}",
            now,
            self.queue.len(),
            self.servers.iter().filter(|s| s.is_busy()).count(),
            self.stats.total_completions()
        );
        self.clock.advance();
        Ok(())
    }

    /// Simulates `step_count` ticks.
    ///
    /// # Errors
    ///
    /// Stops at the first failed step and returns its error.
    pub fn run(&mut self, step_count: u64) -> Result<()> {
        for _ in 0..step_count {
            self.step()?;
        }
        log::info!(
            "Finished at tick {} with {} customers served",
            self.clock.now(),
            self.stats.total_completions()
        );
        Ok(())
    }

    fn admit(&mut self, now: Tick) -> Result<()> {
        let customer = Customer::new(CustomerId::from(self.next_customer_id), now);
        self.next_customer_id += 1;
        self.admitted += 1;
        log::debug!("[{}] Customer {} arrived", now, customer.id());
        if let Some(events) = &mut self.events {
            events.push(TimedEvent {
                time: now,
                event: Event::Arrival {
                    customer: customer.id(),
                },
            });
        }
        self.queue.enqueue(customer);
        self.next_arrival_time =
            now.as_f64() + self.arrival_source.draw_exponential(self.arrival_rate)?;
        Ok(())
    }
}

impl<V> StoreModel<V> {
    /// Current simulation time.
    #[must_use]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Customers waiting for service.
    #[must_use]
    pub fn queue(&self) -> &CustomerQueue {
        &self.queue
    }

    /// All servers, ordered by their IDs.
    #[must_use]
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Number of servers currently serving a customer.
    #[must_use]
    pub fn busy_servers(&self) -> usize {
        self.servers.iter().filter(|s| s.is_busy()).count()
    }

    /// Number of customers that have entered the store so far.
    #[must_use]
    pub fn admitted(&self) -> u64 {
        self.admitted
    }

    /// The point in time at which the next customer arrives.
    #[must_use]
    pub fn next_arrival_time(&self) -> f64 {
        self.next_arrival_time
    }

    /// Statistics of completed services.
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// The seed of the random number generators, if known.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Recorded events, in the order they occurred. Empty unless recording was enabled in the
    /// config.
    #[must_use]
    pub fn events(&self) -> &[TimedEvent] {
        self.events.as_deref().unwrap_or(&[])
    }

    /// Summarizes the current state of the simulation.
    #[must_use]
    pub fn report(&self) -> Report {
        Report {
            mean_time_in_system: self.stats.mean_time_in_system(),
            final_queue_length: self.queue.len(),
            throughput: self.stats.total_completions(),
            arrivals: self.admitted,
            in_service: self.busy_servers(),
            ticks: self.clock.now().into(),
            seed: self.seed,
        }
    }
}

fn record_server_step(events: &mut Vec<TimedEvent>, time: Tick, server: ServerId, step: ServerStep) {
    if let Some(completion) = step.completed {
        events.push(TimedEvent {
            time,
            event: Event::ServiceCompleted {
                server,
                customer: completion.customer,
                time_in_system: completion.time_in_system,
            },
        });
    }
    if let Some(customer) = step.started {
        events.push(TimedEvent {
            time,
            event: Event::ServiceStarted { server, customer },
        });
    }
}
