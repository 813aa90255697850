use std::collections::{HashMap, HashSet};

use storesim::{Customer, CustomerId, Event, ServerId, StoreConfig, StoreModel, Tick};

/// Builds a model from `config` and runs it for `steps` ticks.
pub fn run(config: &StoreConfig, steps: u64) -> StoreModel {
    let mut model = StoreModel::new(config).expect("valid config");
    model.run(steps).expect("simulation failed");
    model
}

/// Every admitted customer is exactly in one place: waiting, in service, or gone after
/// completion.
pub fn check_conservation(model: &StoreModel) -> Result<(), String> {
    let report = model.report();
    if report.throughput > report.arrivals {
        return Err(format!(
            "served {} customers but only {} arrived",
            report.throughput, report.arrivals
        ));
    }
    let accounted = report.final_queue_length as u64 + report.in_service as u64 + report.throughput;
    if accounted != report.arrivals {
        return Err(format!(
            "{} arrivals but {} waiting, {} in service, and {} served",
            report.arrivals, report.final_queue_length, report.in_service, report.throughput
        ));
    }
    let mut seen = HashSet::new();
    let waiting = model.queue().iter().map(Customer::id);
    let in_service = model
        .servers()
        .iter()
        .filter_map(|s| s.current_customer().map(Customer::id));
    let served = model.events().iter().filter_map(|e| match e.event {
        Event::ServiceCompleted { customer, .. } => Some(customer),
        _ => None,
    });
    for customer in waiting.chain(in_service).chain(served) {
        if !seen.insert(customer) {
            return Err(format!("customer {} counted twice", customer));
        }
    }
    let expected: HashSet<_> = (0..report.arrivals as usize).map(CustomerId::from).collect();
    if seen != expected {
        return Err(String::from("some customers are lost"));
    }
    let total: u64 = model
        .events()
        .iter()
        .filter_map(|e| match e.event {
            Event::ServiceCompleted { time_in_system, .. } => Some(time_in_system),
            _ => None,
        })
        .sum();
    if total != model.statistics().total_time_in_system() {
        return Err(format!(
            "completions add up to {} ticks but statistics report {}",
            total,
            model.statistics().total_time_in_system()
        ));
    }
    Ok(())
}

/// Customers start service in the order of their arrival, and never before it.
pub fn check_fifo(model: &StoreModel) -> Result<(), String> {
    let mut arrivals = HashMap::<CustomerId, Tick>::new();
    let mut next_to_serve = 0_usize;
    for e in model.events() {
        match e.event {
            Event::Arrival { customer } => {
                arrivals.insert(customer, e.time);
            }
            Event::ServiceStarted { customer, .. } => {
                if customer != CustomerId::from(next_to_serve) {
                    return Err(format!(
                        "[{}] customer {} served before customer {}",
                        e.time, customer, next_to_serve
                    ));
                }
                next_to_serve += 1;
                match arrivals.get(&customer) {
                    Some(arrival) if *arrival <= e.time => {}
                    _ => return Err(format!("[{}] customer {} served before arrival", e.time, customer)),
                }
            }
            Event::ServiceCompleted { .. } => {}
        }
    }
    let waiting: Vec<_> = model.queue().iter().map(Customer::id).collect();
    let expected: Vec<_> = (next_to_serve..next_to_serve + waiting.len())
        .map(CustomerId::from)
        .collect();
    if waiting != expected {
        return Err(format!("queue out of order: {:?}", waiting));
    }
    Ok(())
}

/// A server serves at most one customer at a time, and a customer is served at most once.
pub fn check_exclusivity(model: &StoreModel) -> Result<(), String> {
    let mut serving = HashMap::<ServerId, CustomerId>::new();
    let mut started = HashSet::<CustomerId>::new();
    for e in model.events() {
        match e.event {
            Event::ServiceStarted { server, customer } => {
                if let Some(other) = serving.insert(server, customer) {
                    return Err(format!(
                        "[{}] server {} took customer {} while serving {}",
                        e.time, server, customer, other
                    ));
                }
                if !started.insert(customer) {
                    return Err(format!("[{}] customer {} served twice", e.time, customer));
                }
            }
            Event::ServiceCompleted {
                server, customer, ..
            } => {
                if serving.remove(&server) != Some(customer) {
                    return Err(format!(
                        "[{}] server {} finished customer {} it did not serve",
                        e.time, server, customer
                    ));
                }
            }
            Event::Arrival { .. } => {}
        }
    }
    for server in model.servers() {
        let current = server.current_customer().map(Customer::id);
        if serving.get(&server.id()).copied() != current {
            return Err(format!("server {} is in an unexpected state", server.id()));
        }
        if server.is_busy() != server.completion_time().is_some() {
            return Err(format!("server {} is half busy", server.id()));
        }
    }
    Ok(())
}

/// Runs all the checks above.
pub fn check_all(model: &StoreModel) -> Result<(), String> {
    check_conservation(model)?;
    check_fifo(model)?;
    check_exclusivity(model)
}
