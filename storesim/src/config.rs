use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration of a store simulation.
///
/// A value of this type is always valid: the number of servers, the arrival rate, and the
/// mean service time are all strictly positive. This holds both for configs built with
/// [`StoreConfig::new`] and for deserialized ones.
///
/// # Examples
///
/// ```
/// # use storesim::StoreConfig;
/// let config: StoreConfig = serde_json::from_str(
///     r#"{"num_servers": 2, "mean_arrival_rate": 1.0, "mean_service_time": 2.5, "seed": 7}"#,
/// ).unwrap();
/// assert_eq!(config.num_servers(), 2);
/// assert_eq!(config.seed_value(), Some(7));
///
/// assert!(serde_json::from_str::<StoreConfig>(
///     r#"{"num_servers": 0, "mean_arrival_rate": 1.0, "mean_service_time": 2.5}"#,
/// ).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStoreConfig")]
pub struct StoreConfig {
    num_servers: usize,
    mean_arrival_rate: f64,
    mean_service_time: f64,
    seed: Option<u64>,
    record_events: bool,
}

#[derive(Deserialize)]
struct RawStoreConfig {
    num_servers: usize,
    mean_arrival_rate: f64,
    mean_service_time: f64,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    record_events: bool,
}

impl TryFrom<RawStoreConfig> for StoreConfig {
    type Error = Error;
    fn try_from(raw: RawStoreConfig) -> Result<Self> {
        let config = Self::new(raw.num_servers, raw.mean_arrival_rate, raw.mean_service_time)?;
        Ok(Self {
            seed: raw.seed,
            record_events: raw.record_events,
            ..config
        })
    }
}

fn check_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidConfiguration(format!(
            "{} must be a positive number but is {}",
            name, value
        )))
    }
}

impl StoreConfig {
    /// Validates the parameters and constructs a config without a fixed seed and with the
    /// event log disabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any of the parameters is not strictly
    /// positive, or if the mean service time is so small that its inverse overflows.
    pub fn new(num_servers: usize, mean_arrival_rate: f64, mean_service_time: f64) -> Result<Self> {
        if num_servers == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "there must be at least one server",
            )));
        }
        let mean_service_time = check_positive("mean service time", mean_service_time)?;
        check_positive("service rate (inverse of the mean service time)", 1.0 / mean_service_time)?;
        Ok(Self {
            num_servers,
            mean_arrival_rate: check_positive("mean arrival rate", mean_arrival_rate)?,
            mean_service_time,
            seed: None,
            record_events: false,
        })
    }

    /// Sets the seed of the random number generators.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables recording of the in-memory event log.
    #[must_use]
    pub fn record_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    /// Number of identical servers.
    #[must_use]
    pub fn num_servers(&self) -> usize {
        self.num_servers
    }

    /// Expected number of arrivals per tick.
    #[must_use]
    pub fn mean_arrival_rate(&self) -> f64 {
        self.mean_arrival_rate
    }

    /// Expected number of ticks needed to serve a customer.
    #[must_use]
    pub fn mean_service_time(&self) -> f64 {
        self.mean_service_time
    }

    /// The fixed seed, if one was set.
    #[must_use]
    pub fn seed_value(&self) -> Option<u64> {
        self.seed
    }

    /// Whether the model should record its events.
    #[must_use]
    pub fn records_events(&self) -> bool {
        self.record_events
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use rstest::rstest;

    #[test]
    fn test_valid() {
        let config = StoreConfig::new(3, 1.0, 2.5).unwrap();
        assert_eq!(config.num_servers(), 3);
        assert_eq!(config.mean_arrival_rate(), 1.0);
        assert_eq!(config.mean_service_time(), 2.5);
        assert_eq!(config.seed_value(), None);
        assert!(!config.records_events());
        let config = config.seed(9).record_events(true);
        assert_eq!(config.seed_value(), Some(9));
        assert!(config.records_events());
    }

    #[rstest]
    #[case(0, 1.0, 2.5)]
    #[case(1, 0.0, 2.5)]
    #[case(1, -1.0, 2.5)]
    #[case(1, 1.0, 0.0)]
    #[case(1, 1.0, -2.5)]
    #[case(1, f64::NAN, 2.5)]
    #[case(1, 1.0, f64::INFINITY)]
    #[case(1, 1.0, 1e-310)]
    fn test_invalid(#[case] servers: usize, #[case] rate: f64, #[case] service: f64) {
        assert!(matches!(
            StoreConfig::new(servers, rate, service),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: StoreConfig = serde_json::from_str(
            r#"{"num_servers": 4, "mean_arrival_rate": 0.5, "mean_service_time": 3}"#,
        )
        .unwrap();
        assert_eq!(config, StoreConfig::new(4, 0.5, 3.0).unwrap());
    }

    #[rstest]
    #[case(r#"{"num_servers": 0, "mean_arrival_rate": 1.0, "mean_service_time": 2.5}"#)]
    #[case(r#"{"num_servers": 1, "mean_arrival_rate": -1.0, "mean_service_time": 2.5}"#)]
    #[case(r#"{"num_servers": 1, "mean_arrival_rate": 1.0, "mean_service_time": 0}"#)]
    #[case(r#"{"num_servers": 1, "mean_arrival_rate": 1.0, "mean_service_time": 1e-310}"#)]
    #[case(r#"{"num_servers": 1, "mean_arrival_rate": 1.0}"#)]
    fn test_deserialize_invalid(#[case] input: &str) {
        assert!(serde_json::from_str::<StoreConfig>(input).is_err());
    }
}
