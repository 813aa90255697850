use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaChaRng};
use rand_distr::{Distribution, Exp};

use crate::{Error, Result};

/// ChaCha stream used for drawing inter-arrival times.
pub const ARRIVAL_STREAM: u64 = 0;

/// ChaCha stream used for drawing service durations.
pub const SERVICE_STREAM: u64 = 1;

/// Implementors produce exponentially distributed durations.
pub trait ExponentialSource {
    /// Draws a strictly positive value from the exponential distribution with the given
    /// `rate`, i.e., with the mean of `1 / rate`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `rate` is not a strictly positive finite number.
    fn draw_exponential(&mut self, rate: f64) -> Result<f64>;
}

/// Random variate source backed by a pseudo-random number generator.
pub struct RandomVariateSource<R = ChaChaRng> {
    rng: R,
}

impl RandomVariateSource<ChaChaRng> {
    /// Constructs a reproducible source. Sources with the same seed but different streams
    /// produce independent sequences.
    #[must_use]
    pub fn seeded(seed: u64, stream: u64) -> Self {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }
}

impl<R: Rng> RandomVariateSource<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ExponentialSource for RandomVariateSource<R> {
    fn draw_exponential(&mut self, rate: f64) -> Result<f64> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(Error::InvalidParameter(rate));
        }
        let distr = Exp::new(rate).map_err(|_| Error::InvalidParameter(rate))?;
        loop {
            let value = distr.sample(&mut self.rng);
            if value > 0.0 {
                return Ok(value);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    use std::collections::VecDeque;

    use float_cmp::approx_eq;
    use rand::rngs::mock::StepRng;
    use rstest::rstest;

    /// Returns predefined durations regardless of the rate, and remembers the requested rates.
    pub(crate) struct Scripted {
        durations: VecDeque<f64>,
        rates: Vec<f64>,
    }

    impl Scripted {
        pub(crate) fn new(durations: &[f64]) -> Self {
            Self {
                durations: durations.iter().copied().collect(),
                rates: Vec::new(),
            }
        }

        pub(crate) fn rates(&self) -> &[f64] {
            &self.rates
        }
    }

    impl ExponentialSource for Scripted {
        fn draw_exponential(&mut self, rate: f64) -> Result<f64> {
            self.rates.push(rate);
            Ok(self
                .durations
                .pop_front()
                .expect("ran out of scripted durations"))
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_rejects_invalid_rate(#[case] rate: f64) {
        let mut source = RandomVariateSource::seeded(0, ARRIVAL_STREAM);
        assert!(matches!(
            source.draw_exponential(rate),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_same_seed_same_values() {
        let mut a = RandomVariateSource::seeded(42, ARRIVAL_STREAM);
        let mut b = RandomVariateSource::seeded(42, ARRIVAL_STREAM);
        for _ in 0..100 {
            assert_eq!(
                a.draw_exponential(0.5).unwrap().to_bits(),
                b.draw_exponential(0.5).unwrap().to_bits()
            );
        }
    }

    #[test]
    fn test_streams_differ() {
        let mut arrivals = RandomVariateSource::seeded(42, ARRIVAL_STREAM);
        let mut services = RandomVariateSource::seeded(42, SERVICE_STREAM);
        let a: Vec<f64> = (0..10)
            .map(|_| arrivals.draw_exponential(1.0).unwrap())
            .collect();
        let s: Vec<f64> = (0..10)
            .map(|_| services.draw_exponential(1.0).unwrap())
            .collect();
        assert_ne!(a, s);
    }

    #[test]
    fn test_zero_sample_is_redrawn() {
        // The first word is all zeros, which the exponential sampler maps to exactly 0.
        let mut source = RandomVariateSource::new(StepRng::new(0, 1 << 40));
        let value = source.draw_exponential(1.0).unwrap();
        assert!(value > 0.0);
        assert!(value.is_finite());
    }

    #[rstest]
    #[case(1.0)]
    #[case(0.4)]
    #[case(10.0)]
    fn test_sample_mean(#[case] rate: f64) {
        let mut source = RandomVariateSource::seeded(7, SERVICE_STREAM);
        let n = 100_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let value = source.draw_exponential(rate).unwrap();
            assert!(value > 0.0);
            sum += value;
        }
        let mean = sum / f64::from(n);
        assert!(approx_eq!(f64, mean, 1.0 / rate, epsilon = 0.05 / rate));
    }
}
