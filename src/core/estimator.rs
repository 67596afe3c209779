//! Flow estimator: per-minute throughput and wait time for one intervention.
//!
//! Each minute starts from the profile's efficiency multiplier, applies the
//! peak-period penalty when enabled, scales the arrival rate by it and by a
//! weather factor, and derives the wait time from how far throughput falls
//! short of arrivals.

use crate::domain::model::{InterventionProfile, MinuteSample, SimulationRequest, SimulationResult};
use crate::domain::ports::WeatherSource;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, Validate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;

pub const PEAK_PENALTY: f64 = 0.7;
/// Minutes of each hour (inclusive) that get the peak penalty.
pub const PEAK_WINDOW: RangeInclusive<u32> = 15..=45;
pub const WEATHER_RANGE: RangeInclusive<f64> = 0.8..=1.2;
/// Throughput floor used as the wait-time divisor.
pub const MIN_THROUGHPUT: f64 = 1e-6;

impl SimulationRequest {
    pub fn new(
        profile: &'static InterventionProfile,
        arrival_rate_per_minute: u32,
        duration_minutes: u32,
        peak_hour_enabled: bool,
    ) -> Result<Self> {
        let request = Self {
            profile,
            arrival_rate_per_minute,
            duration_minutes,
            peak_hour_enabled,
        };
        request.validate()?;
        Ok(request)
    }
}

impl Validate for SimulationRequest {
    fn validate(&self) -> Result<()> {
        validate_positive_number("arrival_rate", self.arrival_rate_per_minute.into(), 1)?;
        validate_positive_number("duration", self.duration_minutes.into(), 1)?;
        Ok(())
    }
}

pub fn is_peak_minute(minute: u32) -> bool {
    PEAK_WINDOW.contains(&(minute % 60))
}

/// Uniform weather jitter drawn from [`WEATHER_RANGE`].
pub struct RandomWeather<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl<R: Rng> RandomWeather<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomWeather<ChaCha8Rng> {
    /// Seeded runs are reproducible; `None` seeds from the OS.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> WeatherSource for RandomWeather<R> {
    fn next_factor(&mut self) -> f64 {
        self.rng.gen_range(WEATHER_RANGE)
    }
}

/// Always returns the same factor.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub f64);

impl WeatherSource for FixedWeather {
    fn next_factor(&mut self) -> f64 {
        self.0
    }
}

/// Lazily yields one [`MinuteSample`] per simulated minute.
pub struct Minutes<'a, W: WeatherSource> {
    request: &'a SimulationRequest,
    weather: &'a mut W,
    minute: u32,
}

impl<W: WeatherSource> Iterator for Minutes<'_, W> {
    type Item = MinuteSample;

    fn next(&mut self) -> Option<MinuteSample> {
        if self.minute >= self.request.duration_minutes {
            return None;
        }
        let minute = self.minute;
        self.minute += 1;

        let rate = f64::from(self.request.arrival_rate_per_minute);
        let mut efficiency = self.request.profile.efficiency_multiplier;
        if self.request.peak_hour_enabled && is_peak_minute(minute) {
            efficiency *= PEAK_PENALTY;
        }

        let passed_vehicles = rate * efficiency * self.weather.next_factor();
        let wait_seconds = self.request.profile.baseline_wait_time_seconds
            * (rate / passed_vehicles.max(MIN_THROUGHPUT));

        Some(MinuteSample {
            minute,
            efficiency,
            passed_vehicles,
            wait_seconds,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.request.duration_minutes - self.minute) as usize;
        (left, Some(left))
    }
}

pub fn minutes<'a, W: WeatherSource>(
    request: &'a SimulationRequest,
    weather: &'a mut W,
) -> Minutes<'a, W> {
    Minutes {
        request,
        weather,
        minute: 0,
    }
}

/// Runs the whole request in one pass.
pub fn simulate<W: WeatherSource>(request: &SimulationRequest, weather: &mut W) -> SimulationResult {
    let samples: Vec<MinuteSample> = minutes(request, weather).collect();

    let total: f64 = samples.iter().map(|s| s.passed_vehicles.max(0.0)).sum();
    let wait_times_seconds = samples.iter().map(|s| s.wait_seconds).collect();

    tracing::debug!(
        profile = request.profile.id,
        minutes = samples.len(),
        total,
        "flow estimate finished"
    );

    SimulationResult {
        total_vehicles_processed: total as u64,
        wait_times_seconds,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    /// Replays a fixed list of factors.
    struct Scripted(std::vec::IntoIter<f64>);

    impl WeatherSource for Scripted {
        fn next_factor(&mut self) -> f64 {
            self.0.next().unwrap_or(1.0)
        }
    }

    fn request(id: &str, rate: u32, duration: u32, peak: bool) -> SimulationRequest {
        SimulationRequest::new(catalog::get_profile(id).unwrap(), rate, duration, peak).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let profile = catalog::get_profile("roundabout").unwrap();
        assert!(SimulationRequest::new(profile, 0, 10, false).is_err());
        assert!(SimulationRequest::new(profile, 10, 0, false).is_err());
        assert!(SimulationRequest::new(profile, 1, 1, false).is_ok());
    }

    #[test]
    fn test_peak_window_bounds() {
        assert!(!is_peak_minute(14));
        assert!(is_peak_minute(15));
        assert!(is_peak_minute(45));
        assert!(!is_peak_minute(46));
        assert!(is_peak_minute(75));
        assert!(!is_peak_minute(119));
    }

    #[test]
    fn test_weather_scales_throughput_and_wait() {
        let req = request("traffic_lights", 100, 2, false);
        let mut weather = Scripted(vec![0.8, 1.2].into_iter());
        let samples: Vec<_> = minutes(&req, &mut weather).collect();

        assert!((samples[0].passed_vehicles - 64.0).abs() < 1e-9);
        assert!((samples[1].passed_vehicles - 96.0).abs() < 1e-9);
        assert!((samples[0].wait_seconds - 45.0 * 100.0 / 64.0).abs() < 1e-9);
        assert!((samples[1].wait_seconds - 45.0 * 100.0 / 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_throughput_uses_floor() {
        let req = request("roundabout", 10, 3, false);
        let result = simulate(&req, &mut FixedWeather(0.0));

        assert_eq!(result.total_vehicles_processed, 0);
        assert!(result
            .wait_times_seconds
            .iter()
            .all(|w| w.is_finite() && *w > 0.0));
    }

    #[test]
    fn test_negative_throughput_is_not_counted() {
        let req = request("roundabout", 10, 2, false);
        let result = simulate(&req, &mut FixedWeather(-1.0));

        assert_eq!(result.total_vehicles_processed, 0);
        assert!(result.wait_times_seconds.iter().all(|w| *w > 0.0));
    }

    #[test]
    fn test_random_weather_stays_in_range_and_is_seeded() {
        let mut a = RandomWeather::from_seed(Some(7));
        let mut b = RandomWeather::from_seed(Some(7));
        for _ in 0..500 {
            let factor = a.next_factor();
            assert!(WEATHER_RANGE.contains(&factor));
            assert_eq!(factor, b.next_factor());
        }
    }

    #[test]
    fn test_minutes_is_lazy_and_sized() {
        let req = request("overpass", 50, 90, true);
        let mut weather = FixedWeather(1.0);
        let mut iter = minutes(&req, &mut weather);
        assert_eq!(iter.size_hint(), (90, Some(90)));
        iter.next();
        assert_eq!(iter.size_hint(), (89, Some(89)));
        assert_eq!(iter.count(), 89);
    }
}
