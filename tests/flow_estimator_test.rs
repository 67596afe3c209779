use traffic_sim::core::catalog;
use traffic_sim::core::estimator::{minutes, simulate, FixedWeather, RandomWeather};
use traffic_sim::core::{SimulationRequest, WeatherSource};

fn request(id: &str, rate: u32, duration: u32, peak: bool) -> SimulationRequest {
    SimulationRequest::new(catalog::get_profile(id).unwrap(), rate, duration, peak).unwrap()
}

#[test]
fn test_one_positive_wait_per_minute_for_every_profile() {
    for profile in catalog::all() {
        for duration in [1, 17, 60, 135] {
            let req = SimulationRequest::new(profile, 35, duration, true).unwrap();
            let result = simulate(&req, &mut RandomWeather::from_seed(Some(u64::from(duration))));

            assert_eq!(result.wait_times_seconds.len(), duration as usize);
            assert_eq!(result.samples.len(), duration as usize);
            assert!(
                result.wait_times_seconds.iter().all(|w| *w > 0.0),
                "{} produced a non-positive wait",
                profile.id
            );
        }
    }
}

#[test]
fn test_deterministic_baseline_without_peak() {
    // rate * efficiency is integral for these pairs, so no rounding sneaks in
    let cases = [
        ("traffic_lights", 100, 45),
        ("redesigned_lanes", 50, 30),
        ("roundabout", 73, 12),
        ("overpass", 25, 90),
    ];
    for (id, rate, duration) in cases {
        let req = request(id, rate, duration, false);
        let result = simulate(&req, &mut FixedWeather(1.0));
        let per_minute = (f64::from(rate) * req.profile.efficiency_multiplier).floor() as u64;

        assert_eq!(
            result.total_vehicles_processed,
            per_minute * u64::from(duration),
            "{}",
            id
        );
    }
}

#[test]
fn test_peak_band_uses_penalized_efficiency() {
    let req = request("roundabout", 100, 60, true);
    let result = simulate(&req, &mut FixedWeather(1.0));

    // 31 peak minutes at 70 vehicles, 29 off-peak minutes at 100
    assert_eq!(result.total_vehicles_processed, 31 * 70 + 29 * 100);

    for sample in &result.samples {
        let expected = if (15..=45).contains(&sample.minute) { 0.7 } else { 1.0 };
        assert!(
            (sample.efficiency - expected).abs() < 1e-12,
            "minute {} used efficiency {}",
            sample.minute,
            sample.efficiency
        );
    }
    assert_eq!(result.samples.iter().filter(|s| s.efficiency < 1.0).count(), 31);
}

#[test]
fn test_peak_band_repeats_every_hour() {
    let req = request("roundabout", 10, 180, true);
    let result = simulate(&req, &mut FixedWeather(1.0));
    let penalized: Vec<u32> = result
        .samples
        .iter()
        .filter(|s| s.efficiency < 1.0)
        .map(|s| s.minute)
        .collect();

    assert_eq!(penalized.len(), 93);
    assert!(penalized.contains(&75));
    assert!(penalized.contains(&165));
    assert!(!penalized.contains(&106));
}

#[test]
fn test_wait_time_tracks_shortfall() {
    let req = request("traffic_lights", 100, 1, false);
    let result = simulate(&req, &mut FixedWeather(1.0));
    // 45s baseline, 80% of arrivals get through
    assert!((result.wait_times_seconds[0] - 56.25).abs() < 1e-9);
}

#[test]
fn test_seeded_weather_is_reproducible() {
    let req = request("smart_traffic_system", 90, 240, true);
    let a = simulate(&req, &mut RandomWeather::from_seed(Some(2024)));
    let b = simulate(&req, &mut RandomWeather::from_seed(Some(2024)));
    let c = simulate(&req, &mut RandomWeather::from_seed(Some(2025)));

    assert_eq!(a.wait_times_seconds, b.wait_times_seconds);
    assert_ne!(a.wait_times_seconds, c.wait_times_seconds);
}

#[test]
fn test_weather_jitter_bounds_throughput() {
    let req = request("underground_tunnel", 50, 500, false);
    let result = simulate(&req, &mut RandomWeather::from_seed(Some(5)));
    let nominal = 50.0 * req.profile.efficiency_multiplier;

    for sample in &result.samples {
        assert!(sample.passed_vehicles >= nominal * 0.8 - 1e-9);
        assert!(sample.passed_vehicles <= nominal * 1.2 + 1e-9);
    }
}

#[test]
fn test_incremental_and_batch_agree() {
    struct Counting(u32);
    impl WeatherSource for Counting {
        fn next_factor(&mut self) -> f64 {
            self.0 += 1;
            0.9
        }
    }

    let req = request("redesigned_lanes", 40, 25, true);
    let mut weather = Counting(0);
    let incremental: Vec<f64> = minutes(&req, &mut weather)
        .map(|s| s.wait_seconds)
        .collect();
    assert_eq!(weather.0, 25);

    let batch = simulate(&req, &mut Counting(0));
    assert_eq!(incremental, batch.wait_times_seconds);
}
