use crate::types::Reading;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

// Per-channel random-walk step size. Each tick perturbs a channel by a value
// drawn uniformly from (-delta/2, +delta/2), so consecutive readings never
// differ by more than delta on any channel.
const TEMPERATURE_DELTA: f64 = 1.0;
const HUMIDITY_DELTA: f64 = 2.0;
const SOIL_DELTA: f64 = 1.0;
const CO2_DELTA: f64 = 10.0;
const LIGHT_DELTA: f64 = 20.0;

// Fixed seed values the dashboard starts from.
pub fn initial_reading() -> Reading {
    Reading {
        temperature: 24.5,
        humidity: 60.2,
        soil_moisture: 45.0,
        co2: 450,
        light_intensity: 800,
        timestamp: now_timestamp(),
    }
}

// Derives the next reading from the previous one. Each channel walks
// independently; temperature/humidity/soil are rounded to one decimal, CO2
// and light are floored to integers. Values are intentionally not clamped to
// physical ranges and may drift.
pub fn next_reading(prev: &Reading, rng: &mut impl Rng) -> Reading {
    Reading {
        temperature: round1(prev.temperature + jitter(rng, TEMPERATURE_DELTA)),
        humidity: round1(prev.humidity + jitter(rng, HUMIDITY_DELTA)),
        soil_moisture: round1(prev.soil_moisture + jitter(rng, SOIL_DELTA)),
        co2: (prev.co2 as f64 + jitter(rng, CO2_DELTA)).floor() as i32,
        light_intensity: (prev.light_intensity as f64 + jitter(rng, LIGHT_DELTA)).floor() as i32,
        timestamp: now_timestamp(),
    }
}

fn jitter(rng: &mut impl Rng, delta: f64) -> f64 {
    rng.gen_range(-delta / 2.0..delta / 2.0)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn now_timestamp() -> String {
    jiff::Zoned::now().strftime("%H:%M:%S").to_string()
}

// Owns the random source so the walk is deterministic under test. Synchronous
// and pure given its RNG: no I/O, cannot fail. The 2-second cadence is owned
// by whoever drives it, not by the simulator.
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next(&mut self, prev: &Reading) -> Reading {
        next_reading(prev, &mut self.rng)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod next_reading {
    use super::*;

    #[test]
    fn channels_stay_within_delta() {
        let mut sim = Simulator::with_seed(7);
        let mut prev = initial_reading();
        for _ in 0..500 {
            let next = sim.next(&prev);
            assert!((next.temperature - prev.temperature).abs() <= TEMPERATURE_DELTA);
            assert!((next.humidity - prev.humidity).abs() <= HUMIDITY_DELTA);
            assert!((next.soil_moisture - prev.soil_moisture).abs() <= SOIL_DELTA);
            assert!((next.co2 - prev.co2).abs() as f64 <= CO2_DELTA);
            assert!((next.light_intensity - prev.light_intensity).abs() as f64 <= LIGHT_DELTA);
            prev = next;
        }
    }

    #[test]
    fn float_channels_round_to_one_decimal() {
        let mut sim = Simulator::with_seed(42);
        let mut prev = initial_reading();
        for _ in 0..100 {
            let next = sim.next(&prev);
            for v in [next.temperature, next.humidity, next.soil_moisture] {
                assert!(
                    ((v * 10.0).round() - v * 10.0).abs() < 1e-9,
                    "expected one decimal, got {v}"
                );
            }
            prev = next;
        }
    }

    #[test]
    fn seeded_walks_are_reproducible() {
        let start = initial_reading();
        let a = Simulator::with_seed(3).next(&start);
        let b = Simulator::with_seed(3).next(&start);
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.co2, b.co2);
    }
}
