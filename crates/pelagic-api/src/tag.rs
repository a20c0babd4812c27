//! Shark-tag simulation.
//!
//! Generates a plausible biologging record for a simulated tag deployment:
//! a behavioral state walk (resting, traveling, hunting, feeding), an
//! accelerometer trace that spikes during feeding, a depth trace with dive
//! cycles, and the list of detected feeding events. Feeding likelihood
//! scales with the mean habitat quality of the loaded field, which is the
//! whole point of the demonstration: better predicted habitat, more
//! feeding.

use pelagic_types::{FeedingEvent, TagResults};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sensor samples per simulated hour. A 4-hour deployment yields the 100
/// steps the dashboard player steps through.
pub const SAMPLES_PER_HOUR: f64 = 25.0;

/// Shortest accepted deployment.
pub const MIN_DURATION_HOURS: f64 = 0.5;

/// Longest accepted deployment.
pub const MAX_DURATION_HOURS: f64 = 48.0;

/// Behavioral states, by wire code.
const RESTING: u8 = 0;
const TRAVELING: u8 = 1;
const HUNTING: u8 = 2;
const FEEDING: u8 = 3;

/// Tag release region, matching the dashboard's map extent.
const LAT_RANGE: (f64, f64) = (32.0, 36.0);
const LON_RANGE: (f64, f64) = (-120.0, -116.0);

/// Run a simulated tag deployment.
///
/// `duration_hours` is clamped to the accepted range. `habitat_quality`
/// is the mean habitat index in `[0, 1]`; it scales how often hunting
/// turns into feeding. The same `(seed, duration)` pair always produces
/// the same record.
pub fn simulate(duration_hours: f64, habitat_quality: f64, seed: u64) -> TagResults {
    let duration = if duration_hours.is_finite() {
        duration_hours.clamp(MIN_DURATION_HOURS, MAX_DURATION_HOURS)
    } else {
        MIN_DURATION_HOURS
    };
    let quality = habitat_quality.clamp(0.0, 1.0);

    let mut rng = StdRng::seed_from_u64(seed ^ duration.to_bits());

    // Sample count is bounded by MAX_DURATION_HOURS * SAMPLES_PER_HOUR,
    // far below any integer edge.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let samples = (duration * SAMPLES_PER_HOUR).round().max(1.0) as usize;

    let track_lat = rng.random_range(LAT_RANGE.0..LAT_RANGE.1);
    let track_lon = rng.random_range(LON_RANGE.0..LON_RANGE.1);

    let mut behavioral_states = Vec::with_capacity(samples);
    let mut accelerometer_data = Vec::with_capacity(samples);
    let mut depth_data = Vec::with_capacity(samples);
    let mut feeding_events = Vec::new();

    let mut state = RESTING;
    let mut feeding_left = 0u32;
    let mut depth = 25.0_f64;

    for sample in 0..samples {
        let (next, entered_feeding) = next_state(state, &mut feeding_left, quality, &mut rng);
        state = next;

        if entered_feeding {
            // First sample of a feeding bout: record the event.
            let hours = index_fraction(sample) / SAMPLES_PER_HOUR;
            feeding_events.push(FeedingEvent {
                timestamp: hours,
                duration: rng.random_range(10.0..120.0),
                intensity: (0.4 + 0.6 * quality * rng.random_range(0.5..1.0)).min(1.0),
                location: (
                    track_lat + rng.random_range(-0.05..0.05),
                    track_lon + rng.random_range(-0.05..0.05),
                ),
            });
        }

        behavioral_states.push(state);
        accelerometer_data.push(accelerometer_sample(state, &mut rng));

        depth = next_depth(depth, state, &mut rng);
        depth_data.push(depth);
    }

    TagResults {
        feeding_events,
        behavioral_states,
        accelerometer_data,
        depth_data,
    }
}

/// Advance the behavioral state machine by one sample.
///
/// Returns the new state and whether a feeding bout started on this
/// sample. Feeding bouts are entered from hunting with a probability
/// scaled by habitat quality and last a few samples tracked by
/// `feeding_left`.
fn next_state(current: u8, feeding_left: &mut u32, quality: f64, rng: &mut StdRng) -> (u8, bool) {
    if *feeding_left > 0 {
        *feeding_left = feeding_left.saturating_sub(1);
        if *feeding_left > 0 {
            return (FEEDING, false);
        }
        return (RESTING, false);
    }

    let roll: f64 = rng.random_range(0.0..1.0);
    let next = match current {
        RESTING => {
            if roll < 0.25 {
                TRAVELING
            } else {
                RESTING
            }
        }
        TRAVELING => {
            if roll < 0.2 {
                HUNTING
            } else if roll < 0.3 {
                RESTING
            } else {
                TRAVELING
            }
        }
        HUNTING => {
            // Habitat quality decides whether the hunt pays off.
            if roll < 0.1 + 0.4 * quality {
                *feeding_left = feeding_duration_samples(rng);
                return (FEEDING, true);
            }
            if roll < 0.7 { HUNTING } else { TRAVELING }
        }
        _ => TRAVELING,
    };
    (next, false)
}

/// How many samples a feeding bout lasts.
fn feeding_duration_samples(rng: &mut StdRng) -> u32 {
    rng.random_range(2..=4)
}

/// Accelerometer magnitude for a state, with noise.
fn accelerometer_sample(state: u8, rng: &mut StdRng) -> f64 {
    let base = match state {
        RESTING => 0.2,
        TRAVELING => 0.6,
        HUNTING => 1.0,
        _ => 1.8,
    };
    base + rng.random_range(-0.1..0.1)
}

/// Advance the depth trace: a bounded random walk with a downward bias
/// while hunting and an upward drift while resting.
fn next_depth(current: f64, state: u8, rng: &mut StdRng) -> f64 {
    let bias = match state {
        RESTING => -1.5,
        TRAVELING => 0.0,
        HUNTING => 2.5,
        _ => 1.0,
    };
    (current + bias + rng.random_range(-3.0..3.0)).clamp(0.0, 200.0)
}

/// Convert a sample index to f64 for timestamp math.
fn index_fraction(index: usize) -> f64 {
    // Sample counts stay far below the f64 mantissa limit.
    #[allow(clippy::cast_precision_loss)]
    let value = index as f64;
    value
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;

    #[test]
    fn four_hours_yields_one_hundred_samples() {
        let results = simulate(4.0, 0.5, 42);
        assert_eq!(results.behavioral_states.len(), 100);
        assert_eq!(results.accelerometer_data.len(), 100);
        assert_eq!(results.depth_data.len(), 100);
    }

    #[test]
    fn deployment_is_deterministic_per_seed() {
        let a = simulate(4.0, 0.5, 42);
        let b = simulate(4.0, 0.5, 42);
        assert_eq!(a, b);

        let c = simulate(4.0, 0.5, 7);
        assert_ne!(a, c);
    }

    #[test]
    fn duration_is_clamped() {
        let short = simulate(0.0, 0.5, 42);
        assert_eq!(
            short.behavioral_states.len(),
            (MIN_DURATION_HOURS * SAMPLES_PER_HOUR) as usize
        );

        let long = simulate(1000.0, 0.5, 42);
        assert_eq!(
            long.behavioral_states.len(),
            (MAX_DURATION_HOURS * SAMPLES_PER_HOUR) as usize
        );
    }

    #[test]
    fn states_and_traces_stay_in_range() {
        let results = simulate(8.0, 0.9, 42);
        assert!(results.behavioral_states.iter().all(|&s| s <= FEEDING));
        assert!(results.depth_data.iter().all(|&d| (0.0..=200.0).contains(&d)));
        for event in &results.feeding_events {
            assert!((0.0..=8.0).contains(&event.timestamp));
            assert!((0.0..=1.0).contains(&event.intensity));
        }
    }

    #[test]
    fn feeding_events_match_feeding_samples() {
        let results = simulate(12.0, 1.0, 42);
        let has_feeding_samples = results.behavioral_states.contains(&FEEDING);
        assert_eq!(has_feeding_samples, !results.feeding_events.is_empty());
    }

    #[test]
    fn each_feeding_bout_yields_exactly_one_event() {
        for seed in 0..10u64 {
            let results = simulate(24.0, 1.0, seed);

            let mut bouts = 0usize;
            let mut previous = RESTING;
            for &state in &results.behavioral_states {
                if state == FEEDING && previous != FEEDING {
                    bouts = bouts.saturating_add(1);
                }
                previous = state;
            }

            assert_eq!(results.feeding_events.len(), bouts);
            assert!(bouts > 0);
        }
    }

    #[test]
    fn barren_habitat_feeds_less_than_rich_habitat() {
        let barren: usize = (0..20u64)
            .map(|seed| simulate(24.0, 0.0, seed).feeding_events.len())
            .sum();
        let rich: usize = (0..20u64)
            .map(|seed| simulate(24.0, 1.0, seed).feeding_events.len())
            .sum();
        assert!(rich > barren);
    }
}
