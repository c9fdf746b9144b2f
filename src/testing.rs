//! Testing helpers.

use assert_float_eq::*;

use crate::profile::TeamProfile;

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

pub fn profile(avg_goals_scored: f64, avg_goals_conceded: f64, ranking_score: f64) -> TeamProfile {
    TeamProfile {
        avg_goals_scored,
        avg_goals_conceded,
        ranking_score,
        sample_size: 60,
    }
}

/// Brazil's record going into the tournament.
pub fn brazil() -> TeamProfile {
    profile(1.94, 0.74, 1760.0)
}

/// A high-scoring but lowly ranked side.
pub fn haiti() -> TeamProfile {
    profile(2.45, 1.26, 1380.0)
}

pub fn league_average() -> TeamProfile {
    profile(1.3, 1.3, 1500.0)
}

pub fn dominant() -> TeamProfile {
    profile(2.5, 0.4, 1850.0)
}

/// Three weak sides that lose to [`dominant`] under the default predictor.
pub fn minnows() -> [TeamProfile; 3] {
    [
        profile(1.0, 1.6, 1450.0),
        profile(1.1, 1.5, 1480.0),
        profile(0.9, 1.7, 1420.0),
    ]
}
