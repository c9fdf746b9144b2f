//! Expected goals: turns two opposing [`TeamProfile`]s into a pair of Poisson rates.

use std::ops::RangeInclusive;

use anyhow::bail;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::domain::MatchRecord;
use crate::profile::TeamProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}
impl ExpectedGoals {
    pub fn new(home: f64, away: f64) -> Self {
        Self { home, away }
    }

    pub fn flip(&self) -> Self {
        Self {
            home: self.away,
            away: self.home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Venue {
    /// Tournament play at a neutral ground; neither side is favoured.
    #[default]
    Neutral,

    /// The listed home side plays at its own ground and gains a fixed number of goals.
    Hosted { advantage: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub league_mean: f64,
    pub shrinkage: f64,
    pub ranking_scale: f64,
    pub ranking_diff_cap: f64,
    pub ranking_weight: f64,
    pub min_factor: f64,
    pub max_factor: f64,
    pub min_lambda: f64,
    pub max_lambda: f64,
    pub venue: Venue,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        const UNIT_RANGE: RangeInclusive<f64> = 0.0..=1.0;
        if !(self.league_mean > 0.0) {
            bail!("league mean ({}) must be positive", self.league_mean);
        }
        if !UNIT_RANGE.contains(&self.shrinkage) {
            bail!("shrinkage ({}) outside of allowable range {UNIT_RANGE:?}", self.shrinkage);
        }
        if !(self.ranking_scale > 0.0) {
            bail!("ranking scale ({}) must be positive", self.ranking_scale);
        }
        if !(self.ranking_diff_cap >= 0.0) {
            bail!("ranking diff cap ({}) cannot be negative", self.ranking_diff_cap);
        }
        if !(self.ranking_weight >= 0.0) {
            bail!("ranking weight ({}) cannot be negative", self.ranking_weight);
        }
        if !(self.min_factor > 0.0 && self.min_factor <= 1.0 && self.max_factor >= 1.0) {
            bail!(
                "ranking factor bounds [{}, {}] must straddle 1",
                self.min_factor,
                self.max_factor
            );
        }
        if !(self.min_lambda > 0.0 && self.min_lambda <= self.max_lambda) {
            bail!(
                "expected goals bounds [{}, {}] must be positive and ordered",
                self.min_lambda,
                self.max_lambda
            );
        }
        if let Venue::Hosted { advantage } = self.venue {
            if !(advantage >= 0.0) {
                bail!("home advantage ({advantage}) cannot be negative");
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            league_mean: 1.3,
            shrinkage: 0.05,
            ranking_scale: 1000.0,
            ranking_diff_cap: 0.5,
            ranking_weight: 0.2,
            min_factor: 0.8,
            max_factor: 1.2,
            min_lambda: 0.3,
            max_lambda: 3.0,
            venue: Venue::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimator {
    config: Config,
}
impl Estimator {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn estimate(&self, home: &TeamProfile, away: &TeamProfile) -> ExpectedGoals {
        let config = &self.config;
        let raw_home = (home.avg_goals_scored + away.avg_goals_conceded) / 2.0;
        let raw_away = (away.avg_goals_scored + home.avg_goals_conceded) / 2.0;

        let diff = ((home.ranking_score - away.ranking_score) / config.ranking_scale)
            .clamp(-config.ranking_diff_cap, config.ranking_diff_cap);
        let home_factor = (1.0 + diff * config.ranking_weight).clamp(config.min_factor, config.max_factor);
        let away_factor = (1.0 - diff * config.ranking_weight).clamp(config.min_factor, config.max_factor);

        let mut expected = ExpectedGoals {
            home: self.shrink(raw_home * home_factor),
            away: self.shrink(raw_away * away_factor),
        };
        if let Venue::Hosted { advantage } = config.venue {
            expected.home += advantage;
        }
        self.clamp(expected)
    }

    /// Confines both rates to the configured bounds. A rate that is not a number is pinned to
    /// the lower bound.
    pub fn clamp(&self, expected: ExpectedGoals) -> ExpectedGoals {
        let bound = |lambda: f64| {
            if lambda.is_nan() {
                self.config.min_lambda
            } else {
                lambda.clamp(self.config.min_lambda, self.config.max_lambda)
            }
        };
        ExpectedGoals {
            home: bound(expected.home),
            away: bound(expected.away),
        }
    }

    #[inline]
    fn shrink(&self, raw: f64) -> f64 {
        (1.0 - self.config.shrinkage) * raw + self.config.shrinkage * self.config.league_mean
    }
}

impl TryFrom<Config> for Estimator {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self { config })
    }
}

/// The teams involved in a fixture, as seen by an [`Adjustment`].
#[derive(Debug)]
pub struct MatchContext<'a> {
    pub home: &'a str,
    pub away: &'a str,
    pub home_profile: &'a TeamProfile,
    pub away_profile: &'a TeamProfile,
}

/// A correction applied to the base estimate before the score grid is built.
pub trait Adjustment: Send + Sync {
    fn adjust(&self, base: ExpectedGoals, context: &MatchContext) -> ExpectedGoals;
}

#[derive(Debug, Clone, Default, PartialEq)]
struct FormRecord {
    matches: u32,
    goals_for: u32,
    goals_against: u32,
}

/// Blends the base rate with a team's scoring in matches already played at the tournament. The
/// weight grows with every match played, up to `max_weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentForm {
    weight_per_match: f64,
    max_weight: f64,
    records: FxHashMap<String, FormRecord>,
}
impl TournamentForm {
    pub fn from_results(records: &[MatchRecord]) -> Self {
        let mut form = Self {
            weight_per_match: 0.15,
            max_weight: 0.7,
            records: FxHashMap::default(),
        };
        for record in records {
            form.record(record);
        }
        form
    }

    pub fn with_weights(mut self, weight_per_match: f64, max_weight: f64) -> Self {
        self.weight_per_match = weight_per_match;
        self.max_weight = max_weight;
        self
    }

    pub fn record(&mut self, record: &MatchRecord) {
        let home = self.records.entry(record.home.clone()).or_default();
        home.matches += 1;
        home.goals_for += record.home_goals as u32;
        home.goals_against += record.away_goals as u32;

        let away = self.records.entry(record.away.clone()).or_default();
        away.matches += 1;
        away.goals_for += record.away_goals as u32;
        away.goals_against += record.home_goals as u32;
    }

    pub fn matches_played(&self, team: &str) -> u32 {
        self.records.get(team).map_or(0, |record| record.matches)
    }

    fn blend(&self, team: &str, base: f64) -> f64 {
        match self.records.get(team) {
            Some(record) if record.matches > 0 => {
                let weight = f64::min(self.max_weight, record.matches as f64 * self.weight_per_match);
                let avg_goals_for = record.goals_for as f64 / record.matches as f64;
                (1.0 - weight) * base + weight * avg_goals_for
            }
            _ => base,
        }
    }
}

impl Adjustment for TournamentForm {
    fn adjust(&self, base: ExpectedGoals, context: &MatchContext) -> ExpectedGoals {
        ExpectedGoals {
            home: self.blend(context.home, base.home),
            away: self.blend(context.away, base.away),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use assert_float_eq::*;

    fn estimator(config: Config) -> Estimator {
        Estimator::try_from(config).unwrap()
    }

    #[test]
    fn estimate_favours_higher_ranking() {
        let expected = estimator(Config::default()).estimate(&testing::brazil(), &testing::haiti());
        assert_float_absolute_eq!(1.70052, expected.home, 1e-9);
        assert_float_absolute_eq!(1.465091, expected.away, 1e-9);
    }

    #[test]
    fn estimate_identical_profiles() {
        let profile = testing::league_average();
        let expected = estimator(Config::default()).estimate(&profile, &profile);
        assert_eq!(expected.home, expected.away);
        assert_float_absolute_eq!(1.3, expected.home, 1e-12);
    }

    #[test]
    fn estimate_is_symmetric_on_neutral_ground() {
        let estimator = estimator(Config::default());
        let forward = estimator.estimate(&testing::brazil(), &testing::haiti());
        let reverse = estimator.estimate(&testing::haiti(), &testing::brazil());
        assert_float_absolute_eq!(forward.home, reverse.away, 1e-12);
        assert_float_absolute_eq!(forward.away, reverse.home, 1e-12);
    }

    #[test]
    fn hosted_venue_adds_advantage() {
        let neutral = estimator(Config::default());
        let hosted = estimator(Config {
            venue: Venue::Hosted { advantage: 0.3 },
            ..Config::default()
        });
        let profile = testing::league_average();
        let neutral = neutral.estimate(&profile, &profile);
        let hosted = hosted.estimate(&profile, &profile);
        assert_float_absolute_eq!(neutral.home + 0.3, hosted.home, 1e-12);
        assert_eq!(neutral.away, hosted.away);
    }

    #[test]
    fn ranking_influence_is_bounded() {
        let estimator = estimator(Config::default());
        let giant = testing::profile(1.3, 1.3, 9000.0);
        let minnow = testing::profile(1.3, 1.3, 0.0);
        let expected = estimator.estimate(&giant, &minnow);
        // diff is capped at 0.5, giving factors of 1.1 and 0.9
        assert_float_absolute_eq!(0.95 * 1.3 * 1.1 + 0.05 * 1.3, expected.home, 1e-12);
        assert_float_absolute_eq!(0.95 * 1.3 * 0.9 + 0.05 * 1.3, expected.away, 1e-12);
    }

    #[test]
    fn estimate_is_clamped() {
        let estimator = estimator(Config::default());
        let prolific = testing::profile(9.0, 0.0, 1500.0);
        let barren = testing::profile(0.0, 9.0, 1500.0);
        let expected = estimator.estimate(&prolific, &barren);
        assert_eq!(3.0, expected.home);
        assert_eq!(0.3, expected.away);
    }

    #[test]
    fn clamp_pins_nan_to_lower_bound() {
        let estimator = estimator(Config::default());
        let clamped = estimator.clamp(ExpectedGoals::new(f64::NAN, -2.0));
        assert_eq!(ExpectedGoals::new(0.3, 0.3), clamped);
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let err = Estimator::try_from(Config {
            min_lambda: 3.0,
            max_lambda: 0.3,
            ..Config::default()
        })
        .unwrap_err();
        assert_eq!(
            "expected goals bounds [3, 0.3] must be positive and ordered",
            err.to_string()
        );
    }

    #[test]
    fn tournament_form_blends_observed_scoring() {
        let form = TournamentForm::from_results(&[
            MatchRecord {
                home: "Brazil".into(),
                away: "Haiti".into(),
                home_goals: 4,
                away_goals: 0,
            },
            MatchRecord {
                home: "Morocco".into(),
                away: "Brazil".into(),
                home_goals: 1,
                away_goals: 2,
            },
        ]);
        assert_eq!(2, form.matches_played("Brazil"));
        assert_eq!(0, form.matches_played("Scotland"));

        let brazil = testing::brazil();
        let scotland = testing::league_average();
        let adjusted = form.adjust(
            ExpectedGoals::new(1.5, 1.0),
            &MatchContext {
                home: "Brazil",
                away: "Scotland",
                home_profile: &brazil,
                away_profile: &scotland,
            },
        );
        // two matches carry a weight of 0.3 towards Brazil's 3 goals per game
        assert_float_absolute_eq!(0.7 * 1.5 + 0.3 * 3.0, adjusted.home, 1e-12);
        assert_eq!(1.0, adjusted.away);
    }

    #[test]
    fn tournament_form_weight_is_capped() {
        let records: Vec<_> = (0..10)
            .map(|_| MatchRecord {
                home: "Japan".into(),
                away: "Qatar".into(),
                home_goals: 2,
                away_goals: 0,
            })
            .collect();
        let form = TournamentForm::from_results(&records);
        let japan = testing::league_average();
        let adjusted = form.adjust(
            ExpectedGoals::new(1.0, 1.0),
            &MatchContext {
                home: "Japan",
                away: "Qatar",
                home_profile: &japan,
                away_profile: &japan,
            },
        );
        assert_float_absolute_eq!(0.3 * 1.0 + 0.7 * 2.0, adjusted.home, 1e-12);
        assert_float_absolute_eq!(0.3 * 1.0, adjusted.away, 1e-12);
    }
}
