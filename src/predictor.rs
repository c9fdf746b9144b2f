//! Single-match prediction: profiles in, a scoreline and its probabilities out.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tinyrand::Rand;
use tracing::debug;

use crate::domain::Score;
use crate::factorial::Lookup;
use crate::pool;
use crate::profile::{ProfileStore, TeamProfile};
use crate::scoregrid::ScoreDistribution;
use crate::xg;
use crate::xg::{Adjustment, Estimator, ExpectedGoals, MatchContext};

/// Goal counts beyond this are never modelled.
pub const MAX_GOALS_LIMIT: u8 = 20;

/// Chooses how far the score grid extends. Lopsided pairings get a wider grid, so that the
/// favourite can be predicted to win by more than two goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub conservative_max_goals: u8,
    pub extended_max_goals: u8,

    /// Ranking gap at or above which the extended grid applies. `None` disables the extension.
    pub ranking_gap_threshold: Option<f64>,
}
impl RiskPolicy {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.conservative_max_goals == 0 {
            bail!("conservative goal limit must be at least 1");
        }
        if self.extended_max_goals < self.conservative_max_goals {
            bail!(
                "extended goal limit ({}) cannot be below the conservative limit ({})",
                self.extended_max_goals,
                self.conservative_max_goals
            );
        }
        if self.extended_max_goals > MAX_GOALS_LIMIT {
            bail!("extended goal limit ({}) cannot exceed {MAX_GOALS_LIMIT}", self.extended_max_goals);
        }
        if let Some(threshold) = self.ranking_gap_threshold {
            if !(threshold >= 0.0) {
                bail!("ranking gap threshold ({threshold}) cannot be negative");
            }
        }
        Ok(())
    }

    pub fn max_goals(&self, home: &TeamProfile, away: &TeamProfile) -> u8 {
        match self.ranking_gap_threshold {
            Some(threshold) if (home.ranking_score - away.ranking_score).abs() >= threshold => {
                self.extended_max_goals
            }
            _ => self.conservative_max_goals,
        }
    }
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            conservative_max_goals: 2,
            extended_max_goals: 3,
            ranking_gap_threshold: Some(200.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub estimator: xg::Config,
    pub risk: RiskPolicy,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.estimator.validate()?;
        self.risk.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchPrediction {
    pub score: Score,
    pub expected: ExpectedGoals,
    pub max_goals: u8,
    pub prob_home_win: f64,
    pub prob_draw: f64,
    pub prob_away_win: f64,
    pub prob_exact: f64,
    pub expected_points: f64,
}

pub struct Predictor {
    estimator: Estimator,
    risk: RiskPolicy,
    adjustment: Option<Box<dyn Adjustment>>,
    factorial: Lookup,
}
impl Predictor {
    pub fn with_adjustment(mut self, adjustment: impl Adjustment + 'static) -> Self {
        self.adjustment = Some(Box::new(adjustment));
        self
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn risk(&self) -> &RiskPolicy {
        &self.risk
    }

    /// Base estimate, corrected by the adjustment (if any) and confined to the estimator's bounds.
    pub fn expected_goals(&self, home: &str, away: &str, profiles: &ProfileStore) -> ExpectedGoals {
        let home_profile = profiles.get(home);
        let away_profile = profiles.get(away);
        self.expected_goals_for(home, away, &home_profile, &away_profile)
    }

    pub fn distribution(&self, home: &str, away: &str, profiles: &ProfileStore) -> ScoreDistribution {
        let home_profile = profiles.get(home);
        let away_profile = profiles.get(away);
        let expected = self.expected_goals_for(home, away, &home_profile, &away_profile);
        let max_goals = self.risk.max_goals(&home_profile, &away_profile);
        ScoreDistribution::from_univariate_poisson(&expected, max_goals, &self.factorial)
    }

    pub fn predict(&self, home: &str, away: &str, profiles: &ProfileStore) -> MatchPrediction {
        let home_profile = profiles.get(home);
        let away_profile = profiles.get(away);
        let expected = self.expected_goals_for(home, away, &home_profile, &away_profile);
        let max_goals = self.risk.max_goals(&home_profile, &away_profile);
        debug!(
            "{home} v {away}: λ=({:.3}, {:.3}), max goals {max_goals}",
            expected.home, expected.away
        );

        let distribution = ScoreDistribution::from_univariate_poisson(&expected, max_goals, &self.factorial);
        let probs = distribution.result_probs();
        let score = distribution.best_score();
        MatchPrediction {
            prob_exact: distribution.prob(&score),
            expected_points: pool::expected_points(&distribution, &score),
            score,
            expected,
            max_goals,
            prob_home_win: probs.home_win,
            prob_draw: probs.draw,
            prob_away_win: probs.away_win,
        }
    }

    fn expected_goals_for(
        &self,
        home: &str,
        away: &str,
        home_profile: &TeamProfile,
        away_profile: &TeamProfile,
    ) -> ExpectedGoals {
        let base = self.estimator.estimate(home_profile, away_profile);
        match &self.adjustment {
            None => base,
            Some(adjustment) => {
                let context = MatchContext {
                    home,
                    away,
                    home_profile,
                    away_profile,
                };
                self.estimator.clamp(adjustment.adjust(base, &context))
            }
        }
    }
}

impl TryFrom<Config> for Predictor {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            estimator: Estimator::try_from(config.estimator)?,
            risk: config.risk,
            adjustment: None,
            factorial: Lookup::default(),
        })
    }
}

/// How a simulated match arrives at its scoreline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Always play the predicted scoreline. Every simulation of the same fixtures is identical.
    Deterministic,

    /// Draw the scoreline at random from the score distribution.
    #[default]
    Sampled,
}

/// Plays simulated fixtures on behalf of the group and knockout stages.
pub struct MatchEngine<'a> {
    pub predictor: &'a Predictor,
    pub profiles: &'a ProfileStore,
    pub resolution: Resolution,
}
impl<'a> MatchEngine<'a> {
    pub fn new(predictor: &'a Predictor, profiles: &'a ProfileStore, resolution: Resolution) -> Self {
        Self {
            predictor,
            profiles,
            resolution,
        }
    }

    /// Plays a fixture. The generator is only consulted under [`Resolution::Sampled`].
    pub fn play(&self, home: &str, away: &str, rand: &mut impl Rand) -> Score {
        let distribution = self.predictor.distribution(home, away, self.profiles);
        match self.resolution {
            Resolution::Deterministic => distribution.best_score(),
            Resolution::Sampled => distribution.sample(rand),
        }
    }

    pub fn ranking(&self, team: &str) -> f64 {
        self.profiles.get(team).ranking_score
    }
}
