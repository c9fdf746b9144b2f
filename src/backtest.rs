//! Replays past fixtures: profiles are built from the earlier part of the record, the later part
//! is predicted and scored under the pool rules.

use std::collections::HashMap;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::MatchRecord;
use crate::pool::{Scorecard, Tier};
use crate::predictor::{MatchPrediction, Predictor};
use crate::profile::{LeagueDefaults, ProfileStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Share of the records, oldest first, used to build profiles.
    pub train_ratio: f64,

    /// Latest matches per team that count towards its profile.
    pub recent_limit: Option<usize>,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            bail!("train ratio ({}) must lie strictly between 0 and 1", self.train_ratio);
        }
        if self.recent_limit == Some(0) {
            bail!("recent match limit cannot be zero");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            train_ratio: 0.7,
            recent_limit: Some(100),
        }
    }
}

/// Historical fixtures in chronological order, with the ranking table in force.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub defaults: LeagueDefaults,

    #[serde(default)]
    pub rankings: HashMap<String, f64>,

    pub records: Vec<MatchRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Backtest {
    config: Config,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub record: MatchRecord,
    pub prediction: MatchPrediction,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub train_size: usize,
    pub evaluations: Vec<Evaluation>,
    pub scorecard: Scorecard,
}

impl Backtest {
    /// Index of the first record held out for testing.
    pub fn split(&self, records: usize) -> usize {
        (records as f64 * self.config.train_ratio) as usize
    }

    pub fn run_history(&self, predictor: &Predictor, history: &History) -> BacktestReport {
        self.run(predictor, history.defaults.clone(), &history.records, &history.rankings)
    }

    /// `records` must be in chronological order.
    pub fn run(
        &self,
        predictor: &Predictor,
        defaults: LeagueDefaults,
        records: &[MatchRecord],
        rankings: &HashMap<String, f64>,
    ) -> BacktestReport {
        let (train, test) = records.split_at(self.split(records.len()));
        let profiles = ProfileStore::from_recent_results(
            defaults,
            train,
            rankings,
            self.config.recent_limit.unwrap_or(usize::MAX),
        );
        debug!(
            "training on {} record(s) covering {} team(s), testing on {}",
            train.len(),
            profiles.len(),
            test.len()
        );

        let mut scorecard = Scorecard::default();
        let evaluations = test
            .iter()
            .map(|record| {
                let prediction = predictor.predict(&record.home, &record.away, &profiles);
                let tier = scorecard.record(&prediction.score, &record.score());
                Evaluation {
                    record: record.clone(),
                    prediction,
                    tier,
                }
            })
            .collect();

        BacktestReport {
            train_size: train.len(),
            evaluations,
            scorecard,
        }
    }
}

impl BacktestReport {
    pub fn test_size(&self) -> usize {
        self.evaluations.len()
    }
}

impl TryFrom<Config> for Backtest {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self { config })
    }
}
