//! Per-team aggregated statistics, looked up with league-average defaults.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use anyhow::bail;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::domain::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub avg_goals_scored: f64,
    pub avg_goals_conceded: f64,
    pub ranking_score: f64,
    /// Matches behind the averages. Without any, the averages are replaced by the league
    /// defaults on lookup.
    pub sample_size: u32,
}
impl TeamProfile {
    pub fn has_history(&self) -> bool {
        self.sample_size > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueDefaults {
    pub avg_goals_scored: f64,
    pub avg_goals_conceded: f64,
    pub ranking_score: f64,
}
impl LeagueDefaults {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        const GOALS_RANGE: RangeInclusive<f64> = 0.0..=10.0;
        if !GOALS_RANGE.contains(&self.avg_goals_scored) {
            bail!("default goals scored ({}) outside of allowable range {GOALS_RANGE:?}", self.avg_goals_scored);
        }
        if !GOALS_RANGE.contains(&self.avg_goals_conceded) {
            bail!("default goals conceded ({}) outside of allowable range {GOALS_RANGE:?}", self.avg_goals_conceded);
        }
        if !self.ranking_score.is_finite() {
            bail!("default ranking score must be finite");
        }
        Ok(())
    }

    pub fn profile(&self) -> TeamProfile {
        TeamProfile {
            avg_goals_scored: self.avg_goals_scored,
            avg_goals_conceded: self.avg_goals_conceded,
            ranking_score: self.ranking_score,
            sample_size: 0,
        }
    }
}

impl Default for LeagueDefaults {
    fn default() -> Self {
        Self {
            avg_goals_scored: 1.3,
            avg_goals_conceded: 1.3,
            ranking_score: 1500.0,
        }
    }
}

/// Read-only source of [`TeamProfile`]s for a prediction session. Lookups never fail: an unknown
/// team resolves to the league defaults, and a team without history keeps its own ranking but
/// takes the default goal averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStore {
    #[serde(default)]
    defaults: LeagueDefaults,
    #[serde(default)]
    profiles: FxHashMap<String, TeamProfile>,
}
impl ProfileStore {
    pub fn new(defaults: LeagueDefaults) -> Self {
        Self {
            defaults,
            profiles: FxHashMap::default(),
        }
    }

    pub fn with_profile(mut self, team: impl Into<String>, profile: TeamProfile) -> Self {
        self.insert(team, profile);
        self
    }

    pub fn insert(&mut self, team: impl Into<String>, profile: TeamProfile) {
        self.profiles.insert(team.into(), profile);
    }

    pub fn defaults(&self) -> &LeagueDefaults {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn contains(&self, team: &str) -> bool {
        self.profiles.contains_key(team)
    }

    pub fn get(&self, team: &str) -> TeamProfile {
        match self.profiles.get(team) {
            None => self.defaults.profile(),
            Some(profile) if !profile.has_history() => TeamProfile {
                avg_goals_scored: self.defaults.avg_goals_scored,
                avg_goals_conceded: self.defaults.avg_goals_conceded,
                ..*profile
            },
            Some(profile) => *profile,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.defaults.validate()?;
        for (team, profile) in &self.profiles {
            if profile.avg_goals_scored < 0.0 || profile.avg_goals_conceded < 0.0 {
                bail!("negative goal averages for {team}");
            }
            if !profile.ranking_score.is_finite() {
                bail!("ranking score for {team} must be finite");
            }
            if !profile.has_history()
                && (profile.avg_goals_scored != self.defaults.avg_goals_scored
                    || profile.avg_goals_conceded != self.defaults.avg_goals_conceded)
            {
                bail!("goal averages for {team} are not backed by any matches");
            }
        }
        Ok(())
    }

    /// Aggregates goal averages from played fixtures. Rankings come from a separate table;
    /// teams absent from it take the default ranking.
    pub fn from_results(
        defaults: LeagueDefaults,
        records: &[MatchRecord],
        rankings: &HashMap<String, f64>,
    ) -> Self {
        Self::from_recent_results(defaults, records, rankings, usize::MAX)
    }

    /// As [`ProfileStore::from_results`], but each team's averages cover no more than its
    /// `limit` latest matches. `records` must be in chronological order.
    pub fn from_recent_results(
        defaults: LeagueDefaults,
        records: &[MatchRecord],
        rankings: &HashMap<String, f64>,
        limit: usize,
    ) -> Self {
        #[derive(Default)]
        struct Totals {
            played: u32,
            scored: u32,
            conceded: u32,
        }
        impl Totals {
            fn add(&mut self, scored: u8, conceded: u8, limit: usize) {
                if (self.played as usize) < limit {
                    self.played += 1;
                    self.scored += scored as u32;
                    self.conceded += conceded as u32;
                }
            }
        }

        let mut totals: FxHashMap<&str, Totals> = FxHashMap::default();
        for record in records.iter().rev() {
            totals
                .entry(record.home.as_str())
                .or_default()
                .add(record.home_goals, record.away_goals, limit);
            totals
                .entry(record.away.as_str())
                .or_default()
                .add(record.away_goals, record.home_goals, limit);
        }

        let mut store = Self::new(defaults);
        for (team, totals) in totals.into_iter().filter(|(_, totals)| totals.played > 0) {
            let ranking_score = rankings
                .get(team)
                .copied()
                .unwrap_or(store.defaults.ranking_score);
            store.insert(
                team,
                TeamProfile {
                    avg_goals_scored: totals.scored as f64 / totals.played as f64,
                    avg_goals_conceded: totals.conceded as f64 / totals.played as f64,
                    ranking_score,
                    sample_size: totals.played,
                },
            );
        }
        for (team, &ranking_score) in rankings {
            if !store.contains(team) {
                store.insert(
                    team.clone(),
                    TeamProfile {
                        ranking_score,
                        ..store.defaults.profile()
                    },
                );
            }
        }
        store
    }
}
