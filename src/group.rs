//! Group stage: a round robin within each group, then a ranked league table.

use std::cmp::Ordering;

use tinyrand::{Rand, Seeded, Wyrand};
use tracing::trace;

use crate::predictor::{MatchEngine, Predictor, Resolution};
use crate::profile::ProfileStore;

pub const POINTS_FOR_WIN: u16 = 3;
pub const POINTS_FOR_DRAW: u16 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standing {
    pub team: String,
    pub played: u16,
    pub wins: u16,
    pub draws: u16,
    pub losses: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub points: u16,
}
impl Standing {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    /// Records a match from this team's side of the scoreline.
    pub fn record(&mut self, scored: u8, conceded: u8) {
        self.played += 1;
        self.goals_for += scored as u16;
        self.goals_against += conceded as u16;
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.wins += 1;
                self.points += POINTS_FOR_WIN;
            }
            Ordering::Equal => {
                self.draws += 1;
                self.points += POINTS_FOR_DRAW;
            }
            Ordering::Less => self.losses += 1,
        }
    }

    /// Order of two standings in the table: points, then goal difference, then goals scored,
    /// then wins, all descending.
    pub fn table_order(&self, other: &Standing) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.goal_difference().cmp(&self.goal_difference()))
            .then_with(|| other.goals_for.cmp(&self.goals_for))
            .then_with(|| other.wins.cmp(&self.wins))
    }
}

/// Sorts into table order. Teams level on every criterion keep their listed order.
pub fn rank(standings: &mut [Standing]) {
    standings.sort_by(Standing::table_order);
}

/// Plays the group with the predicted scoreline of every fixture.
pub fn simulate_group(teams: &[String], predictor: &Predictor, profiles: &ProfileStore) -> Vec<Standing> {
    let engine = MatchEngine::new(predictor, profiles, Resolution::Deterministic);
    simulate_group_with(&engine, teams, &mut Wyrand::seed(0))
}

/// Every pair of teams meets once, the earlier-listed team at home. Returns the ranked table.
pub fn simulate_group_with(engine: &MatchEngine, teams: &[String], rand: &mut impl Rand) -> Vec<Standing> {
    let mut standings: Vec<_> = teams.iter().map(Standing::new).collect();
    for home in 0..teams.len() {
        for away in home + 1..teams.len() {
            let score = engine.play(&teams[home], &teams[away], rand);
            trace!("{} {}-{} {}", teams[home], score.home, score.away, teams[away]);
            standings[home].record(score.home, score.away);
            standings[away].record(score.away, score.home);
        }
    }
    rank(&mut standings);
    standings
}
