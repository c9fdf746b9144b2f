use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn nil_all() -> Self {
        Self { home: 0, away: 0 }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }

    pub fn result(&self) -> MatchResult {
        if self.home > self.away {
            MatchResult::Win(Side::Home)
        } else if self.home < self.away {
            MatchResult::Win(Side::Away)
        } else {
            MatchResult::Draw
        }
    }

    pub fn flip(&self) -> Score {
        Score::new(self.away, self.home)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

/// Full-time result of a match, from the point of view of the listed home team.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchResult {
    Win(Side),
    Draw,
}
impl MatchResult {
    pub fn includes(&self, score: &Score) -> bool {
        score.result() == *self
    }
}

/// A fixture that has already been played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home: String,
    pub away: String,
    pub home_goals: u8,
    pub away_goals: u8,
}
impl MatchRecord {
    pub fn score(&self) -> Score {
        Score::new(self.home_goals, self.away_goals)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_result() {
        assert_eq!(MatchResult::Win(Side::Home), Score::new(2, 1).result());
        assert_eq!(MatchResult::Win(Side::Away), Score::new(0, 3).result());
        assert_eq!(MatchResult::Draw, Score::nil_all().result());
        assert_eq!(MatchResult::Draw, Score::new(2, 2).result());
    }

    #[test]
    fn score_flip() {
        assert_eq!(Score::new(1, 3), Score::new(3, 1).flip());
        assert_eq!(MatchResult::Win(Side::Away), Score::new(3, 1).flip().result());
    }

    #[test]
    fn result_includes() {
        assert!(MatchResult::Win(Side::Home).includes(&Score::new(1, 0)));
        assert!(!MatchResult::Win(Side::Home).includes(&Score::new(1, 1)));
        assert!(MatchResult::Draw.includes(&Score::new(1, 1)));
    }

    #[test]
    fn record_score() {
        let record = MatchRecord {
            home: "Brazil".into(),
            away: "Haiti".into(),
            home_goals: 6,
            away_goals: 0,
        };
        assert_eq!(Score::new(6, 0), record.score());
        assert_eq!(6, record.score().total());
        assert!(record.involves("Haiti"));
        assert!(!record.involves("Morocco"));
    }
}
