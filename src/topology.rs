//! Shape of the tournament: the groups, how many third-placed teams go through, and
//! (optionally) the fixed pairings of the first knockout round.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Places in each group that qualify outright.
pub const AUTOMATIC_PLACES: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub teams: Vec<String>,
}
impl Group {
    pub fn new(name: impl Into<String>, teams: &[&str]) -> Self {
        Self {
            name: name.into(),
            teams: teams.iter().map(|&team| team.into()).collect(),
        }
    }
}

/// A seat in the knockout bracket, written `1A` (winner of group A), `2B` (runner-up of
/// group B) or `3rd:1` (the best-ranked third-placed team).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Slot {
    GroupPlace { group: String, place: u8 },
    BestThird(u8),
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::GroupPlace { group, place } => write!(f, "{place}{group}"),
            Slot::BestThird(rank) => write!(f, "3rd:{rank}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid slot '{0}', expected a form such as 1A, 2B or 3rd:1")]
pub struct SlotParseError(String);

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SlotParseError(s.into());
        if let Some(rank) = s.strip_prefix("3rd:") {
            let rank = rank.parse().map_err(|_| err())?;
            return Ok(Slot::BestThird(rank));
        }
        let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(err)?;
        let (place, group) = s.split_at(split);
        let place = place.parse().map_err(|_| err())?;
        Ok(Slot::GroupPlace {
            group: group.into(),
            place,
        })
    }
}

impl TryFrom<String> for Slot {
    type Error = SlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Slot::from_str(&value)
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("no groups defined")]
    NoGroups,

    #[error("group {0} is defined more than once")]
    DuplicateGroup(String),

    #[error("group {group} has {teams} team(s), at least 2 are required")]
    UndersizedGroup { group: String, teams: usize },

    #[error("team {0} is drawn more than once")]
    DuplicateTeam(String),

    #[error("{best_thirds} best thirds requested from {groups} group(s)")]
    TooManyThirds { best_thirds: usize, groups: usize },

    #[error("bracket slot {0} does not refer to a qualifier")]
    UnknownSlot(Slot),

    #[error("bracket slot {0} is used more than once")]
    ReusedSlot(Slot),

    #[error("bracket seats {actual} qualifiers, expected {expected}")]
    IncompleteBracket { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub groups: Vec<Group>,

    #[serde(default = "default_best_thirds")]
    pub best_thirds: usize,

    /// First-round pairings. Without one, qualifiers are paired in the order 1A, 2A, 1B, 2B, …
    /// followed by the best thirds in rank order.
    #[serde(default)]
    pub bracket: Option<Vec<(Slot, Slot)>>,
}

fn default_best_thirds() -> usize {
    8
}

impl Topology {
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups,
            best_thirds: default_best_thirds(),
            bracket: None,
        }
    }

    pub fn with_best_thirds(mut self, best_thirds: usize) -> Self {
        self.best_thirds = best_thirds;
        self
    }

    pub fn with_bracket(mut self, bracket: Vec<(Slot, Slot)>) -> Self {
        self.bracket = Some(bracket);
        self
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|group| group.teams.iter().map(String::as_str))
    }

    /// Number of teams entering the knockout stage.
    pub fn qualifier_count(&self) -> usize {
        self.groups.len() * AUTOMATIC_PLACES as usize + self.best_thirds
    }

    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.groups.is_empty() {
            return Err(TopologyError::NoGroups);
        }

        let mut group_names = FxHashSet::default();
        let mut teams = FxHashSet::default();
        for group in &self.groups {
            if !group_names.insert(group.name.as_str()) {
                return Err(TopologyError::DuplicateGroup(group.name.clone()));
            }
            if group.teams.len() < AUTOMATIC_PLACES as usize {
                return Err(TopologyError::UndersizedGroup {
                    group: group.name.clone(),
                    teams: group.teams.len(),
                });
            }
            for team in &group.teams {
                if !teams.insert(team.as_str()) {
                    return Err(TopologyError::DuplicateTeam(team.clone()));
                }
            }
        }

        let groups_with_thirds = self
            .groups
            .iter()
            .filter(|group| group.teams.len() > AUTOMATIC_PLACES as usize)
            .count();
        if self.best_thirds > groups_with_thirds {
            return Err(TopologyError::TooManyThirds {
                best_thirds: self.best_thirds,
                groups: groups_with_thirds,
            });
        }

        if let Some(bracket) = &self.bracket {
            let mut seated = FxHashSet::default();
            for slot in bracket.iter().flat_map(|(home, away)| [home, away]) {
                if !self.is_qualifier(slot) {
                    return Err(TopologyError::UnknownSlot(slot.clone()));
                }
                if !seated.insert(slot) {
                    return Err(TopologyError::ReusedSlot(slot.clone()));
                }
            }
            if seated.len() != self.qualifier_count() {
                return Err(TopologyError::IncompleteBracket {
                    expected: self.qualifier_count(),
                    actual: seated.len(),
                });
            }
        }
        Ok(())
    }

    fn is_qualifier(&self, slot: &Slot) -> bool {
        match slot {
            Slot::GroupPlace { group, place } => {
                (1..=AUTOMATIC_PLACES).contains(place) && self.group(group).is_some()
            }
            Slot::BestThird(rank) => *rank >= 1 && (*rank as usize) <= self.best_thirds,
        }
    }
}
