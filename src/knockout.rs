//! From group tables to a podium: qualification, then single elimination.

use std::cmp::Ordering;

use tinyrand::Rand;
use tracing::trace;

use crate::domain::{MatchResult, Side};
use crate::group::Standing;
use crate::predictor::MatchEngine;
use crate::topology::{Slot, Topology, AUTOMATIC_PLACES};

/// Teams through to the knockout stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifiers {
    /// Group name and its automatic qualifiers in finishing order.
    places: Vec<(String, Vec<String>)>,
    best_thirds: Vec<String>,
}
impl Qualifiers {
    pub fn group_place(&self, group: &str, place: u8) -> Option<&str> {
        let index = (place as usize).checked_sub(1)?;
        self.places
            .iter()
            .find(|(name, _)| name == group)
            .and_then(|(_, teams)| teams.get(index))
            .map(String::as_str)
    }

    /// The third-placed team of the given rank, counting from 1.
    pub fn best_third(&self, rank: u8) -> Option<&str> {
        let index = (rank as usize).checked_sub(1)?;
        self.best_thirds.get(index).map(String::as_str)
    }

    pub fn best_thirds(&self) -> &[String] {
        &self.best_thirds
    }

    pub fn resolve(&self, slot: &Slot) -> Option<&str> {
        match slot {
            Slot::GroupPlace { group, place } => self.group_place(group, *place),
            Slot::BestThird(rank) => self.best_third(*rank),
        }
    }

    pub fn len(&self) -> usize {
        self.places.iter().map(|(_, teams)| teams.len()).sum::<usize>() + self.best_thirds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Qualifiers in first-round order: seated by the bracket if there is one, otherwise group
    /// by group and then the best thirds. Seats that cannot be filled are left out.
    pub fn entrants(&self, bracket: Option<&[(Slot, Slot)]>) -> Vec<String> {
        match bracket {
            Some(bracket) => bracket
                .iter()
                .flat_map(|(home, away)| [home, away])
                .filter_map(|slot| self.resolve(slot))
                .map(str::to_owned)
                .collect(),
            None => self
                .places
                .iter()
                .flat_map(|(_, teams)| teams.iter())
                .chain(self.best_thirds.iter())
                .cloned()
                .collect(),
        }
    }
}

/// Order of third-placed teams across groups: points, then goal difference, then goals scored.
fn third_place_order(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Takes the top two of every group and the best thirds. `tables` holds a ranked table for
/// each group of the topology, in the same order.
pub fn qualify(topology: &Topology, tables: &[Vec<Standing>]) -> Qualifiers {
    let automatic = AUTOMATIC_PLACES as usize;
    let places = topology
        .groups
        .iter()
        .zip(tables)
        .map(|(group, table)| {
            let teams = table
                .iter()
                .take(automatic)
                .map(|standing| standing.team.clone())
                .collect();
            (group.name.clone(), teams)
        })
        .collect();

    let mut thirds: Vec<_> = tables.iter().filter_map(|table| table.get(automatic)).collect();
    thirds.sort_by(|a, b| third_place_order(a, b));
    let best_thirds = thirds
        .into_iter()
        .take(topology.best_thirds)
        .map(|standing| standing.team.clone())
        .collect();

    Qualifiers { places, best_thirds }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentOutcome {
    pub champion: Option<String>,
    pub runner_up: Option<String>,
    pub third_place: Option<String>,
}
impl TournamentOutcome {
    pub fn undetermined() -> Self {
        Self::default()
    }

    pub fn is_determined(&self) -> bool {
        self.champion.is_some()
    }
}

/// Plays a knockout match to a winner. A drawn scoreline goes to the side with the higher
/// ranking score, or to the listed home side if the rankings are level. This stands in for
/// extra time and penalties. Returns `(winner, loser)`.
pub fn play_off<'t>(
    engine: &MatchEngine,
    home: &'t str,
    away: &'t str,
    rand: &mut impl Rand,
) -> (&'t str, &'t str) {
    let score = engine.play(home, away, rand);
    let home_wins = match score.result() {
        MatchResult::Win(Side::Home) => true,
        MatchResult::Win(Side::Away) => false,
        MatchResult::Draw => {
            let home_wins = engine.ranking(home) >= engine.ranking(away);
            trace!(
                "{home} {}-{} {away}, awarded to {} on ranking",
                score.home,
                score.away,
                if home_wins { home } else { away }
            );
            home_wins
        }
    };
    if home_wins {
        (home, away)
    } else {
        (away, home)
    }
}

/// Single elimination over `entrants`, paired in the given order. When the field is not a
/// power of two, the leading entrants receive byes through the opening round so that every
/// later round halves it. Four teams then contest the semifinals, the final and the
/// third-place match. Fewer than four entrants leave the podium undetermined.
pub fn run_knockout(engine: &MatchEngine, entrants: &[String], rand: &mut impl Rand) -> TournamentOutcome {
    if entrants.len() < 4 {
        return TournamentOutcome::undetermined();
    }

    let byes = opening_byes(entrants.len());
    let (seeded, contested) = entrants.split_at(byes);
    if byes > 0 {
        trace!("{byes} bye(s) into the second round");
    }
    let mut remaining: Vec<&str> = seeded
        .iter()
        .map(String::as_str)
        .chain(contested.chunks_exact(2).map(|pair| play_off(engine, &pair[0], &pair[1], rand).0))
        .collect();
    while remaining.len() > 4 {
        remaining = remaining
            .chunks_exact(2)
            .map(|pair| play_off(engine, pair[0], pair[1], rand).0)
            .collect();
    }

    match remaining[..] {
        [first, second, third, fourth] => {
            let (finalist_1, semi_loser_1) = play_off(engine, first, second, rand);
            let (finalist_2, semi_loser_2) = play_off(engine, third, fourth, rand);
            let (champion, runner_up) = play_off(engine, finalist_1, finalist_2, rand);
            let (third_place, _) = play_off(engine, semi_loser_1, semi_loser_2, rand);
            TournamentOutcome {
                champion: Some(champion.into()),
                runner_up: Some(runner_up.into()),
                third_place: Some(third_place.into()),
            }
        }
        _ => TournamentOutcome::undetermined(),
    }
}

/// Entrants excused from the opening round so that the remainder reduces the field to the
/// largest power of two not above it.
fn opening_byes(entrants: usize) -> usize {
    if entrants == 0 {
        return 0;
    }
    let target = 1 << entrants.ilog2();
    if target == entrants {
        0
    } else {
        2 * target - entrants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{Config, Predictor, Resolution};
    use crate::profile::ProfileStore;
    use crate::testing;
    use crate::topology::Group;
    use std::str::FromStr;
    use tinyrand::{Seeded, Wyrand};

    fn names(teams: &[&str]) -> Vec<String> {
        teams.iter().map(|&team| team.into()).collect()
    }

    fn profiles() -> ProfileStore {
        let [first, second, third] = testing::minnows();
        ProfileStore::default()
            .with_profile("Dominant", testing::dominant())
            .with_profile("Minnow1", first)
            .with_profile("Minnow2", second)
            .with_profile("Minnow3", third)
            .with_profile("Panama", testing::profile(1.3, 1.3, 1500.0))
            .with_profile("Uruguay", testing::profile(1.3, 1.3, 1510.0))
            .with_profile("Scotland", testing::league_average())
            .with_profile("Ecuador", testing::league_average())
    }

    fn table(teams: &[(&str, u16, u16, u16)]) -> Vec<Standing> {
        teams
            .iter()
            .map(|&(team, points, goals_for, goals_against)| Standing {
                points,
                goals_for,
                goals_against,
                ..Standing::new(team)
            })
            .collect()
    }

    fn three_groups() -> (Topology, Vec<Vec<Standing>>) {
        let topology = Topology::new(vec![
            Group::new("A", &["A1", "A2", "A3", "A4"]),
            Group::new("B", &["B1", "B2", "B3", "B4"]),
            Group::new("C", &["C1", "C2", "C3"]),
        ])
        .with_best_thirds(2);
        let tables = vec![
            table(&[("A1", 9, 6, 1), ("A2", 6, 4, 2), ("A3", 3, 2, 4), ("A4", 0, 1, 6)]),
            table(&[("B1", 7, 5, 1), ("B2", 5, 3, 2), ("B3", 4, 3, 3), ("B4", 0, 0, 5)]),
            table(&[("C1", 4, 3, 2), ("C2", 3, 2, 2), ("C3", 3, 3, 6)]),
        ];
        (topology, tables)
    }

    #[test]
    fn qualify_takes_top_two_and_best_thirds() {
        let (topology, tables) = three_groups();
        let qualifiers = qualify(&topology, &tables);
        assert_eq!(8, qualifiers.len());
        assert_eq!(Some("A1"), qualifiers.group_place("A", 1));
        assert_eq!(Some("C2"), qualifiers.group_place("C", 2));
        assert_eq!(None, qualifiers.group_place("C", 3));
        assert_eq!(None, qualifiers.group_place("D", 1));
        // B3 on points; A3 ahead of C3 on goal difference
        assert_eq!(&names(&["B3", "A3"]), qualifiers.best_thirds());
        assert_eq!(Some("A3"), qualifiers.best_third(2));
        assert_eq!(None, qualifiers.best_third(0));
        assert_eq!(None, qualifiers.best_third(3));
    }

    #[test]
    fn thirds_ranked_on_goals_scored_then_listing() {
        let topology = Topology::new(vec![
            Group::new("A", &["A1", "A2", "A3"]),
            Group::new("B", &["B1", "B2", "B3"]),
            Group::new("C", &["C1", "C2", "C3"]),
        ])
        .with_best_thirds(3);
        let tables = vec![
            table(&[("A1", 6, 4, 0), ("A2", 3, 2, 2), ("A3", 0, 2, 3)]),
            table(&[("B1", 6, 4, 0), ("B2", 3, 2, 2), ("B3", 0, 3, 4)]),
            table(&[("C1", 6, 4, 0), ("C2", 3, 2, 2), ("C3", 0, 2, 3)]),
        ];
        let qualifiers = qualify(&topology, &tables);
        assert_eq!(&names(&["B3", "A3", "C3"]), qualifiers.best_thirds());
    }

    #[test]
    fn sequential_entrants() {
        let (topology, tables) = three_groups();
        let qualifiers = qualify(&topology, &tables);
        assert_eq!(
            names(&["A1", "A2", "B1", "B2", "C1", "C2", "B3", "A3"]),
            qualifiers.entrants(None)
        );
    }

    #[test]
    fn bracket_entrants() {
        let (topology, tables) = three_groups();
        let qualifiers = qualify(&topology, &tables);
        let bracket: Vec<_> = [("1A", "3rd:2"), ("1B", "2C"), ("1C", "2A"), ("2B", "3rd:1")]
            .iter()
            .map(|&(home, away)| (Slot::from_str(home).unwrap(), Slot::from_str(away).unwrap()))
            .collect();
        assert_eq!(
            names(&["A1", "A3", "B1", "C2", "C1", "A2", "B2", "B3"]),
            qualifiers.entrants(Some(bracket.as_slice()))
        );
    }

    #[test]
    fn draw_goes_to_higher_ranking() {
        let predictor = Predictor::try_from(Config::default()).unwrap();
        let profiles = profiles();
        let engine = MatchEngine::new(&predictor, &profiles, Resolution::Deterministic);
        let mut rand = Wyrand::seed(0);
        assert_eq!(("Uruguay", "Panama"), play_off(&engine, "Panama", "Uruguay", &mut rand));
        assert_eq!(("Uruguay", "Panama"), play_off(&engine, "Uruguay", "Panama", &mut rand));
    }

    #[test]
    fn draw_between_equal_rankings_goes_to_home_side() {
        let predictor = Predictor::try_from(Config::default()).unwrap();
        let profiles = profiles();
        let engine = MatchEngine::new(&predictor, &profiles, Resolution::Deterministic);
        let mut rand = Wyrand::seed(0);
        assert_eq!(("Scotland", "Ecuador"), play_off(&engine, "Scotland", "Ecuador", &mut rand));
        assert_eq!(("Ecuador", "Scotland"), play_off(&engine, "Ecuador", "Scotland", &mut rand));
    }

    #[test]
    fn four_entrants_play_semifinals() {
        let predictor = Predictor::try_from(Config::default()).unwrap();
        let profiles = profiles();
        let engine = MatchEngine::new(&predictor, &profiles, Resolution::Deterministic);
        let outcome = run_knockout(
            &engine,
            &names(&["Dominant", "Minnow1", "Minnow2", "Minnow3"]),
            &mut Wyrand::seed(0),
        );
        assert_eq!(
            TournamentOutcome {
                champion: Some("Dominant".into()),
                runner_up: Some("Minnow2".into()),
                third_place: Some("Minnow1".into()),
            },
            outcome
        );
        assert!(outcome.is_determined());
    }

    #[test]
    fn opening_byes_reduce_to_power_of_two() {
        assert_eq!(
            vec![0, 0, 1, 0, 3, 2, 1, 0, 7, 6, 5, 4, 0, 8],
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 16, 24]
                .into_iter()
                .map(opening_byes)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn leading_entrant_gets_a_bye() {
        let predictor = Predictor::try_from(Config::default()).unwrap();
        let profiles = profiles();
        let engine = MatchEngine::new(&predictor, &profiles, Resolution::Deterministic);
        // Minnow1 sits out the opening round and meets Minnow2 in the semifinal
        let entrants = names(&["Minnow1", "Minnow2", "Minnow3", "Panama", "Scotland", "Ecuador", "Dominant"]);
        let outcome = run_knockout(&engine, &entrants, &mut Wyrand::seed(0));
        assert_eq!(
            TournamentOutcome {
                champion: Some("Dominant".into()),
                runner_up: Some("Minnow2".into()),
                third_place: Some("Panama".into()),
            },
            outcome
        );
    }

    #[test]
    fn any_field_of_four_or_more_is_determined() {
        let predictor = Predictor::try_from(Config::default()).unwrap();
        let profiles = profiles();
        for resolution in [Resolution::Deterministic, Resolution::Sampled] {
            let engine = MatchEngine::new(&predictor, &profiles, resolution);
            let mut rand = Wyrand::seed(11);
            for size in 4..=12 {
                let entrants: Vec<_> = (1..=size).map(|index| format!("Team{index}")).collect();
                let outcome = run_knockout(&engine, &entrants, &mut rand);
                assert!(outcome.is_determined(), "{size} entrants, {resolution:?}");
                assert!(outcome.runner_up.is_some(), "{size} entrants, {resolution:?}");
                assert!(outcome.third_place.is_some(), "{size} entrants, {resolution:?}");
            }
        }
    }

    #[test]
    fn too_few_entrants_is_undetermined() {
        let predictor = Predictor::try_from(Config::default()).unwrap();
        let profiles = profiles();
        let engine = MatchEngine::new(&predictor, &profiles, Resolution::Deterministic);
        let mut rand = Wyrand::seed(0);
        for entrants in [vec![], names(&["Dominant"]), names(&["Dominant", "Minnow1", "Minnow2"])] {
            let outcome = run_knockout(&engine, &entrants, &mut rand);
            assert_eq!(TournamentOutcome::undetermined(), outcome);
            assert!(!outcome.is_determined());
        }
    }

    #[test]
    fn sampled_knockout_crowns_an_entrant() {
        let predictor = Predictor::try_from(Config::default()).unwrap();
        let profiles = profiles();
        let engine = MatchEngine::new(&predictor, &profiles, Resolution::Sampled);
        let entrants = names(&[
            "Minnow1", "Minnow2", "Minnow3", "Panama", "Scotland", "Ecuador", "Uruguay", "Dominant",
        ]);
        let mut rand = Wyrand::seed(5);
        for _ in 0..50 {
            let outcome = run_knockout(&engine, &entrants, &mut rand);
            let podium = [outcome.champion, outcome.runner_up, outcome.third_place];
            for team in &podium {
                assert!(entrants.contains(team.as_ref().unwrap()));
            }
            assert_ne!(podium[0], podium[1]);
            assert_ne!(podium[0], podium[2]);
            assert_ne!(podium[1], podium[2]);
        }
    }
}
