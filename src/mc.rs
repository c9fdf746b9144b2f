//! Monte Carlo simulation of the whole tournament: every draw replays the group stage and the
//! knockout stage from scratch, and the podium finishes are tallied across draws.

use std::time::Instant;

use ordinalizer::Ordinal;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter};
use tinyrand::{Rand, Seeded, Wyrand};
use tracing::debug;

use crate::group::simulate_group_with;
use crate::knockout;
use crate::knockout::TournamentOutcome;
use crate::predictor::{MatchEngine, Predictor, Resolution};
use crate::profile::ProfileStore;
use crate::topology::Topology;

pub const DEFAULT_ITERATIONS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, EnumCount, EnumIter, Display)]
pub enum PodiumPlace {
    Champion,
    #[strum(serialize = "Runner-up")]
    RunnerUp,
    Third,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamPodium {
    pub prob_champion: f64,
    pub prob_runner_up: f64,
    pub prob_third: f64,
    pub prob_podium: f64,
}
impl TeamPodium {
    fn from_counts(counts: &[u64; PodiumPlace::COUNT], iterations: u64) -> Self {
        let prob = |place: PodiumPlace| counts[place.ordinal()] as f64 / iterations as f64;
        Self {
            prob_champion: prob(PodiumPlace::Champion),
            prob_runner_up: prob(PodiumPlace::RunnerUp),
            prob_third: prob(PodiumPlace::Third),
            prob_podium: counts.iter().sum::<u64>() as f64 / iterations as f64,
        }
    }

    pub fn prob(&self, place: PodiumPlace) -> f64 {
        match place {
            PodiumPlace::Champion => self.prob_champion,
            PodiumPlace::RunnerUp => self.prob_runner_up,
            PodiumPlace::Third => self.prob_third,
        }
    }
}

/// Podium finishes across all draws. Teams that never reached the podium are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodiumProbabilities {
    iterations: u64,
    undetermined: u64,
    teams: FxHashMap<String, TeamPodium>,
}
impl PodiumProbabilities {
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Draws that did not produce a podium.
    pub fn undetermined(&self) -> u64 {
        self.undetermined
    }

    pub fn get(&self, team: &str) -> Option<&TeamPodium> {
        self.teams.get(team)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TeamPodium)> {
        self.teams.iter().map(|(team, podium)| (team.as_str(), podium))
    }

    /// Teams by descending championship probability, then descending podium probability, then
    /// by name.
    pub fn ranked(&self) -> Vec<(&str, &TeamPodium)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|(a_team, a), (b_team, b)| {
            b.prob_champion
                .total_cmp(&a.prob_champion)
                .then_with(|| b.prob_podium.total_cmp(&a.prob_podium))
                .then_with(|| a_team.cmp(b_team))
        });
        ranked
    }

    /// The most likely occupant of each podium place.
    pub fn favourite(&self, place: PodiumPlace) -> Option<&str> {
        self.iter()
            .filter(|(_, podium)| podium.prob(place) > 0.0)
            .max_by(|(a_team, a), (b_team, b)| {
                a.prob(place)
                    .total_cmp(&b.prob(place))
                    .then_with(|| b_team.cmp(a_team))
            })
            .map(|(team, _)| team)
    }
}

#[derive(Debug, Default)]
struct Tally {
    counts: FxHashMap<String, [u64; PodiumPlace::COUNT]>,
    undetermined: u64,
}
impl Tally {
    fn record(&mut self, outcome: TournamentOutcome) {
        if !outcome.is_determined() {
            self.undetermined += 1;
            return;
        }
        let places = [outcome.champion, outcome.runner_up, outcome.third_place];
        for (place, team) in PodiumPlace::iter().zip(places) {
            if let Some(team) = team {
                self.counts.entry(team).or_default()[place.ordinal()] += 1;
            }
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        for (team, counts) in other.counts {
            let merged = self.counts.entry(team).or_default();
            for (merged, count) in merged.iter_mut().zip(counts) {
                *merged += count;
            }
        }
        self.undetermined += other.undetermined;
        self
    }

    fn into_probabilities(self, iterations: u64) -> PodiumProbabilities {
        let teams = self
            .counts
            .into_iter()
            .map(|(team, counts)| (team, TeamPodium::from_counts(&counts, iterations)))
            .collect();
        PodiumProbabilities {
            iterations,
            undetermined: self.undetermined,
            teams,
        }
    }
}

pub struct MonteCarloEngine<'a> {
    predictor: &'a Predictor,
    profiles: &'a ProfileStore,
    topology: &'a Topology,
    iterations: u64,
    seed: u64,
    resolution: Resolution,
}
impl<'a> MonteCarloEngine<'a> {
    pub fn new(predictor: &'a Predictor, profiles: &'a ProfileStore, topology: &'a Topology) -> Self {
        Self {
            predictor,
            profiles,
            topology,
            iterations: DEFAULT_ITERATIONS,
            seed: 0,
            resolution: Resolution::default(),
        }
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Plays one complete tournament: all groups, qualification, then the knockout stage.
    pub fn simulate_once(&self, rand: &mut impl Rand) -> TournamentOutcome {
        let engine = MatchEngine::new(self.predictor, self.profiles, self.resolution);
        let tables: Vec<_> = self
            .topology
            .groups
            .iter()
            .map(|group| simulate_group_with(&engine, &group.teams, rand))
            .collect();
        let qualifiers = knockout::qualify(self.topology, &tables);
        let entrants = qualifiers.entrants(self.topology.bracket.as_deref());
        knockout::run_knockout(&engine, &entrants, rand)
    }

    /// Plays the given draw with a generator of its own, so a draw's outcome depends only on
    /// the seed and its index.
    pub fn simulate_draw(&self, draw: u64) -> TournamentOutcome {
        let mut rand = Wyrand::seed(draw_seed(self.seed, draw));
        self.simulate_once(&mut rand)
    }

    pub fn simulate(&self) -> PodiumProbabilities {
        let start_time = Instant::now();
        let tally = (0..self.iterations)
            .into_par_iter()
            .fold(Tally::default, |mut tally, draw| {
                tally.record(self.simulate_draw(draw));
                tally
            })
            .reduce(Tally::default, Tally::merge);
        let probabilities = tally.into_probabilities(self.iterations);
        debug!(
            "simulated {} tournament(s) in {:?}, {} undetermined",
            self.iterations,
            start_time.elapsed(),
            probabilities.undetermined
        );
        probabilities
    }
}

/// Samples `iterations` tournaments from the default seed.
pub fn simulate_tournament(
    topology: &Topology,
    predictor: &Predictor,
    profiles: &ProfileStore,
    iterations: u64,
) -> PodiumProbabilities {
    MonteCarloEngine::new(predictor, profiles, topology)
        .with_iterations(iterations)
        .simulate()
}

/// Mixes the draw index into the seed (SplitMix64 finaliser).
fn draw_seed(seed: u64, draw: u64) -> u64 {
    let mut z = seed ^ draw.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
