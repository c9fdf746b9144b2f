//! Scoring rules of the prediction pool.
//!
//! | Prediction                                          | Points |
//! |-----------------------------------------------------|-------:|
//! | Exact scoreline                                     |     20 |
//! | Correct result and one side's goal count exact      |     15 |
//! | Correct result only                                 |     10 |
//! | Wrong result                                        |      0 |

use ordinalizer::Ordinal;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount, EnumIter};

use crate::domain::Score;
use crate::scoregrid::ScoreDistribution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ordinal, EnumCount, EnumIter, Display)]
pub enum Tier {
    #[strum(serialize = "Exact score")]
    ExactScore,
    #[strum(serialize = "Result and goals")]
    ResultAndGoals,
    #[strum(serialize = "Result")]
    Result,
    #[strum(serialize = "Miss")]
    Miss,
}
impl Tier {
    pub fn classify(predicted: &Score, actual: &Score) -> Tier {
        if predicted == actual {
            Tier::ExactScore
        } else if predicted.result() != actual.result() {
            Tier::Miss
        } else if predicted.home == actual.home || predicted.away == actual.away {
            Tier::ResultAndGoals
        } else {
            Tier::Result
        }
    }

    pub fn points(&self) -> u8 {
        match self {
            Tier::ExactScore => 20,
            Tier::ResultAndGoals => 15,
            Tier::Result => 10,
            Tier::Miss => 0,
        }
    }
}

pub fn points(predicted: &Score, actual: &Score) -> u8 {
    Tier::classify(predicted, actual).points()
}

/// Points the `predicted` scoreline is expected to earn if the real score follows `distribution`.
pub fn expected_points(distribution: &ScoreDistribution, predicted: &Score) -> f64 {
    distribution
        .iter()
        .map(|(actual, prob)| prob * points(predicted, &actual) as f64)
        .sum()
}

/// Running tally of predictions against real results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scorecard {
    tiers: [u64; Tier::COUNT],
    total_points: u64,
}
impl Scorecard {
    pub fn record(&mut self, predicted: &Score, actual: &Score) -> Tier {
        let tier = Tier::classify(predicted, actual);
        self.tiers[tier.ordinal()] += 1;
        self.total_points += tier.points() as u64;
        tier
    }

    pub fn predictions(&self) -> u64 {
        self.tiers.iter().sum()
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn count(&self, tier: Tier) -> u64 {
        self.tiers[tier.ordinal()]
    }

    pub fn tiers(&self) -> impl Iterator<Item = (Tier, u64)> + '_ {
        Tier::iter().map(|tier| (tier, self.count(tier)))
    }

    pub fn average_points(&self) -> f64 {
        self.ratio(self.total_points)
    }

    /// Points over a run of `matches` predictions at the current average.
    pub fn projected_points(&self, matches: u32) -> f64 {
        self.average_points() * matches as f64
    }

    pub fn exact_accuracy(&self) -> f64 {
        self.ratio(self.count(Tier::ExactScore))
    }

    /// Share of predictions that called the result correctly, exact scores included.
    pub fn result_accuracy(&self) -> f64 {
        self.ratio(self.predictions() - self.count(Tier::Miss))
    }

    fn ratio(&self, numerator: u64) -> f64 {
        match self.predictions() {
            0 => 0.0,
            predictions => numerator as f64 / predictions as f64,
        }
    }
}
