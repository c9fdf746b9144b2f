//! The score grid: a normalised probability mass over every scoreline up to a goal limit, and
//! the rule for picking a single scoreline from it.

use tinyrand::Rand;

use crate::domain::{MatchResult, Score, Side};
use crate::factorial;
use crate::factorial::Factorial;
use crate::linear::Matrix;
use crate::poisson;
use crate::probs::SliceExt;
use crate::xg::ExpectedGoals;

/// Aggregated probabilities of the three match results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultProbs {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}
impl ResultProbs {
    /// The result with the strictly highest probability; any tie at the top goes to the draw.
    pub fn favoured(&self) -> MatchResult {
        if self.home_win > self.draw && self.home_win > self.away_win {
            MatchResult::Win(Side::Home)
        } else if self.away_win > self.draw && self.away_win > self.home_win {
            MatchResult::Win(Side::Away)
        } else {
            MatchResult::Draw
        }
    }
}

/// Joint probabilities of `(home, away)` goal counts over `0..=max_goals` on each axis. The
/// grid is truncated, so its mass is renormalised to 1 over the included scorelines only.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDistribution {
    grid: Matrix,
}
impl ScoreDistribution {
    /// Builds the grid from two independent Poisson rates. If neither rate carries mass the
    /// grid falls back to a uniform distribution.
    pub fn from_univariate_poisson(
        expected: &ExpectedGoals,
        max_goals: u8,
        factorial: &impl Factorial,
    ) -> Self {
        assert!(
            max_goals <= factorial::MAX_ARG,
            "max_goals of {max_goals} exceeds the factorial range of 0..={}",
            factorial::MAX_ARG
        );
        let dim = max_goals as usize + 1;
        let home_probs: Vec<_> = (0..=max_goals)
            .map(|goals| poisson::univariate(goals, expected.home, factorial))
            .collect();
        let away_probs: Vec<_> = (0..=max_goals)
            .map(|goals| poisson::univariate(goals, expected.away, factorial))
            .collect();

        let mut grid = Matrix::square(dim);
        for (home, home_prob) in home_probs.iter().enumerate() {
            for (away, away_prob) in away_probs.iter().enumerate() {
                grid[(home, away)] = home_prob * away_prob;
            }
        }
        Self::from_grid(grid)
    }

    /// Wraps a square grid of (not necessarily normalised) weights.
    pub fn from_grid(mut grid: Matrix) -> Self {
        assert_eq!(grid.rows(), grid.cols(), "score grid must be square");
        assert!(grid.rows() > 0, "score grid cannot be empty");
        let mass = grid.flatten_mut().normalise(1.0);
        if !(mass > 0.0 && mass.is_finite()) {
            grid.flatten_mut().fill_uniform();
        }
        Self { grid }
    }

    pub fn max_goals(&self) -> u8 {
        (self.grid.rows() - 1) as u8
    }

    pub fn prob(&self, score: &Score) -> f64 {
        let (home, away) = (score.home as usize, score.away as usize);
        if home < self.grid.rows() && away < self.grid.cols() {
            self.grid[(home, away)]
        } else {
            0.0
        }
    }

    /// Scorelines with their probabilities in row-major order: home goals ascending, then away
    /// goals ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Score, f64)> + '_ {
        let cols = self.grid.cols();
        self.grid
            .flatten()
            .iter()
            .enumerate()
            .map(move |(index, &prob)| (Score::new((index / cols) as u8, (index % cols) as u8), prob))
    }

    pub fn gather(&self, result: &MatchResult) -> f64 {
        self.iter()
            .filter(|(score, _)| result.includes(score))
            .map(|(_, prob)| prob)
            .sum()
    }

    pub fn result_probs(&self) -> ResultProbs {
        let mut probs = ResultProbs {
            home_win: 0.0,
            draw: 0.0,
            away_win: 0.0,
        };
        for (score, prob) in self.iter() {
            match score.result() {
                MatchResult::Win(Side::Home) => probs.home_win += prob,
                MatchResult::Draw => probs.draw += prob,
                MatchResult::Win(Side::Away) => probs.away_win += prob,
            }
        }
        probs
    }

    /// The most probable scoreline that carries the given result, or `None` if the grid is too
    /// small to express it. Ties keep the earliest scoreline in row-major order.
    pub fn best_score_for(&self, result: &MatchResult) -> Option<Score> {
        let mut best: Option<(Score, f64)> = None;
        for (score, prob) in self.iter().filter(|(score, _)| result.includes(score)) {
            let improves = best.as_ref().map_or(true, |(_, best_prob)| prob > *best_prob);
            if improves {
                best = Some((score, prob));
            }
        }
        best.map(|(score, _)| score)
    }

    /// Selects the predicted scoreline: first the favoured result, then the most probable
    /// scoreline within it.
    pub fn best_score(&self) -> Score {
        self.best_score_for(&self.result_probs().favoured())
            .unwrap_or_else(Score::nil_all)
    }

    /// Draws a scoreline at random, in proportion to its probability.
    pub fn sample(&self, rand: &mut impl Rand) -> Score {
        let random = random_f64(rand);
        let mut cumulative = 0.0;
        let mut last = Score::nil_all();
        for (score, prob) in self.iter() {
            if prob <= 0.0 {
                continue;
            }
            cumulative += prob;
            last = score;
            if cumulative > random {
                return last;
            }
        }
        last
    }
}

#[inline]
fn random_f64(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}
