//! Score predictions and tournament forecasts for a World Cup prediction pool.
//! Expected goals are estimated from each team's scoring record and ranking, turned into a
//! truncated Poisson score grid, and collapsed to a single scoreline by picking the likeliest
//! result first. The same grid drives group-stage and knockout simulation, from which
//! Monte Carlo sampling derives each team's podium probabilities.

pub mod backtest;
pub mod domain;
pub mod factorial;
pub mod file;
pub mod group;
pub mod knockout;
pub mod linear;
pub mod mc;
pub mod poisson;
pub mod pool;
pub mod predictor;
pub mod print;
pub mod probs;
pub mod profile;
pub mod scoregrid;
pub mod settings;
pub mod topology;
pub mod xg;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
