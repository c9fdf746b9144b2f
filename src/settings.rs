//! Everything a tournament run needs, loadable from one JSON document.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::MatchRecord;
use crate::predictor;
use crate::predictor::Predictor;
use crate::profile::ProfileStore;
use crate::topology::Topology;
use crate::xg::TournamentForm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub predictor: predictor::Config,

    #[serde(default)]
    pub profiles: ProfileStore,

    pub topology: Topology,

    /// Matches already played at the tournament. When present, recent form is blended into
    /// every estimate.
    #[serde(default)]
    pub tournament_results: Vec<MatchRecord>,
}
impl Settings {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.predictor.validate()?;
        self.profiles.validate()?;
        self.topology.validate()?;
        Ok(())
    }

    pub fn predictor(&self) -> Result<Predictor, anyhow::Error> {
        let predictor = Predictor::try_from(self.predictor.clone())?;
        if self.tournament_results.is_empty() {
            Ok(predictor)
        } else {
            debug!("blending form from {} tournament result(s)", self.tournament_results.len());
            Ok(predictor.with_adjustment(TournamentForm::from_results(&self.tournament_results)))
        }
    }

    /// Participants missing from the profile store; these are predicted from league defaults.
    pub fn unprofiled_teams(&self) -> Vec<&str> {
        self.topology
            .teams()
            .filter(|team| !self.profiles.contains(team))
            .collect()
    }
}
