use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use bolao::file::ReadJsonFile;
use bolao::group;
use bolao::mc::{MonteCarloEngine, PodiumPlace, DEFAULT_ITERATIONS};
use bolao::predictor::Resolution;
use bolao::print;
use bolao::settings::Settings;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// settings file with predictor config, team profiles and topology
    #[clap(short = 's', long, default_value = "data/wc2026.json")]
    settings: PathBuf,

    /// number of simulated tournaments
    #[clap(short = 'i', long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u64,

    /// seed for the random number generator
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// play every match to its predicted score instead of sampling
    #[clap(short = 'd', long)]
    deterministic: bool,

    /// number of teams to show in the podium table
    #[clap(short = 't', long, default_value_t = 16)]
    top: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.iterations == 0 {
            bail!("at least one iteration is required");
        }
        if self.top == 0 {
            bail!("podium table must show at least one team");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let settings = Settings::read_json_file(&args.settings)?;
    settings.validate()?;
    let unprofiled = settings.unprofiled_teams();
    if !unprofiled.is_empty() {
        warn!("{} team(s) without a profile: {}", unprofiled.len(), unprofiled.join(", "));
    }
    let predictor = settings.predictor()?;

    for group in &settings.topology.groups {
        let standings = group::simulate_group(&group.teams, &predictor, &settings.profiles);
        info!(
            "predicted table:\n{}",
            Console::default().render(&print::tabulate_standings(&group.name, &standings))
        );
    }

    let resolution = if args.deterministic {
        Resolution::Deterministic
    } else {
        Resolution::Sampled
    };
    let start_time = Instant::now();
    let probs = MonteCarloEngine::new(&predictor, &settings.profiles, &settings.topology)
        .with_iterations(args.iterations)
        .with_seed(args.seed)
        .with_resolution(resolution)
        .simulate();
    let elapsed = start_time.elapsed();

    info!(
        "podium probabilities over {} tournament(s):\n{}",
        probs.iterations(),
        Console::default().render(&print::tabulate_podium(&probs, args.top))
    );
    for place in PodiumPlace::iter() {
        if let Some(team) = probs.favourite(place) {
            info!("favourite for {place}: {team}");
        }
    }
    if probs.undetermined() > 0 {
        warn!("{} tournament(s) ended without a podium", probs.undetermined());
    }
    info!("simulation took {elapsed:?}");
    Ok(())
}
