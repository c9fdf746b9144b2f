use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use bolao::file::ReadJsonFile;
use bolao::print;
use bolao::settings::Settings;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// home team
    home: String,

    /// away team
    away: String,

    /// settings file with predictor config, team profiles and topology
    #[clap(short = 's', long, default_value = "data/wc2026.json")]
    settings: PathBuf,

    /// print the full score grid
    #[clap(short = 'g', long)]
    grid: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.home == self.away {
            bail!("a team cannot play itself");
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
    for team in [&args.home, &args.away] {
        if !settings.profiles.contains(team) {
            warn!("no profile for {team}, using league defaults");
        }
    }

    let predictor = settings.predictor()?;
    let prediction = predictor.predict(&args.home, &args.away, &settings.profiles);
    info!(
        "{} v {}:\n{}",
        args.home,
        args.away,
        Console::default().render(&print::tabulate_prediction(&args.home, &args.away, &prediction))
    );

    if args.grid {
        let distribution = predictor.distribution(&args.home, &args.away, &settings.profiles);
        info!(
            "score grid (home goals down, away goals across):\n{}",
            Console::default().render(&print::tabulate_distribution(&distribution))
        );
    }
    Ok(())
}
