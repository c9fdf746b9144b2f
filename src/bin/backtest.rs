use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use bolao::backtest::{Backtest, Config, History};
use bolao::file::ReadJsonFile;
use bolao::predictor;
use bolao::predictor::Predictor;
use bolao::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file holding the chronological match history and rankings
    history: PathBuf,

    /// share of the history used to build team profiles
    #[clap(short = 'r', long, default_value_t = 0.7)]
    train_ratio: f64,

    /// latest matches per team counted towards its profile
    #[clap(short = 'l', long, default_value_t = 100)]
    recent_limit: usize,

    /// predictor config file; defaults apply when absent
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// tournament length used to project pool points
    #[clap(short = 'm', long, default_value_t = 104)]
    matches: u32,

    /// log every held-out prediction
    #[clap(short = 'v', long)]
    verbose: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.matches == 0 {
            bail!("projection needs at least one match");
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

    let predictor_config = match &args.config {
        Some(path) => predictor::Config::read_json_file(path)?,
        None => predictor::Config::default(),
    };
    let predictor = Predictor::try_from(predictor_config)?;
    let backtest = Backtest::try_from(Config {
        train_ratio: args.train_ratio,
        recent_limit: Some(args.recent_limit),
    })?;

    let history = History::read_json_file(&args.history)?;
    let report = backtest.run_history(&predictor, &history);
    info!(
        "trained on {} match(es), tested on {}",
        report.train_size,
        report.test_size()
    );
    if args.verbose {
        for evaluation in &report.evaluations {
            let record = &evaluation.record;
            info!(
                "{} {}-{} {}: predicted {}-{}, {}",
                record.home,
                record.home_goals,
                record.away_goals,
                record.away,
                evaluation.prediction.score.home,
                evaluation.prediction.score.away,
                evaluation.tier
            );
        }
    }

    let scorecard = &report.scorecard;
    info!(
        "scorecard:\n{}",
        Console::default().render(&print::tabulate_scorecard(scorecard))
    );
    info!(
        "exact score accuracy: {:.1}%, result accuracy: {:.1}%",
        scorecard.exact_accuracy() * 100.0,
        scorecard.result_accuracy() * 100.0
    );
    info!(
        "projected over {} match(es): {:.0} point(s)",
        args.matches,
        scorecard.projected_points(args.matches)
    );
    Ok(())
}
