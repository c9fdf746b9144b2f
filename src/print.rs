use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};
use strum::IntoEnumIterator;

use crate::domain::Score;
use crate::group::Standing;
use crate::mc::PodiumProbabilities;
use crate::pool::{Scorecard, Tier};
use crate::predictor::MatchPrediction;
use crate::scoregrid::ScoreDistribution;

pub fn tabulate_prediction(home: &str, away: &str, prediction: &MatchPrediction) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["".into(), home.into(), away.into()],
        ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Expected goals".into(),
            format!("{:.3}", prediction.expected.home).into(),
            format!("{:.3}", prediction.expected.away).into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Win probability".into(),
            format!("{:.3}", prediction.prob_home_win).into(),
            format!("{:.3}", prediction.prob_away_win).into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Draw probability".into(),
            format!("{:.3}", prediction.prob_draw).into(),
            "".into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default().with(Header(true)),
        vec![
            "Predicted score".into(),
            prediction.score.home.to_string().into(),
            prediction.score.away.to_string().into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Exact score probability".into(),
            format!("{:.3}", prediction.prob_exact).into(),
            "".into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Expected pool points".into(),
            format!("{:.2}", prediction.expected_points).into(),
            "".into(),
        ],
    ));
    table
}

/// Home goals down the rows, away goals across the columns.
pub fn tabulate_distribution(distribution: &ScoreDistribution) -> Table {
    let dim = distribution.max_goals() + 1;
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(5))
                    .with(HAlign::Centred),
            )];
            for _ in 0..dim {
                cols.push(Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec!["".into()];
            for away in 0..dim {
                header_cells.push(away.to_string().into());
            }
            Row::new(Styles::default().with(Header(true)), header_cells)
        });
    for home in 0..dim {
        let mut row_cells = vec![home.to_string().into()];
        for away in 0..dim {
            row_cells.push(format!("{:.4}", distribution.prob(&Score::new(home, away))).into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

pub fn tabulate_standings(group: &str, standings: &[Standing]) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![
                Col::new(Styles::default().with(MinWidth(4)).with(HAlign::Right)),
                Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            ];
            for _ in 0..8 {
                cols.push(Col::new(Styles::default().with(MinWidth(4)).with(HAlign::Right)));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "".into(),
                format!("Group {group}").into(),
                "P".into(),
                "W".into(),
                "D".into(),
                "L".into(),
                "GF".into(),
                "GA".into(),
                "GD".into(),
                "Pts".into(),
            ],
        ));
    for (index, standing) in standings.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", index + 1).into(),
                standing.team.clone().into(),
                standing.played.to_string().into(),
                standing.wins.to_string().into(),
                standing.draws.to_string().into(),
                standing.losses.to_string().into(),
                standing.goals_for.to_string().into(),
                standing.goals_against.to_string().into(),
                format!("{:+}", standing.goal_difference()).into(),
                standing.points.to_string().into(),
            ],
        ));
    }
    table
}

/// The `limit` leading teams, by championship probability.
pub fn tabulate_podium(probs: &PodiumProbabilities, limit: usize) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left))];
            for _ in 0..4 {
                cols.push(Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Team".into(),
                "Champion".into(),
                "Runner-up".into(),
                "Third".into(),
                "Podium".into(),
            ],
        ));
    for (team, podium) in probs.ranked().into_iter().take(limit) {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                team.into(),
                format!("{:.1}%", podium.prob_champion * 100.0).into(),
                format!("{:.1}%", podium.prob_runner_up * 100.0).into(),
                format!("{:.1}%", podium.prob_third * 100.0).into(),
                format!("{:.1}%", podium.prob_podium * 100.0).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_scorecard(scorecard: &Scorecard) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Tier".into(), "Points".into(), "Count".into(), "Share".into()],
        ));
    for tier in Tier::iter() {
        let count = scorecard.count(tier);
        let share = if scorecard.predictions() == 0 {
            0.0
        } else {
            count as f64 / scorecard.predictions() as f64
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                tier.to_string().into(),
                tier.points().to_string().into(),
                count.to_string().into(),
                format!("{:.1}%", share * 100.0).into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Header(true)),
        vec![
            "Total".into(),
            scorecard.total_points().to_string().into(),
            scorecard.predictions().to_string().into(),
            format!("{:.2} avg", scorecard.average_points()).into(),
        ],
    ));
    table
}
