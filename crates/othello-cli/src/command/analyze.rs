use std::{path::PathBuf, time::Duration};

use othello_engine::Snapshot;
use othello_search::player::SearchPlayer;
use tracing::info;

use crate::{
    schema::analysis::PositionAnalysis,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Snapshot JSON file to analyze
    state: PathBuf,
    /// Maximum search depth
    #[clap(long, default_value_t = 6)]
    depth: u32,
    /// Time limit in milliseconds (enables iterative deepening)
    #[clap(long)]
    time_limit_ms: Option<u64>,
    /// Output file path (defaults to stdout)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let snapshot: Snapshot = util::read_json_file("state", &arg.state)?;
    info!(path = %arg.state.display(), "loaded state");
    let analysis = analyze(&snapshot, arg.depth, arg.time_limit_ms);
    Output::save_json(&analysis, arg.output.clone())
}

fn analyze(snapshot: &Snapshot, depth: u32, time_limit_ms: Option<u64>) -> PositionAnalysis {
    let mut player = SearchPlayer::new(depth);
    if let Some(ms) = time_limit_ms {
        player = player.with_time_limit(Duration::from_millis(ms));
    }
    let report = player.analyze(snapshot);
    PositionAnalysis::new(snapshot, &report)
}
