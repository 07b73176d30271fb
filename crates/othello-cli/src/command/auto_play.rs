use std::{fmt, path::PathBuf, time::Duration};

use othello_engine::{Outcome, Side};
use othello_search::player::{Player, RandomPlayer, SearchPlayer};
use tracing::info;

use crate::{record::RecordingSession, schema::record::PlayerInfo};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Search depth of the black player
    #[clap(long, default_value_t = 4)]
    black_depth: u32,
    /// Search depth of the white player
    #[clap(long, default_value_t = 4)]
    white_depth: u32,
    /// White picks uniformly random moves instead of searching
    #[clap(long)]
    white_random: bool,
    /// Seed for the random player (game `i` uses `seed + i`)
    #[clap(long)]
    seed: Option<u64>,
    /// Per-move time limit of the search players in milliseconds
    #[clap(long)]
    time_limit_ms: Option<u64>,
    /// Number of games to play
    #[clap(long, default_value_t = 1)]
    games: u64,
    /// Write the record of the last game as JSON to this file
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let (summary, last) = play_games(arg)?;
    println!("{summary}");
    if let (Some(path), Some((session, black, white))) = (&arg.output, last) {
        session.save(path.clone(), black, white)?;
        info!(path = %path.display(), "game record written");
    }
    Ok(())
}

type FinishedGame = (RecordingSession, PlayerInfo, PlayerInfo);

fn play_games(arg: &AutoPlayArg) -> anyhow::Result<(MatchSummary, Option<FinishedGame>)> {
    let mut summary = MatchSummary::default();
    let mut last = None;
    for game in 0..arg.games {
        let (mut black, black_info) = search_player(arg.black_depth, arg.time_limit_ms);
        let (mut white, white_info): (Box<dyn Player>, _) = if arg.white_random {
            let seed = arg.seed.map(|seed| seed.wrapping_add(game));
            let player = seed.map_or_else(RandomPlayer::new, RandomPlayer::with_seed);
            (Box::new(player), PlayerInfo::Random { seed })
        } else {
            let (player, info) = search_player(arg.white_depth, arg.time_limit_ms);
            (Box::new(player), info)
        };

        let session = play_game(&mut black, white.as_mut())?;
        let outcome = session.winner();
        summary.record(outcome);
        info!(
            game,
            outcome = ?outcome,
            black = session.current_state().count(Side::Black),
            white = session.current_state().count(Side::White),
            "game finished"
        );
        last = Some((session, black_info, white_info));
    }
    Ok((summary, last))
}

fn search_player(depth: u32, time_limit_ms: Option<u64>) -> (SearchPlayer, PlayerInfo) {
    let mut player = SearchPlayer::new(depth);
    if let Some(ms) = time_limit_ms {
        player = player.with_time_limit(Duration::from_millis(ms));
    }
    let info = PlayerInfo::Search {
        depth: player.depth(),
        time_limit_ms,
    };
    (player, info)
}

fn play_game<'a>(
    black: &'a mut dyn Player,
    white: &'a mut dyn Player,
) -> anyhow::Result<RecordingSession> {
    let mut session = RecordingSession::new();
    while !session.is_game_over() {
        let player = match session.side_to_move() {
            Side::Black => &mut *black,
            Side::White => &mut *white,
        };
        session.play_turn(player)?;
    }
    Ok(session)
}

/// Win/loss/tie tally over a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MatchSummary {
    black_wins: u64,
    white_wins: u64,
    ties: u64,
    /// Games stopped before the end; only possible if a player misbehaves.
    unfinished: u64,
}

impl MatchSummary {
    fn record(&mut self, outcome: Option<Outcome>) {
        match outcome {
            Some(Outcome::Winner(Side::Black)) => self.black_wins += 1,
            Some(Outcome::Winner(Side::White)) => self.white_wins += 1,
            Some(Outcome::Tie) => self.ties += 1,
            None => self.unfinished += 1,
        }
    }

    fn games(&self) -> u64 {
        self.black_wins + self.white_wins + self.ties + self.unfinished
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "games: {}  black wins: {}  white wins: {}  ties: {}",
            self.games(),
            self.black_wins,
            self.white_wins,
            self.ties
        )
    }
}
