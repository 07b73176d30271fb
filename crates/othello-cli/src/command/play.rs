use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use othello_engine::{Side, SnapshotRecord};
use othello_search::{ComputerMove, player::SearchPlayer};
use tracing::debug;

use crate::{record::RecordingSession, schema::record::PlayerInfo, util};

const HELP: &str = "\
Commands:
  <x> <y>       place a piece at column x, row y (0-7)
  moves         list your legal moves
  hint          ask the computer for a move suggestion
  undo          take back your last move (and the computer's reply)
  pass          pass when you have no legal move
  new           start a new game
  save <path>   write the game record as JSON
  load <path>   continue from a snapshot JSON file
  board         print the board again
  help          show this message
  quit          leave the game";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Side played by the human (B or W)
    #[clap(long, default_value = "B")]
    pub(crate) human: Side,
    /// Search depth of the computer opponent
    #[clap(long, default_value_t = 4)]
    pub(crate) depth: u32,
    /// Per-move time limit of the computer in milliseconds (enables iterative deepening)
    #[clap(long)]
    pub(crate) time_limit_ms: Option<u64>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            human: Side::Black,
            depth: 4,
            time_limit_ms: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let mut repl = Repl::new(arg);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    repl.run(stdin.lock(), &mut stdout)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Place { x: usize, y: usize },
    Moves,
    Hint,
    Undo,
    Pass,
    New,
    Save(PathBuf),
    Load(PathBuf),
    Board,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
enum ParseCommandError {
    #[display("empty command")]
    Empty,
    #[display("unknown command {_0:?} (type `help` for a list)")]
    Unknown(#[error(not(source))] String),
    #[display("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[display("invalid coordinate {_0:?}")]
    InvalidCoordinate(#[error(not(source))] String),
}

impl FromStr for ReplCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let path = |command, words: &mut std::str::SplitWhitespace<'_>| {
            words
                .next()
                .map(PathBuf::from)
                .ok_or(ParseCommandError::MissingArgument {
                    command,
                    expected: "a file path",
                })
        };
        let command = match head.to_ascii_lowercase().as_str() {
            "moves" | "m" => ReplCommand::Moves,
            "hint" => ReplCommand::Hint,
            "undo" | "u" => ReplCommand::Undo,
            "pass" | "p" => ReplCommand::Pass,
            "new" => ReplCommand::New,
            "save" => ReplCommand::Save(path("save", &mut words)?),
            "load" => ReplCommand::Load(path("load", &mut words)?),
            "board" | "b" => ReplCommand::Board,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ if head.starts_with(|c: char| c.is_ascii_digit()) => {
                let x = parse_coordinate(head)?;
                let y = words
                    .next()
                    .ok_or(ParseCommandError::MissingArgument {
                        command: "place",
                        expected: "two coordinates `x y`",
                    })
                    .and_then(parse_coordinate)?;
                ReplCommand::Place { x, y }
            }
            _ => return Err(ParseCommandError::Unknown(head.to_owned())),
        };
        Ok(command)
    }
}

fn parse_coordinate(word: &str) -> Result<usize, ParseCommandError> {
    word.parse()
        .map_err(|_| ParseCommandError::InvalidCoordinate(word.to_owned()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Console game between a human and the search player.
#[derive(Debug)]
struct Repl {
    session: RecordingSession,
    human: Side,
    computer: SearchPlayer,
}

impl Repl {
    fn new(arg: &PlayArg) -> Self {
        let mut computer = SearchPlayer::new(arg.depth);
        if let Some(ms) = arg.time_limit_ms {
            computer = computer.with_time_limit(Duration::from_millis(ms));
        }
        Self {
            session: RecordingSession::new(),
            human: arg.human,
            computer,
        }
    }

    fn players(&self) -> (PlayerInfo, PlayerInfo) {
        let computer = PlayerInfo::Search {
            depth: self.computer.depth(),
            time_limit_ms: self
                .computer
                .time_limit()
                .map(|limit| u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)),
        };
        match self.human {
            Side::Black => (PlayerInfo::Human, computer),
            Side::White => (computer, PlayerInfo::Human),
        }
    }

    fn run<R, W>(&mut self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "You play {}. Type `help` for commands.", self.human.name())?;
        self.after_change(out)?;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            if line.trim().is_empty() {
                continue;
            }
            let flow = match line.parse::<ReplCommand>() {
                Ok(command) => {
                    debug!(?command, "repl command");
                    self.execute(command, out)?
                }
                Err(err) => {
                    writeln!(out, "{err}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn execute<W>(&mut self, command: ReplCommand, out: &mut W) -> anyhow::Result<Flow>
    where
        W: Write,
    {
        match command {
            ReplCommand::Place { x, y } => {
                if self.session.is_game_over() {
                    writeln!(out, "The game is over. Type `new` or `undo`.")?;
                } else {
                    match self.session.add(x, y) {
                        Ok(()) => self.after_change(out)?,
                        Err(err) => writeln!(out, "Illegal move: {err}")?,
                    }
                }
            }
            ReplCommand::Moves => {
                let moves = self.session.valid_moves();
                if moves.is_empty() {
                    writeln!(out, "No legal moves.")?;
                } else {
                    let list = moves.iter().map(ToString::to_string).collect::<Vec<_>>();
                    writeln!(out, "Legal moves: {}", list.join(" "))?;
                }
            }
            ReplCommand::Hint => {
                let report = self.computer.analyze(self.session.current_state());
                match report.best_move {
                    Some(mv) => writeln!(
                        out,
                        "Hint: {mv} (score {}, depth {})",
                        report.score, report.depth
                    )?,
                    None if self.session.is_game_over() => writeln!(out, "The game is over.")?,
                    None => writeln!(out, "No legal moves; type `pass`.")?,
                }
            }
            ReplCommand::Undo => self.undo(out)?,
            ReplCommand::Pass => match self.session.pass() {
                Ok(()) => self.after_change(out)?,
                Err(err) => writeln!(out, "Cannot pass: {err}")?,
            },
            ReplCommand::New => {
                self.session.start();
                self.after_change(out)?;
            }
            ReplCommand::Save(path) => {
                let (black, white) = self.players();
                match self.session.save(path.clone(), black, white) {
                    Ok(()) => writeln!(out, "Saved game to {}", path.display())?,
                    Err(err) => writeln!(out, "{err:#}")?,
                }
            }
            ReplCommand::Load(path) => {
                let loaded = util::read_json_file::<SnapshotRecord, _>("state", &path)
                    .and_then(|record| {
                        self.session
                            .set_state(record)
                            .with_context(|| format!("Invalid state in {}", path.display()))
                    });
                match loaded {
                    Ok(()) => self.after_change(out)?,
                    Err(err) => writeln!(out, "{err:#}")?,
                }
            }
            ReplCommand::Board => self.print_state(out)?,
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Takes back moves until it is the human's turn again. If the history
    /// runs out first, the computer replays its opening move.
    fn undo<W>(&mut self, out: &mut W) -> anyhow::Result<()>
    where
        W: Write,
    {
        if let Err(err) = self.session.undo() {
            writeln!(out, "Cannot undo: {err}")?;
            return Ok(());
        }
        while self.session.side_to_move() != self.human && self.session.undo().is_ok() {}
        self.after_change(out)
    }

    /// Lets the computer reply, then shows the position and any result.
    fn after_change<W>(&mut self, out: &mut W) -> anyhow::Result<()>
    where
        W: Write,
    {
        while !self.session.is_game_over() && self.session.side_to_move() != self.human {
            match self.session.play_turn(&mut self.computer)? {
                ComputerMove::Placed(mv) => writeln!(out, "Computer plays {mv}")?,
                ComputerMove::Passed => writeln!(out, "Computer passes")?,
                ComputerMove::GameOver => break,
            }
        }
        self.print_state(out)
    }

    fn print_state<W>(&self, out: &mut W) -> anyhow::Result<()>
    where
        W: Write,
    {
        writeln!(out, "{}", self.session.current_state())?;
        if let Some(outcome) = self.session.winner() {
            writeln!(out, "Game over: {outcome}")?;
        } else if self.session.valid_moves().is_empty() {
            writeln!(out, "You have no legal moves; type `pass`.")?;
        }
        Ok(())
    }
}
