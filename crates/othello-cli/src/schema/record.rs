use chrono::{DateTime, Utc};
use othello_engine::{Move, Outcome, Side, Snapshot};
use serde::{Deserialize, Serialize};

/// A finished (or abandoned) game with enough data to replay it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Timestamp when the record was written (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    pub black: PlayerInfo,
    pub white: PlayerInfo,
    /// Position the recorded turns start from
    pub initial_state: Snapshot,
    /// Every turn from the opening position, in order
    pub moves: Vec<TurnRecord>,
    /// Position after the last recorded turn
    pub final_state: Snapshot,
    /// `None` if the game was saved before it ended
    pub outcome: Option<Outcome>,
}

/// One placement or pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number (0-indexed, passes count as turns)
    pub turn: usize,
    pub side: Side,
    pub action: TurnAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    Place(Move),
    Pass,
}

/// Who controlled a side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlayerInfo {
    Human,
    Search {
        depth: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_limit_ms: Option<u64>,
    },
    Random {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}
