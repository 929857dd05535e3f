//! Protocol module - line-delimited messages between the game and its driver
//!
//! Inbound lines are either a bare action word (`left`, `moveUp`, `restart`, `quit`)
//! or a JSON command. Every outbound message is one JSON object per line with
//! `type`, `seq` (outbound sequence number) and `ts` (timestamp in ms).

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GameSnapshot, MoveOutcome, Tile, TileSnapshot};
use crate::types::{Direction, GameAction, GRID_CELLS, GRID_COLS, GRID_ROWS};

// ============== Driver -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

/// JSON command: `{"type":"command","seq":3,"action":"moveLeft"}`
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    #[serde(default)]
    pub seq: Option<u64>,
    pub action: String,
}

/// Every action a driver may name, including the session-level `quit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Restart,
    Quit,
}

impl ActionName {
    /// Case-insensitive; accepts the same aliases as [`GameAction::from_str`]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("quit") || s.eq_ignore_ascii_case("exit") {
            return Some(Self::Quit);
        }
        GameAction::from_str(s).map(Self::from)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::MoveLeft => "moveLeft",
            ActionName::MoveRight => "moveRight",
            ActionName::MoveUp => "moveUp",
            ActionName::MoveDown => "moveDown",
            ActionName::Restart => "restart",
            ActionName::Quit => "quit",
        }
    }

    pub fn game_action(&self) -> Option<GameAction> {
        match self {
            ActionName::MoveLeft => Some(GameAction::MoveLeft),
            ActionName::MoveRight => Some(GameAction::MoveRight),
            ActionName::MoveUp => Some(GameAction::MoveUp),
            ActionName::MoveDown => Some(GameAction::MoveDown),
            ActionName::Restart => Some(GameAction::Restart),
            ActionName::Quit => None,
        }
    }
}

impl From<GameAction> for ActionName {
    fn from(value: GameAction) -> Self {
        match value {
            GameAction::MoveLeft => Self::MoveLeft,
            GameAction::MoveRight => Self::MoveRight,
            GameAction::MoveUp => Self::MoveUp,
            GameAction::MoveDown => Self::MoveDown,
            GameAction::Restart => Self::Restart,
        }
    }
}

impl Serialize for ActionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| serde::de::Error::custom("unknown action"))
    }
}

/// A parsed inbound line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    Action { seq: Option<u64>, action: GameAction },
    Quit { seq: Option<u64> },
}

/// Why an inbound line was not understood
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unsupported message type: {0}")]
    UnsupportedType(String),
    #[error("malformed command: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse one inbound line (bare word or JSON command)
pub fn parse_line(line: &str) -> Result<Inbound, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (seq, word) = if line.starts_with('{') {
        #[derive(Debug, Deserialize)]
        struct TypeOnly {
            #[serde(rename = "type")]
            msg_type: Option<String>,
        }
        let msg_type = serde_json::from_str::<TypeOnly>(line)?.msg_type;
        if let Some(t) = msg_type.filter(|t| t != "command") {
            return Err(ParseError::UnsupportedType(t));
        }
        let cmd = serde_json::from_str::<CommandMessage>(line)?;
        (cmd.seq, cmd.action)
    } else {
        (None, line.to_string())
    };

    match ActionName::parse(&word) {
        Some(ActionName::Quit) => Ok(Inbound::Quit { seq }),
        Some(name) => name
            .game_action()
            .map(|action| Inbound::Action { seq, action })
            .ok_or_else(|| ParseError::UnknownAction(word)),
        None => Err(ParseError::UnknownAction(word)),
    }
}

/// Best-effort `seq` of a line that failed to parse, for error correlation
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Game -> Driver Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    #[serde(rename = "move")]
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_command")]
    InvalidCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionLower {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
}

impl From<Direction> for DirectionLower {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: u32,
    pub value: u32,
    pub row: u8,
    pub col: u8,
    pub x: i32,
    pub y: i32,
}

impl From<TileSnapshot> for TileView {
    fn from(value: TileSnapshot) -> Self {
        Self {
            id: value.id,
            value: value.value,
            row: value.row,
            col: value.col,
            x: value.x,
            y: value.y,
        }
    }
}

impl From<Tile> for TileView {
    fn from(value: Tile) -> Self {
        TileSnapshot::from(value).into()
    }
}

/// Full game state, sent on every tick that changed something
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub frame: u32,
    #[serde(rename = "episode_id")]
    pub episode_id: u32,
    #[serde(rename = "move_id")]
    pub move_id: u32,
    pub seed: u32,
    pub playable: bool,
    #[serde(rename = "game_over")]
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving: Option<DirectionLower>,
    pub pending: u8,
    /// Tile values by cell, 0 = empty
    pub cells: [[u32; GRID_COLS as usize]; GRID_ROWS as usize],
    /// Row-major by logical cell, with pixel positions
    pub tiles: ArrayVec<TileView, GRID_CELLS>,
    #[serde(rename = "max_tile")]
    pub max_tile: u32,
}

/// Result of a settled move; `moved == false` marks a rejected (no-op) input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveMessage {
    #[serde(rename = "type")]
    pub msg_type: MoveType,
    pub seq: u64,
    pub ts: u64,
    pub direction: DirectionLower,
    pub moved: bool,
    pub merges: u32,
    pub ticks: u32,
    #[serde(rename = "move_id")]
    pub move_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawned: Option<TileView>,
    #[serde(rename = "game_over")]
    pub game_over: bool,
}

/// Acknowledgment for command receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "command_seq")]
    pub command_seq: Option<u64>,
    pub action: ActionName,
    pub status: AckStatus,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "command_seq")]
    pub command_seq: Option<u64>,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Utility Functions ==============

/// Build an observation from a game snapshot
pub fn build_observation(snapshot: &GameSnapshot, seq: u64) -> ObservationMessage {
    let mut cells = [[0u32; GRID_COLS as usize]; GRID_ROWS as usize];
    for t in snapshot.tiles.iter() {
        cells[t.row as usize][t.col as usize] = t.value;
    }

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        frame: snapshot.frame,
        episode_id: snapshot.episode_id,
        move_id: snapshot.move_id,
        seed: snapshot.seed,
        playable: snapshot.playable(),
        game_over: snapshot.game_over,
        moving: snapshot.moving.map(DirectionLower::from),
        pending: snapshot.pending,
        cells,
        tiles: snapshot.tiles.iter().copied().map(TileView::from).collect(),
        max_tile: snapshot.max_value(),
    }
}

/// Create a move report
pub fn create_move(
    seq: u64,
    outcome: &MoveOutcome,
    move_id: u32,
    spawned: Option<Tile>,
    game_over: bool,
) -> MoveMessage {
    MoveMessage {
        msg_type: MoveType::Move,
        seq,
        ts: current_timestamp_ms(),
        direction: outcome.direction.into(),
        moved: outcome.moved,
        merges: outcome.merges,
        ticks: outcome.ticks,
        move_id,
        spawned: spawned.map(TileView::from),
        game_over,
    }
}

/// Create an acknowledgment
pub fn create_ack(
    seq: u64,
    command_seq: Option<u64>,
    action: ActionName,
    status: AckStatus,
) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        command_seq,
        action,
        status,
    }
}

/// Create an error message
pub fn create_error(
    seq: u64,
    command_seq: Option<u64>,
    code: ErrorCode,
    message: &str,
) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        command_seq,
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameState, Grid};

    #[test]
    fn test_parse_bare_words() {
        assert_eq!(
            parse_line("left").unwrap(),
            Inbound::Action {
                seq: None,
                action: GameAction::MoveLeft
            }
        );
        assert_eq!(
            parse_line("  moveUp \r").unwrap(),
            Inbound::Action {
                seq: None,
                action: GameAction::MoveUp
            }
        );
        assert_eq!(
            parse_line("Escape").unwrap(),
            Inbound::Action {
                seq: None,
                action: GameAction::Restart
            }
        );
        assert_eq!(parse_line("quit").unwrap(), Inbound::Quit { seq: None });
    }

    #[test]
    fn test_parse_command_json() {
        let json = r#"{"type":"command","seq":7,"action":"moveDown"}"#;
        assert_eq!(
            parse_line(json).unwrap(),
            Inbound::Action {
                seq: Some(7),
                action: GameAction::MoveDown
            }
        );

        // `type` may be omitted
        let json = r#"{"seq":8,"action":"restart"}"#;
        assert_eq!(
            parse_line(json).unwrap(),
            Inbound::Action {
                seq: Some(8),
                action: GameAction::Restart
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_line("   "), Err(ParseError::Empty)));
        assert!(matches!(
            parse_line("jump"),
            Err(ParseError::UnknownAction(w)) if w == "jump"
        ));
        assert!(matches!(
            parse_line(r#"{"type":"hello","seq":1}"#),
            Err(ParseError::UnsupportedType(t)) if t == "hello"
        ));
        assert!(matches!(
            parse_line(r#"{"type":"command","seq":1"#),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_line(r#"{"type":"command","seq":2,"action":"rotateCw"}"#),
            Err(ParseError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "action":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"action":"left"}"#), None);
        assert_eq!(extract_seq_best_effort(r#"{"seq":"x"}"#), None);
    }

    #[test]
    fn test_build_observation() {
        let grid = Grid::from_cells(&[(0, 0, 2), (3, 2, 8)]).unwrap();
        let state = GameState::from_grid(5, grid);
        let obs = build_observation(&state.snapshot(), 1);

        assert_eq!(obs.msg_type, ObservationType::Observation);
        assert_eq!(obs.cells[0][0], 2);
        assert_eq!(obs.cells[3][2], 8);
        assert_eq!(obs.tiles.len(), 2);
        assert_eq!(obs.tiles[1].x, 400);
        assert_eq!(obs.tiles[1].y, 600);
        assert_eq!(obs.max_tile, 8);
        assert!(obs.playable);
        assert!(obs.moving.is_none());

        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains(r#""type":"observation""#));
        assert!(!json.contains("moving"));
    }

    #[test]
    fn test_ack_serializes_camel_case_action() {
        let ack = create_ack(3, Some(9), ActionName::MoveLeft, AckStatus::Queued);
        let json = serde_json::to_string(&ack).unwrap();
        assert!(json.contains(r#""action":"moveLeft""#));
        assert!(json.contains(r#""status":"queued""#));
        assert!(json.contains(r#""command_seq":9"#));

        let parsed: AckMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.action, ActionName::MoveLeft);
        assert_eq!(parsed.status, AckStatus::Queued);
    }

    #[test]
    fn test_create_error() {
        let error = create_error(5, None, ErrorCode::InvalidCommand, "unknown action: jump");
        assert_eq!(error.msg_type, ErrorType::Error);
        assert_eq!(error.code, ErrorCode::InvalidCommand);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""code":"invalid_command""#));
    }
}
