use serde::{Deserialize, Serialize};

use crate::error::GoError;
use crate::stone::Stone;

pub const DEFAULT_SIZE: usize = 19;

/// Everything needed to start a game: board size and the players' display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub size: usize,
    pub black_player: String,
    pub white_player: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            size: DEFAULT_SIZE,
            black_player: Stone::Black.to_string(),
            white_player: Stone::White.to_string(),
        }
    }
}

impl GameSettings {
    pub fn with_size(size: usize) -> Self {
        GameSettings {
            size,
            ..Self::default()
        }
    }

    /// Parse a board size typed by a user. Only plain digits with a value of at least 2 pass.
    pub fn parse_size(input: &str) -> Result<usize, GoError> {
        let input = input.trim();
        if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GoError::InvalidSize);
        }
        match input.parse::<usize>() {
            Ok(size) if size >= 2 => Ok(size),
            _ => Err(GoError::InvalidSize),
        }
    }

    pub fn validate(&self) -> Result<(), GoError> {
        if self.size < 2 {
            return Err(GoError::InvalidSize);
        }
        Ok(())
    }

    pub fn player_name(&self, stone: Stone) -> &str {
        match stone {
            Stone::Black => &self.black_player,
            Stone::White => &self.white_player,
        }
    }
}
