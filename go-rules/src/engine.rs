use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::GoError;
use crate::goban::{Captures, Goban};
use crate::ko::Ko;
use crate::settings::GameSettings;
use crate::stone::Stone;
use crate::territory::{GameScore, Mark, Territory};
use crate::turn::{Move, Turn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Playing,
    Finished,
}

impl Stage {
    pub fn is_play(&self) -> bool {
        matches!(self, Stage::Playing)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Playing => write!(f, "playing"),
            Stage::Finished => write!(f, "finished"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "playing" => Ok(Stage::Playing),
            "finished" => Ok(Stage::Finished),
            _ => Err(format!("unknown stage: {s}")),
        }
    }
}

/// Read-only copy of everything a renderer needs. Grids are row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: usize,
    pub stones: Vec<Option<Stone>>,
    pub territory: Vec<Mark>,
    pub turn: Stone,
    pub game_over: bool,
    pub score: (u32, u32),
}

impl Snapshot {
    /// Stone at `point`; `None` off the board or past the end of a short `stones` list.
    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.index(point)
            .and_then(|i| self.stones.get(i))
            .copied()
            .flatten()
    }

    pub fn mark_at(&self, point: Point) -> Mark {
        self.index(point)
            .and_then(|i| self.territory.get(i))
            .copied()
            .unwrap_or_default()
    }

    fn index(&self, (x, y): Point) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }
}

/// One game of Go: the board plus turn order, passing, and end-of-game scoring.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: GameSettings,
    goban: Goban,
    territory: Territory,
    turn: Stone,
    has_passed: bool,
    stage: Stage,
    moves: Vec<Turn>,
}

impl Engine {
    pub fn new(size: usize) -> Result<Self, GoError> {
        Self::from_settings(GameSettings::with_size(size))
    }

    pub fn from_settings(settings: GameSettings) -> Result<Self, GoError> {
        settings.validate()?;
        let goban = Goban::with_size(settings.size)?;
        Self::create(settings, goban)
    }

    /// Start from a set-up position with Black to play.
    pub fn from_layout(layout: &[&str]) -> Result<Self, GoError> {
        let goban = Goban::from_layout(layout)?;
        let settings = GameSettings::with_size(goban.size());
        Self::create(settings, goban)
    }

    /// Rebuild a game by replaying its move log on an empty board.
    pub fn with_moves(size: usize, moves: &[Turn]) -> Result<Self, GoError> {
        let mut engine = Self::new(size)?;
        for m in moves {
            if m.stone != engine.turn {
                return Err(GoError::OutOfTurn);
            }
            match (m.kind, m.pos) {
                (Move::Play, Some(point)) => engine.try_play(point)?,
                (Move::Play, None) => return Err(GoError::NotOnBoard),
                (Move::Pass, _) => engine.try_pass()?,
            };
        }
        Ok(engine)
    }

    fn create(settings: GameSettings, goban: Goban) -> Result<Self, GoError> {
        Ok(Engine {
            territory: Territory::new(goban.size())?,
            settings,
            goban,
            turn: Stone::Black,
            has_passed: false,
            stage: Stage::Playing,
            moves: Vec::new(),
        })
    }

    // -- Accessors --

    pub fn size(&self) -> usize {
        self.goban.size()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn player_name(&self, stone: Stone) -> &str {
        self.settings.player_name(stone)
    }

    pub fn goban(&self) -> &Goban {
        &self.goban
    }

    pub fn territory(&self) -> &Territory {
        &self.territory
    }

    pub fn moves(&self) -> &[Turn] {
        &self.moves
    }

    pub fn ko(&self) -> &Option<Ko> {
        self.goban.ko()
    }

    pub fn captures(&self) -> &Captures {
        self.goban.captures()
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.goban.stone_at(point)
    }

    pub fn current_turn_stone(&self) -> Stone {
        self.turn
    }

    pub fn has_passed(&self) -> bool {
        self.has_passed
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_over(&self) -> bool {
        self.stage == Stage::Finished
    }

    /// Marked territory plus prisoners, per color.
    pub fn score(&self) -> GameScore {
        self.territory.score(&self.goban)
    }

    pub fn is_legal(&self, point: Point) -> bool {
        self.stage.is_play() && self.goban.is_legal_move(point, self.turn)
    }

    // -- Game actions --

    pub fn try_play(&mut self, point: Point) -> Result<Stage, GoError> {
        if self.is_over() {
            return self.rejected("play", GoError::GameOver);
        }

        let stone = self.turn;
        let dead = match self.goban.play(point, stone) {
            Ok(dead) => dead,
            Err(e) => return self.rejected("play", e),
        };
        tracing::debug!(?point, %stone, captured = dead.len(), "stone placed");

        self.moves.push(Turn::play(stone, point));
        self.turn = stone.opp();
        self.has_passed = false;
        Ok(self.stage)
    }

    /// Play the current color at (x, y). Returns whether the move was accepted.
    pub fn place_stone(&mut self, x: usize, y: usize) -> bool {
        self.try_play((x, y)).is_ok()
    }

    /// Pass the turn. A pass directly after another pass ends the game.
    pub fn try_pass(&mut self) -> Result<Stage, GoError> {
        if self.is_over() {
            return self.rejected("pass", GoError::GameOver);
        }

        self.moves.push(Turn::pass(self.turn));

        if self.has_passed {
            self.stage = Stage::Finished;
            tracing::info!(moves = self.moves.len(), "game finished after two passes");
            return Ok(self.stage);
        }

        self.turn = self.turn.opp();
        self.has_passed = true;
        self.goban.pass();
        Ok(self.stage)
    }

    pub fn pass_turn(&mut self) -> bool {
        self.try_pass().is_ok()
    }

    // -- Territory review --

    pub fn try_mark_territory(&mut self, point: Point) -> Result<Mark, GoError> {
        if !self.is_over() {
            return self.rejected("mark", GoError::GameNotOver);
        }

        match self.territory.mark(&self.goban, point) {
            Ok(mark) => Ok(mark),
            Err(e) => self.rejected("mark", e),
        }
    }

    /// Mark territory at (x, y). Does nothing until the game is over.
    pub fn mark_territory(&mut self, x: usize, y: usize) {
        let _ = self.try_mark_territory((x, y));
    }

    /// Claim every empty region surrounded by a single color. Returns the regions claimed.
    pub fn try_auto_find_territory(&mut self) -> Result<usize, GoError> {
        if !self.is_over() {
            return self.rejected("auto_find", GoError::GameNotOver);
        }
        Ok(self.territory.auto_find(&self.goban))
    }

    pub fn auto_find_territory(&mut self) {
        let _ = self.try_auto_find_territory();
    }

    fn rejected<T>(&self, action: &'static str, error: GoError) -> Result<T, GoError> {
        tracing::debug!(action, %error, turn = %self.turn, "command rejected");
        Err(error)
    }

    // -- Snapshot --

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.size(),
            stones: self.goban.stones(),
            territory: self.territory.marks().to_vec(),
            turn: self.turn,
            game_over: self.is_over(),
            score: self.score().totals(),
        }
    }
}
