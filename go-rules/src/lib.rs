pub mod engine;
pub mod error;
pub mod goban;
pub mod group;
pub mod ko;
pub mod settings;
pub mod stone;
pub mod territory;
pub mod turn;

/// Board coordinate as `(x, y)`: column, then row, both counted from the top-left corner.
pub type Point = (usize, usize);

pub use engine::{Engine, Snapshot, Stage};
pub use error::GoError;
pub use goban::{Captures, Goban};
pub use group::{Group, GroupArena, GroupId};
pub use ko::Ko;
pub use settings::GameSettings;
pub use stone::Stone;
pub use territory::{GameScore, Mark, PlayerPoints, Territory};
pub use turn::{Move, Turn};
