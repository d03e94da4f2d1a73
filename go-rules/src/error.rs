use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    GameOver,
    GameNotOver,
    OutOfTurn,
    Overwrite,
    Suicide,
    NotOnBoard,
    KoViolation,
    InvalidSize,
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::GameOver => write!(f, "game over"),
            GoError::GameNotOver => write!(f, "game not over"),
            GoError::OutOfTurn => write!(f, "out of turn"),
            GoError::Overwrite => write!(f, "overwrite"),
            GoError::Suicide => write!(f, "suicide"),
            GoError::NotOnBoard => write!(f, "not on board"),
            GoError::KoViolation => write!(f, "ko violation"),
            GoError::InvalidSize => write!(f, "invalid board size"),
        }
    }
}

impl std::error::Error for GoError {}
