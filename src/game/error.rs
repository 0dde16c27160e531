use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("no free cell left on the board for an apple")]
    BoardSaturated,
}
