use thiserror::Error;

use crate::{CellCount, Coord, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: Coord, height: Coord },
    #[error("Invalid mine count {mines}, board only has {cells} cells")]
    InvalidMineCount { mines: CellCount, cells: CellCount },
    #[error("Coordinates {0:?} are out of bounds")]
    OutOfBounds(Coord2),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
