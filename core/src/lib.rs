//! Board-state engine for Minesweeper.
//!
//! A [`BoardGenerator`] lays out mines and neighbor counts on a [`HiddenBoard`],
//! and a [`BoardState`] tracks what the player has uncovered or flagged on top of
//! it. Rendering, input and the event loop belong to the driver holding both.
//!
//! Cell values follow a fixed integer encoding shared by both boards, see
//! [`HIDDEN`], [`FLAGGED`], [`MINE`] and [`EMPTY`].

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;

/// How a second flag action on an already flagged cell behaves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagMode {
    /// Flagging a flagged cell clears the flag.
    #[default]
    Toggle,
    /// Flags can only be placed, never removed.
    SetOnly,
}

/// Board size, mine count and flag behavior of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    #[serde(default)]
    pub flag_mode: FlagMode,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            flag_mode: FlagMode::Toggle,
        }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    /// 9x9 board with one mine per seven cells.
    pub const fn classic() -> Self {
        Self::new_unchecked((9, 9), mult(9, 9) / 7)
    }

    pub const fn with_flag_mode(self, flag_mode: FlagMode) -> Self {
        Self { flag_mode, ..self }
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Checks the config describes a non-empty board that can hold its mines.
    ///
    /// Configs read through serde skip [`GameConfig::new`], so consumers call this
    /// before generating.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }

        if self.mines > self.total_cells() {
            return Err(GameError::InvalidMineCount {
                mines: self.mines,
                cells: self.total_cells(),
            });
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Ground truth of one game: where the mines are and how many surround every
/// safe cell.
///
/// Cells are stored row-major, `values()[y * width + x]` is the cell at `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HiddenBoard {
    cells: Array2<HiddenCell>,
    mine_count: CellCount,
}

impl HiddenBoard {
    /// Builds the board from a mine mask shaped `[height, width]`, filling in the
    /// neighbor counts.
    pub(crate) fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let mut mine_count: CellCount = 0;
        let cells = Array2::from_shape_fn(mine_mask.dim(), |(y, x)| {
            let coords = (x as Coord, y as Coord);
            if mine_mask[coords.to_nd_index()] {
                mine_count += 1;
                HiddenCell::Mine
            } else {
                let adjacent = mine_mask
                    .iter_neighbors(coords)
                    .filter(|pos| mine_mask[pos.to_nd_index()])
                    .count();
                HiddenCell::Clear(adjacent as u8)
            }
        });

        Self { cells, mine_count }
    }

    /// Builds the board for a fixed mine layout.
    ///
    /// Repeated coordinates place a single mine.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let (width, height) = size;
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= width || coords.1 >= height {
                return Err(GameError::OutOfBounds(coords));
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    /// Board size as `(width, height)`.
    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub fn cell_at(&self, coords: Coord2) -> HiddenCell {
        self[coords]
    }

    pub fn iter(&self) -> impl Iterator<Item = HiddenCell> + '_ {
        self.cells.iter().copied()
    }

    /// Row-major integer encoding of the whole board.
    pub fn values(&self) -> Vec<u8> {
        self.iter().map(HiddenCell::value).collect()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }
}

impl Index<Coord2> for HiddenBoard {
    type Output = HiddenCell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// Result of a flag action.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Result of a reveal action.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    /// A mine was uncovered and the whole board is now shown.
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}
