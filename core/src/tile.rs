use serde::{Deserialize, Serialize};

/// Show-board value of a cell the player has not uncovered.
pub const HIDDEN: u8 = 0;
/// Show-board value of a flagged cell.
pub const FLAGGED: u8 = 1;
/// Board value of a mine.
pub const MINE: u8 = 2;
/// Board value of a safe cell with no adjacent mines; `EMPTY + n` means `n` adjacent mines.
pub const EMPTY: u8 = 3;

/// Ground-truth content of a cell on the hidden board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenCell {
    Mine,
    /// Safe cell with the given number of adjacent mines (0-8).
    Clear(u8),
}

impl HiddenCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Safe cell without adjacent mines, the cells a flood fill expands from.
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Clear(0))
    }

    /// Integer encoding: [`MINE`] for a mine, otherwise [`EMPTY`] plus the adjacent mine count.
    ///
    /// The values line up with a 12-entry sprite table, so a renderer can index
    /// it directly.
    pub const fn value(self) -> u8 {
        match self {
            Self::Mine => MINE,
            Self::Clear(count) => EMPTY + count,
        }
    }
}

impl Default for HiddenCell {
    fn default() -> Self {
        Self::Clear(0)
    }
}

/// Player-visible state of a cell on the show board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowCell {
    Hidden,
    Flagged,
    Revealed(HiddenCell),
}

impl ShowCell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    /// Integer encoding: [`HIDDEN`], [`FLAGGED`], or the revealed hidden value.
    pub const fn value(self) -> u8 {
        match self {
            Self::Hidden => HIDDEN,
            Self::Flagged => FLAGGED,
            Self::Revealed(cell) => cell.value(),
        }
    }

    /// Whether this cell counts as settled against `truth` when judging the outcome.
    pub fn is_resolved(self, truth: HiddenCell) -> bool {
        match self {
            Self::Flagged => true,
            Self::Hidden => false,
            Self::Revealed(cell) => cell == truth,
        }
    }
}

impl Default for ShowCell {
    fn default() -> Self {
        Self::Hidden
    }
}
