use alloc::collections::VecDeque;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Win/lose judgment of a game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Undetermined,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// The player's view of one game: which cells are uncovered or flagged on top of
/// the hidden board, plus the latched outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    hidden: HiddenBoard,
    board: Array2<ShowCell>,
    flag_mode: FlagMode,
    flagged_count: CellCount,
    outcome: Outcome,
}

impl BoardState {
    pub fn new(hidden: HiddenBoard, flag_mode: FlagMode) -> Self {
        let size = hidden.size();
        Self {
            hidden,
            board: Array2::default(size.to_nd_index()),
            flag_mode,
            flagged_count: 0,
            outcome: Outcome::Undetermined,
        }
    }

    /// Starts a game on a board freshly drawn from `generator`.
    pub fn generate<G: BoardGenerator + ?Sized>(
        config: &GameConfig,
        generator: &mut G,
    ) -> Result<Self> {
        let hidden = generator.generate(config)?;
        Ok(Self::new(hidden, config.flag_mode))
    }

    pub fn config(&self) -> GameConfig {
        self.hidden.game_config().with_flag_mode(self.flag_mode)
    }

    pub fn size(&self) -> Coord2 {
        self.hidden.size()
    }

    pub fn hidden(&self) -> &HiddenBoard {
        &self.hidden
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines not yet accounted for by a flag, negative when over-flagged.
    pub fn mines_remaining(&self) -> i32 {
        i32::from(self.hidden.mine_count()) - i32::from(self.flagged_count)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<ShowCell> {
        let coords = self.hidden.validate_coords(coords)?;
        Ok(self.board[coords.to_nd_index()])
    }

    /// Row-major integer encoding of the show board.
    pub fn show_values(&self) -> Vec<u8> {
        self.board.iter().map(|cell| cell.value()).collect()
    }

    /// Uncovers `coords`, flood filling from cells without adjacent mines.
    ///
    /// Hitting a mine uncovers the whole board. Reveal never changes the latched
    /// outcome; call [`BoardState::update_outcome`] afterwards.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.hidden.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.board[coords.to_nd_index()].is_unrevealed() {
            return Ok(RevealOutcome::NoChange);
        }

        let truth = self.hidden[coords];
        if truth.is_mine() {
            self.reveal_all();
            return Ok(RevealOutcome::HitMine);
        }

        self.uncover(coords);
        if truth.is_empty() {
            self.flood_fill(coords);
        }
        Ok(RevealOutcome::Revealed)
    }

    /// Flags a hidden cell, or clears a flag in [`FlagMode::Toggle`].
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;
        use ShowCell::*;

        let coords = self.hidden.validate_coords(coords)?;
        self.check_not_finished()?;

        let cell = &mut self.board[coords.to_nd_index()];
        Ok(match (*cell, self.flag_mode) {
            (Hidden, _) => {
                *cell = Flagged;
                self.flagged_count += 1;
                Changed
            }
            (Flagged, FlagMode::Toggle) => {
                *cell = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            (Flagged, FlagMode::SetOnly) | (Revealed(_), _) => NoChange,
        })
    }

    /// Judges the board as it stands, `last_acted` being the cell of the latest
    /// command.
    ///
    /// Until every cell is flagged or uncovered the game is undetermined. After
    /// that it is lost if `last_acted` is an unflagged mine, won otherwise.
    pub fn query_outcome(&self, last_acted: Coord2) -> Result<Outcome> {
        let last_acted = self.hidden.validate_coords(last_acted)?;

        let resolved = self
            .board
            .iter()
            .zip(self.hidden.iter())
            .all(|(cell, truth)| cell.is_resolved(truth));
        if !resolved {
            return Ok(Outcome::Undetermined);
        }

        let last_cell = self.board[last_acted.to_nd_index()];
        if self.hidden.contains_mine(last_acted) && last_cell != ShowCell::Flagged {
            Ok(Outcome::Lost)
        } else {
            Ok(Outcome::Won)
        }
    }

    /// Re-judges the board and latches the first finished outcome.
    pub fn update_outcome(&mut self, last_acted: Coord2) -> Result<Outcome> {
        let outcome = self.query_outcome(last_acted)?;
        if self.outcome == Outcome::Undetermined && outcome.is_finished() {
            log::debug!("Game finished: {:?} after acting on {:?}", outcome, last_acted);
            self.outcome = outcome;
        }
        Ok(self.outcome)
    }

    /// Starts over on a new board drawn from `generator` with the current config.
    pub fn reset<G: BoardGenerator + ?Sized>(&mut self, generator: &mut G) -> Result<()> {
        let hidden = generator.generate(&self.config())?;
        self.restart(hidden);
        Ok(())
    }

    /// Starts over on the given board, keeping the flag mode.
    pub fn restart(&mut self, hidden: HiddenBoard) {
        *self = Self::new(hidden, self.flag_mode);
    }

    fn uncover(&mut self, coords: Coord2) {
        let cell = &mut self.board[coords.to_nd_index()];
        if *cell == ShowCell::Flagged {
            self.flagged_count -= 1;
        }
        *cell = ShowCell::Revealed(self.hidden[coords]);
    }

    fn reveal_all(&mut self) {
        for coords in iter_coords(self.size()) {
            self.uncover(coords);
        }
    }

    /// Breadth-first expansion from an empty cell. Every in-bounds neighbor of an
    /// expanded cell is uncovered; empty ones are expanded in turn, each at most
    /// once.
    fn flood_fill(&mut self, start: Coord2) {
        let mut visited: Array2<bool> = Array2::default(self.size().to_nd_index());
        visited[start.to_nd_index()] = true;
        let mut to_visit = VecDeque::from([start]);
        let mut expanded: CellCount = 0;

        while let Some(visit_coords) = to_visit.pop_front() {
            expanded += 1;
            for pos in self.hidden.iter_neighbors(visit_coords) {
                self.uncover(pos);
                if self.hidden[pos].is_empty() && !visited[pos.to_nd_index()] {
                    visited[pos.to_nd_index()] = true;
                    to_visit.push_back(pos);
                }
            }
        }

        log::trace!("Flood fill from {:?} expanded {} cells", start, expanded);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.outcome.is_finished() {
            log::warn!("Move rejected, game already ended as {:?}", self.outcome);
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
