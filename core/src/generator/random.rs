use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Random draws tried per mine before falling back to a linear scan.
pub const DEFAULT_PLACEMENT_ATTEMPTS: u8 = 5;

/// Places every mine with a bounded number of uniform random draws, falling back
/// to the first free cell in row-major order when all draws land on mines.
///
/// The generator owns its RNG, so seeding it once gives a reproducible sequence
/// of boards across resets.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator<R> {
    rng: R,
    max_attempts: u8,
}

impl RandomBoardGenerator<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomBoardGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(self, max_attempts: u8) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }
}

impl<R: Rng> BoardGenerator for RandomBoardGenerator<R> {
    fn generate(&mut self, config: &GameConfig) -> Result<HiddenBoard> {
        config.validate()?;
        Ok(place_mines(config, &mut self.rng, self.max_attempts))
    }
}

/// Generates a `width` x `height` board holding `mine_count` mines.
pub fn generate<R: Rng + ?Sized>(
    width: Coord,
    height: Coord,
    mine_count: CellCount,
    rng: &mut R,
) -> Result<HiddenBoard> {
    let config = GameConfig::new((width, height), mine_count)?;
    Ok(place_mines(&config, rng, DEFAULT_PLACEMENT_ATTEMPTS))
}

fn place_mines<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R, max_attempts: u8) -> HiddenBoard {
    let (width, height) = config.size;
    let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
    let mut scanned: CellCount = 0;
    // mines are only ever added, so the first free cell never moves backwards
    let mut scan = iter_coords(config.size);

    for _ in 0..config.mines {
        // row is drawn before column, seeded boards depend on the order
        let drawn = (0..max_attempts).find_map(|_| {
            let y = rng.random_range(0..height);
            let x = rng.random_range(0..width);
            (!mine_mask[(x, y).to_nd_index()]).then_some((x, y))
        });

        // a validated config always leaves a free cell for the scan
        let Some(coords) = drawn.or_else(|| {
            scanned += 1;
            scan.find(|coords| !mine_mask[coords.to_nd_index()])
        }) else {
            break;
        };
        mine_mask[coords.to_nd_index()] = true;
    }

    log::debug!(
        "Generated {}x{} board with {} mines, {} placed by scan",
        width,
        height,
        config.mines,
        scanned
    );
    HiddenBoard::from_mine_mask(&mine_mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    /// Always yields zero, so every draw lands on `(0, 0)`.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn assert_board_invariants(board: &HiddenBoard, config: &GameConfig) {
        assert_eq!(board.size(), config.size);
        assert_eq!(board.mine_count(), config.mines);
        assert_eq!(
            board.iter().filter(|cell| cell.is_mine()).count(),
            usize::from(config.mines)
        );

        for coords in iter_coords(board.size()) {
            if board.contains_mine(coords) {
                continue;
            }
            let adjacent = board
                .iter_neighbors(coords)
                .filter(|&pos| board.contains_mine(pos))
                .count();
            assert_eq!(board[coords].value(), EMPTY + adjacent as u8);
        }
    }

    #[test]
    fn seeded_boards_hold_invariants() {
        let configs = [
            GameConfig::classic(),
            GameConfig::new((16, 8), 30).unwrap(),
            GameConfig::new((3, 12), 35).unwrap(),
            GameConfig::new((1, 1), 1).unwrap(),
            GameConfig::new((5, 5), 0).unwrap(),
        ];

        for seed in 0..16 {
            let mut generator = RandomBoardGenerator::from_seed(seed);
            for config in &configs {
                let board = generator.generate(config).unwrap();
                assert_board_invariants(&board, config);
            }
        }
    }

    #[test]
    fn same_seed_same_board() {
        let config = GameConfig::classic();
        let a = RandomBoardGenerator::from_seed(42).generate(&config).unwrap();
        let b = RandomBoardGenerator::from_seed(42).generate(&config).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn colliding_draws_fall_back_to_row_major_scan() {
        let config = GameConfig::new((4, 3), 3).unwrap();
        let board = RandomBoardGenerator::new(ZeroRng).generate(&config).unwrap();

        assert_board_invariants(&board, &config);
        assert!(board.contains_mine((0, 0)));
        assert!(board.contains_mine((1, 0)));
        assert!(board.contains_mine((2, 0)));
    }

    #[test]
    fn scan_wraps_onto_next_row() {
        let config = GameConfig::new((2, 3), 4).unwrap();
        let board = RandomBoardGenerator::new(ZeroRng).generate(&config).unwrap();

        assert_board_invariants(&board, &config);
        assert_eq!(board.values(), [MINE, MINE, MINE, MINE, 5, 5]);
    }

    #[test]
    fn full_board_through_fallback() {
        let config = GameConfig::new((3, 3), 9).unwrap();
        let board = RandomBoardGenerator::new(ZeroRng).generate(&config).unwrap();

        assert_board_invariants(&board, &config);
        assert!(board.iter().all(HiddenCell::is_mine));
    }

    #[test]
    fn zero_attempts_scans_every_mine() {
        let config = GameConfig::new((5, 5), 6).unwrap();
        let mut generator = RandomBoardGenerator::from_seed(1).with_max_attempts(0);
        let board = generator.generate(&config).unwrap();

        assert_board_invariants(&board, &config);
        for x in 0..5 {
            assert!(board.contains_mine((x, 0)));
        }
        assert!(board.contains_mine((0, 1)));
    }

    /// Placement that restarts the fallback scan from `(0, 0)` for every mine.
    fn place_mines_rescanning<R: Rng>(config: &GameConfig, rng: &mut R) -> HiddenBoard {
        let (width, height) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        for _ in 0..config.mines {
            let drawn = (0..DEFAULT_PLACEMENT_ATTEMPTS).find_map(|_| {
                let y = rng.random_range(0..height);
                let x = rng.random_range(0..width);
                (!mine_mask[(x, y).to_nd_index()]).then_some((x, y))
            });
            let coords = drawn
                .or_else(|| iter_coords(config.size).find(|c| !mine_mask[c.to_nd_index()]))
                .unwrap();
            mine_mask[coords.to_nd_index()] = true;
        }

        HiddenBoard::from_mine_mask(&mine_mask)
    }

    #[test]
    fn resumed_scan_matches_scan_from_origin() {
        let dense = GameConfig::new((40, 30), 1150).unwrap();
        let resumed = RandomBoardGenerator::new(ZeroRng).generate(&dense).unwrap();
        assert_eq!(resumed, place_mines_rescanning(&dense, &mut ZeroRng));

        let configs = [
            GameConfig::new((12, 7), 80).unwrap(),
            GameConfig::new((9, 9), 81).unwrap(),
            GameConfig::new((20, 3), 45).unwrap(),
        ];
        for seed in 0..8 {
            for config in &configs {
                let resumed = RandomBoardGenerator::from_seed(seed).generate(config).unwrap();
                let rescanned =
                    place_mines_rescanning(config, &mut SmallRng::seed_from_u64(seed));
                assert_board_invariants(&resumed, config);
                assert_eq!(resumed, rescanned);
            }
        }
    }

    #[test]
    fn full_large_board_places_every_mine() {
        let config = GameConfig::new((255, 255), 65025).unwrap();
        let board = RandomBoardGenerator::from_seed(5).generate(&config).unwrap();

        assert_eq!(board.mine_count(), 65025);
        assert!(board.iter().all(HiddenCell::is_mine));
    }

    #[test]
    fn generate_validates_input() {
        let mut rng = SmallRng::seed_from_u64(3);

        assert_eq!(
            generate(0, 4, 0, &mut rng),
            Err(GameError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            generate(2, 2, 5, &mut rng),
            Err(GameError::InvalidMineCount { mines: 5, cells: 4 })
        );

        let board = generate(7, 4, 9, &mut rng).unwrap();
        assert_board_invariants(&board, &GameConfig::new((7, 4), 9).unwrap());
    }

    #[test]
    fn generator_rejects_invalid_config() {
        let config = GameConfig::new_unchecked((2, 2), 5);
        assert!(RandomBoardGenerator::from_seed(0).generate(&config).is_err());
    }
}
