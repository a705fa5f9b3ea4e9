use crate::*;
pub use random::*;

mod random;

/// Source of fresh hidden boards, called once per game and again on every reset.
pub trait BoardGenerator {
    fn generate(&mut self, config: &GameConfig) -> Result<HiddenBoard>;
}
