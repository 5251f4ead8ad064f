use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::grid::TileId;

pub const EASY_PASS_FLOOR: usize = 3;
pub const EASY_PASS_RATIO: f32 = 0.3;
pub const HARD_PASS_FACTOR: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty {0:?}, expected easy, normal or hard")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("easy") {
            Ok(Difficulty::Easy)
        } else if trimmed.eq_ignore_ascii_case("normal") {
            Ok(Difficulty::Normal)
        } else if trimmed.eq_ignore_ascii_case("hard") {
            Ok(Difficulty::Hard)
        } else {
            Err(ParseDifficultyError(trimmed.to_string()))
        }
    }
}

/// Number of whole Fisher-Yates passes for a sequence of length `len`.
pub fn pass_count(difficulty: Difficulty, len: usize) -> usize {
    match difficulty {
        Difficulty::Easy => EASY_PASS_FLOOR.max((len as f32 * EASY_PASS_RATIO).floor() as usize),
        Difficulty::Normal => len,
        Difficulty::Hard => len * HARD_PASS_FACTOR,
    }
}

/// Permutes `base` by running the difficulty's pass count of full
/// Fisher-Yates shuffles over the evolving array. Passes compose, so more
/// passes only raise the expected scrambling; there is no guaranteed
/// distance from the input, and a result equal to `base` stays possible.
pub fn shuffle<R: Rng + ?Sized>(base: &[TileId], difficulty: Difficulty, rng: &mut R) -> Vec<TileId> {
    let mut order = base.to_vec();
    if order.len() < 2 {
        return order;
    }
    for _ in 0..pass_count(difficulty, order.len()) {
        fisher_yates_pass(&mut order, rng);
    }
    order
}

fn fisher_yates_pass<R: Rng + ?Sized>(order: &mut [TileId], rng: &mut R) {
    for i in (1..order.len()).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
}
