use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::grid::{solved_order, TileId, GRID_SIZE_MIN};
use crate::history::History;
use crate::notifier::CompletionNotifier;
use crate::shuffle::{shuffle, Difficulty};

/// Millisecond timestamp source for history annotations. Never consulted
/// for correctness; tests substitute a fixed function.
pub type Clock = fn() -> u64;

pub fn system_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub grid_size: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size {0} is below the minimum of {GRID_SIZE_MIN}")]
    GridTooSmall(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("tile {0} is not part of this puzzle")]
    UnknownTile(TileId),
    #[error("source and target are both {0}")]
    SameTile(TileId),
}

/// Owns the current tile ordering and everything that mutates it. All
/// operations are synchronous; callers drive it straight from their event
/// handlers and serialize access to one instance.
#[derive(Clone, Debug)]
pub struct Puzzle {
    grid_size: u32,
    difficulty: Difficulty,
    solved: Vec<TileId>,
    order: Vec<TileId>,
    history: History,
    notifier: CompletionNotifier,
    clock: Clock,
}

impl Puzzle {
    /// Starts a fresh puzzle: empty history, current order shuffled from the
    /// solved order. Should the shuffle land back on the solved order, the
    /// completion event is armed right away.
    pub fn start<R: Rng + ?Sized>(config: PuzzleConfig, rng: &mut R) -> Result<Self, ConfigError> {
        Self::start_with_clock(config, rng, system_clock_ms)
    }

    pub fn start_with_clock<R: Rng + ?Sized>(
        config: PuzzleConfig,
        rng: &mut R,
        clock: Clock,
    ) -> Result<Self, ConfigError> {
        if config.grid_size < GRID_SIZE_MIN {
            return Err(ConfigError::GridTooSmall(config.grid_size));
        }
        let solved = solved_order(config.grid_size);
        let order = shuffle(&solved, config.difficulty, rng);
        let mut puzzle = Self {
            grid_size: config.grid_size,
            difficulty: config.difficulty,
            solved,
            order,
            history: History::new(),
            notifier: CompletionNotifier::new(),
            clock,
        };
        puzzle.notifier.observe(puzzle.is_completed());
        Ok(puzzle)
    }

    /// Applies the result of a completed drag: the tiles at the two ids
    /// trade slots. Rejected moves leave every part of the state untouched,
    /// including the history.
    pub fn apply_move(&mut self, source: TileId, target: TileId) -> Result<(), MoveError> {
        if source == target {
            return Err(MoveError::SameTile(source));
        }
        let from = self.slot_of(source).ok_or(MoveError::UnknownTile(source))?;
        let to = self.slot_of(target).ok_or(MoveError::UnknownTile(target))?;
        self.history.push(&self.order, (self.clock)());
        self.order.swap(from, to);
        self.notifier.observe(self.is_completed());
        Ok(())
    }

    /// Steps back to the snapshot at the history cursor. `false` means there
    /// was nothing to undo and the order is unchanged.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(order) => {
                self.order = order;
                self.notifier.observe(self.is_completed());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(order) => {
                self.order = order;
                self.notifier.observe(self.is_completed());
                true
            }
            None => false,
        }
    }

    /// Records the current order, then replaces it with a fresh shuffle of
    /// the solved order. An explicit difficulty becomes the new default for
    /// later reshuffles.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, difficulty: Option<Difficulty>, rng: &mut R) {
        if let Some(difficulty) = difficulty {
            self.difficulty = difficulty;
        }
        if !self.order.is_empty() {
            self.history.push(&self.order, (self.clock)());
        }
        self.order = shuffle(&self.solved, self.difficulty, rng);
        self.notifier.reset();
        self.notifier.observe(self.is_completed());
    }

    /// Slot-indexed view of the current arrangement for renderers and
    /// exporters.
    pub fn current_order(&self) -> &[TileId] {
        &self.order
    }

    pub fn is_completed(&self) -> bool {
        self.order == self.solved
    }

    /// Drains the pending completion event. Yields `true` at most once per
    /// transition onto the solved order; callers poll after each operation.
    pub fn take_completed(&mut self) -> bool {
        self.notifier.take()
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn slot_of(&self, id: TileId) -> Option<usize> {
        self.order.iter().position(|tile| *tile == id)
    }
}
