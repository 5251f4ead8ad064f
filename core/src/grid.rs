use std::fmt;
use std::str::FromStr;

pub const GRID_SIZE_MIN: u32 = 2;

/// Origin cell of a tile in the unshuffled image. Fixed for the tile's
/// whole lifetime; two tiles are the same tile iff their origins match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId {
    pub row: u32,
    pub col: u32,
}

impl TileId {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTileIdError {
    #[error("tile key must look like row-col, got {0:?}")]
    Shape(String),
    #[error("tile key part {0:?} is not a number")]
    Number(String),
}

impl FromStr for TileId {
    type Err = ParseTileIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (row, col) = trimmed
            .split_once('-')
            .ok_or_else(|| ParseTileIdError::Shape(trimmed.to_string()))?;
        let number = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| ParseTileIdError::Number(part.to_string()))
        };
        Ok(Self {
            row: number(row)?,
            col: number(col)?,
        })
    }
}

/// Identity permutation for a grid: the tile at slot i is the tile whose
/// origin cell is slot i's cell.
pub fn solved_order(grid_size: u32) -> Vec<TileId> {
    let total = (grid_size * grid_size) as usize;
    (0..total)
        .map(|index| {
            let (row, col) = slot_cell(index, grid_size);
            TileId { row, col }
        })
        .collect()
}

pub fn slot_cell(index: usize, grid_size: u32) -> (u32, u32) {
    let index = index as u32;
    (index / grid_size, index % grid_size)
}

pub fn cell_index(row: u32, col: u32, grid_size: u32) -> usize {
    (row * grid_size + col) as usize
}
