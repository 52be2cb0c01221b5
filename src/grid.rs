use rand::Rng;

use crate::config::{CellWeights, GridSize};
use crate::snake::{Direction, Position};
use crate::weighted::{PickOptions, WeightError, Weighted, WeightedTable};

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Cell {
    Empty,
    Block,
    Food,
    Head(Direction),
    Body,
}

impl Cell {
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Block => 'X',
            Self::Food => 'O',
            Self::Head(Direction::Up) => '^',
            Self::Head(Direction::Right) => '>',
            Self::Head(Direction::Down) => 'v',
            Self::Head(Direction::Left) => '<',
            Self::Body => 'S',
        }
    }

    /// Food and walls survive the per-tick reset; everything else is redrawn.
    #[must_use]
    pub fn is_fixture(self) -> bool {
        matches!(self, Self::Food | Self::Block)
    }
}

/// Builds the weighted table used to populate a fresh grid.
pub fn cell_table(weights: CellWeights) -> Result<WeightedTable<Cell>, WeightError> {
    WeightedTable::new(
        vec![
            Weighted::with_prob(Cell::Empty, weights.empty),
            Weighted::with_prob(Cell::Block, weights.block),
            Weighted::with_prob(Cell::Food, weights.food),
        ],
        PickOptions::default(),
    )
}

/// Flat row-major cell buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell holds `cell`.
    #[must_use]
    pub fn filled(size: GridSize, cell: Cell) -> Self {
        Self {
            size,
            cells: vec![cell; size.total_cells()],
        }
    }

    /// Draws every cell independently from `weights`. Draws that hit no band become empty.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        size: GridSize,
        weights: CellWeights,
    ) -> Result<Self, WeightError> {
        let table = cell_table(weights)?;
        let cells = (0..size.total_cells())
            .map(|_| table.pick(rng).copied().unwrap_or(Cell::Empty))
            .collect();

        Ok(Self { size, cells })
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Row-major index of `position`, which is wrapped into bounds first.
    #[must_use]
    pub fn index_of(&self, position: Position) -> usize {
        let position = self.wrap(position);
        position.x as usize + position.y as usize * usize::from(self.size.width)
    }

    /// Inverse of [`Grid::index_of`] for indices inside the grid.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Position {
        let width = usize::from(self.size.width);
        Position::new((index % width) as i32, (index / width) as i32)
    }

    #[must_use]
    pub fn wrap(&self, position: Position) -> Position {
        position.wrapped(self.size)
    }

    #[must_use]
    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    #[must_use]
    pub fn cell_at(&self, position: Position) -> Cell {
        self.cells[self.index_of(position)]
    }

    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    pub fn set_at(&mut self, position: Position, cell: Cell) {
        let index = self.index_of(position);
        self.cells[index] = cell;
    }

    /// Resets everything except food and walls to empty.
    pub fn clear_transient(&mut self) {
        for cell in &mut self.cells {
            if !cell.is_fixture() {
                *cell = Cell::Empty;
            }
        }
    }

    /// First empty cell in row-major order.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.cells.iter().position(|cell| *cell == Cell::Empty)
    }

    /// Uniformly random empty cell, or `None` when the grid has none.
    pub fn random_empty_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let candidates: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(index, _)| index)
            .collect();

        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.gen_range(0..candidates.len())])
    }

    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|candidate| **candidate == cell).count()
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.size.width))
    }
}
