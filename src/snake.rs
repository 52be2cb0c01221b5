use std::collections::VecDeque;

use crate::config::GridSize;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position wrapped into bounds on both axes.
    #[must_use]
    pub fn wrapped(self, bounds: GridSize) -> Self {
        Self {
            x: self.x.rem_euclid(i32::from(bounds.width)),
            y: self.y.rem_euclid(i32::from(bounds.height)),
        }
    }

    /// Componentwise sum with a direction's unit vector.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Heading of the snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

/// Clockwise turn order used by [`rotate`].
pub const DIRECTION_CYCLE: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    /// Unit vector in screen coordinates (y grows downwards).
    #[must_use]
    pub fn vector(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Quarter turn relative to the current heading.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Rotation {
    Left,
    Right,
}

impl Rotation {
    fn step(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Rotates `direction` one step through [`DIRECTION_CYCLE`].
#[must_use]
pub fn rotate(direction: Direction, rotation: Rotation) -> Direction {
    let len = DIRECTION_CYCLE.len() as i32;
    let current = DIRECTION_CYCLE
        .iter()
        .position(|candidate| *candidate == direction)
        .unwrap_or_default() as i32;
    let target = (current + rotation.step()).rem_euclid(len);
    DIRECTION_CYCLE[target as usize]
}

/// Head of the snake plus its growth counter. The trail lives in [`PositionMemory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub position: Position,
    pub direction: Direction,
    pub length: u32,
    pub speed: u32,
}

impl Snake {
    /// Creates a length-1 snake at `start`.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self {
            position: start,
            direction,
            length: 1,
            speed: 1,
        }
    }

    /// Changes heading without moving.
    pub fn turn(&mut self, rotation: Rotation) {
        self.direction = rotate(self.direction, rotation);
    }

    pub fn grow(&mut self) {
        self.length += 1;
    }

    /// Moves one cell along the heading, wrapping around the grid edges.
    pub fn advance(&mut self, bounds: GridSize) {
        debug_assert!(bounds.width > 0 && bounds.height > 0);
        self.position = self.position.stepped(self.direction).wrapped(bounds);
    }
}

/// Grid indices the snake body occupies, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMemory {
    indices: VecDeque<usize>,
}

impl PositionMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-move head index, keeping at most `length - 1` entries.
    ///
    /// Evicts at most one entry per call; length grows by one at a time so that is enough.
    pub fn advance(&mut self, head_index: usize, length: u32) {
        let length = length as usize;
        if self.indices.len() + 2 > length {
            self.indices.pop_front();
        }
        if self.indices.len() + 1 < length {
            self.indices.push_back(head_index);
        }
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates from the oldest (tail) to the newest segment.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}
