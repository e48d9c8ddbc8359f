/// Grid primitives: cells, directions and pixel-space conversion.
/// Movement semantics (wraparound, reversal) are centralized here.

/// Side length of one grid cell in pixel units.
/// Effects and swipe gestures are expressed in this space.
pub const CELL_SIZE: f32 = 20.0;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Neighbour in `dir`, wrapped onto a toroidal `size` × `size` grid.
    pub fn step(self, dir: Direction, size: i32) -> Cell {
        let (dx, dy) = dir.delta();
        Cell {
            x: (self.x + dx).rem_euclid(size),
            y: (self.y + dy).rem_euclid(size),
        }
    }

    pub fn in_bounds(self, size: i32) -> bool {
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }

    /// Pixel-space center of this cell.
    pub fn pixel_center(self) -> PixelPoint {
        PixelPoint {
            x: self.x as f32 * CELL_SIZE + CELL_SIZE / 2.0,
            y: self.y as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit delta; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (0, -1),
            Direction::Down  => (0, 1),
            Direction::Left  => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up    => Direction::Down,
            Direction::Down  => Direction::Up,
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_reverse_of(self, other: Direction) -> bool {
        self.opposite() == other
    }
}
