// grid.rs - Grid type for Conway's Game of Life

use rand::Rng;

/// Offsets of the 8-neighbourhood, row-major.
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// Square, bounded grid of cells. Cells outside `0..size` are treated as dead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,   // row-major, size * size
}

impl Grid {
    /// All-dead `size`×`size` grid. A size of zero is bumped to one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Builds a grid from explicit rows. Returns `None` unless the input is
    /// non-empty and square.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Out-of-range coordinates read as dead.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row * self.size + col]
    }

    /// Writes are ignored outside the grid.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = alive;
        }
    }

    /// Live cells among the in-bounds 8-neighbours. No wraparound.
    pub fn live_neighbours(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for &(dr, dc) in &NEIGHBOURS {
            let (Some(nr), Some(nc)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
                continue;
            };
            if self.get(nr, nc) { count += 1; }
        }
        count
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Every cell independently alive with probability ½.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = rng.gen_bool(0.5);
        }
    }

    /// Snapshot as nested rows, the shape carried by full-grid notifications.
    pub fn rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.size).map(<[bool]>::to_vec).collect()
    }
}
