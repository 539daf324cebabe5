// surface.rs - What a board currently shows

use conway::Grid;

/// The visible cells of one board. Only ever written from engine
/// notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    cells: Grid,
    generation: u64,
}

impl Surface {
    pub fn from_rows(rows: &[Vec<bool>], generation: u64) -> Option<Self> {
        Grid::from_rows(rows).map(|cells| Self { cells, generation })
    }

    pub fn size(&self) -> usize {
        self.cells.size()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cells.get(row, col)
    }

    pub fn population(&self) -> usize {
        self.cells.population()
    }

    /// Updates one cell. Returns `false` if there is no such cell.
    pub fn set(&mut self, row: usize, col: usize, alive: bool, generation: u64) -> bool {
        if row >= self.size() || col >= self.size() {
            return false;
        }
        self.cells.set(row, col, alive);
        self.generation = self.generation.max(generation);
        true
    }

    pub fn advance(&mut self, generation: u64) {
        self.generation = self.generation.max(generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_updates_stay_inside() {
        let mut surface = Surface::from_rows(&[vec![false; 3], vec![false; 3], vec![false; 3]], 0).unwrap();
        assert!(surface.set(1, 2, true, 4));
        assert!(surface.is_alive(1, 2));
        assert_eq!(surface.generation(), 4);
        assert_eq!(surface.population(), 1);

        assert!(!surface.set(3, 0, true, 5));
        assert_eq!(surface.generation(), 4);

        surface.advance(6);
        surface.advance(5);
        assert_eq!(surface.generation(), 6);
        assert_eq!(surface.population(), 1);
    }

    #[test]
    fn ragged_rows_are_refused() {
        assert!(Surface::from_rows(&[vec![true], vec![true, false]], 0).is_none());
    }
}
