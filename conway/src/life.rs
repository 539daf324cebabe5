// life.rs - Synchronous generation stepping (B3/S23)

use crate::grid::Grid;

/// One cell whose state differs between two generations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    pub alive: bool,
}

/// Conway's rule for a single cell.
pub fn next_state(alive: bool, neighbours: u8) -> bool {
    match (alive, neighbours) {
        (true, 2) | (true, 3) => true,   // Survival
        (false, 3)            => true,   // Birth
        _                     => false,  // Death or stays dead
    }
}

/// Computes one row of the successor, reading only from `current`.
pub fn process_row(current: &Grid, row: usize) -> Vec<bool> {
    (0..current.size())
        .map(|col| next_state(current.get(row, col), current.live_neighbours(row, col)))
        .collect()
}

/// Full successor of `current`. Every cell is evaluated against the same
/// snapshot; `current` is never touched.
pub fn step(current: &Grid) -> Grid {
    let size = current.size();
    let mut next = Grid::new(size);
    for row in 0..size {
        for (col, alive) in process_row(current, row).into_iter().enumerate() {
            next.set(row, col, alive);
        }
    }
    next
}

/// Cells that differ between `before` and `after`, row-major. Both grids must
/// have the same size.
pub fn diff(before: &Grid, after: &Grid) -> Vec<CellChange> {
    debug_assert_eq!(before.size(), after.size());
    let size = after.size();
    let mut changes = Vec::new();
    for row in 0..size {
        for col in 0..size {
            let alive = after.get(row, col);
            if before.get(row, col) != alive {
                changes.push(CellChange { row, col, alive });
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{self, Pattern};

    fn grid(rows: &[&[u8]]) -> Grid {
        let rows: Vec<Vec<bool>> = rows.iter().map(|r| r.iter().map(|&c| c == 1).collect()).collect();
        Grid::from_rows(&rows).unwrap()
    }

    fn live_cells(grid: &Grid) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..grid.size() {
            for col in 0..grid.size() {
                if grid.get(row, col) { cells.push((row, col)); }
            }
        }
        cells
    }

    #[test]
    fn rule_table() {
        for n in 0..=8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "alive with {n}");
            assert_eq!(next_state(false, n), n == 3, "dead with {n}");
        }
    }

    #[test]
    fn dead_grid_stays_dead() {
        for size in [1, 2, 5, 30] {
            assert_eq!(step(&Grid::new(size)).population(), 0);
        }
    }

    #[test]
    fn blinker_uses_one_snapshot() {
        // In-place row-major updating would kill (1,1) before (0,1) is evaluated.
        let before = grid(&[&[0, 0, 0], &[1, 1, 1], &[0, 0, 0]]);
        let after = step(&before);
        assert_eq!(after, grid(&[&[0, 1, 0], &[0, 1, 0], &[0, 1, 0]]));
        assert_eq!(step(&after), before);
    }

    #[test]
    fn edges_do_not_wrap() {
        // Three live cells along the left edge: with wraparound the right edge
        // would see neighbours too.
        let before = grid(&[&[1, 0, 0, 0], &[1, 0, 0, 0], &[1, 0, 0, 0], &[0, 0, 0, 0]]);
        let after = step(&before);
        assert_eq!(live_cells(&after), vec![(1, 0), (1, 1)]);
    }

    #[test]
    fn block_is_still_life() {
        let block = grid(&[&[0, 0, 0, 0], &[0, 1, 1, 0], &[0, 1, 1, 0], &[0, 0, 0, 0]]);
        assert_eq!(step(&block), block);
        assert!(diff(&block, &step(&block)).is_empty());
    }

    #[test]
    fn glider_translates_after_four_generations() {
        let glider: &Pattern = patterns::find("Glider").unwrap();
        let mut world = Grid::new(12);
        glider.stamp(&mut world, 2, 2);
        let start = live_cells(&world);

        for _ in 0..4 {
            world = step(&world);
        }

        let shifted: Vec<_> = start.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
        assert_eq!(live_cells(&world), shifted);
    }

    #[test]
    fn diff_reports_only_changed_cells() {
        let before = grid(&[&[0, 0, 0], &[1, 1, 1], &[0, 0, 0]]);
        let after = step(&before);
        let changes = diff(&before, &after);
        assert_eq!(
            changes,
            vec![
                CellChange { row: 0, col: 1, alive: true },
                CellChange { row: 1, col: 0, alive: false },
                CellChange { row: 1, col: 2, alive: false },
                CellChange { row: 2, col: 1, alive: true },
            ]
        );
    }
}
