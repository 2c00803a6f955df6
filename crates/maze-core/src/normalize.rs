//! Relocation of passages that open in the middle of a straight wall.
//!
//! A passage whose four diagonal neighbours are all open sits between two
//! rooms that both continue straight through; rendered, it looks like a gap
//! in the middle of a wall. Closing it and opening the next passage along the
//! same wall (right for horizontal walls, down for vertical ones) keeps the
//! maze a spanning tree while removing the gap.

use crate::display::DisplaySignal;
use crate::grid::{Cell, Grid, Pos};
use crate::stats::EngineStats;
use tracing::debug;

/// Push mid-wall openings until a full pass moves none. Returns the total
/// number of openings moved.
pub(crate) fn push_mid_wall_openings(grid: &Grid, stats: &EngineStats, display: &DisplaySignal) -> usize {
    let mut total = 0;
    loop {
        let mut moves = 0;
        for row in 1..grid.rows() - 1 {
            for col in ((row & 1) + 1..grid.cols() - 1).step_by(2) {
                let pos = Pos::new(row, col);
                if !is_mid_wall_opening(grid, pos) {
                    continue;
                }
                if grid.try_claim(pos, Cell::Path, Cell::Wall).is_err() {
                    continue;
                }
                let target = if row & 1 == 1 {
                    Pos::new(row, col + 2)
                } else {
                    Pos::new(row + 2, col)
                };
                let _ = grid.try_claim(target, Cell::Wall, Cell::Path);
                moves += 1;
                stats.record_wall_push();
                display.notify();
            }
        }
        display.flush();
        debug!(moves, "mid-wall pass complete");
        total += moves;
        if moves == 0 {
            break;
        }
    }
    total
}

/// An open passage with every diagonal neighbour open too.
pub fn is_mid_wall_opening(grid: &Grid, pos: Pos) -> bool {
    if grid.get(pos) != Cell::Path || grid.is_border(pos) {
        return false;
    }
    [(-1, -1), (-1, 1), (1, -1), (1, 1)]
        .into_iter()
        .all(|(d_row, d_col)| pos.offset(d_row, d_col).is_some_and(|p| grid.get(p) != Cell::Wall))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{is_spanning_tree, mid_wall_openings, open};

    /// Two full columns joined in the middle: the join is a mid-wall gap.
    fn two_columns() -> Grid {
        let grid = Grid::new(3, 2);
        for row in 0..2 {
            open(&grid, Pos::room(row, 0), Pos::room(row + 1, 0));
            open(&grid, Pos::room(row, 1), Pos::room(row + 1, 1));
        }
        open(&grid, Pos::room(1, 0), Pos::room(1, 1));
        grid
    }

    #[test]
    fn test_detects_mid_wall_opening() {
        let grid = two_columns();
        assert!(is_mid_wall_opening(&grid, Pos::new(4, 3)));
        // Vertical passages along the columns are not
        assert!(!is_mid_wall_opening(&grid, Pos::new(3, 2)));
        // Walls never are
        assert!(!is_mid_wall_opening(&grid, Pos::new(2, 3)));
    }

    #[test]
    fn test_pushes_horizontal_gap_down() {
        let grid = two_columns();
        assert!(is_spanning_tree(&grid));

        let stats = EngineStats::new();
        let moved = push_mid_wall_openings(&grid, &stats, &DisplaySignal::silent());

        assert_eq!(moved, 1);
        assert_eq!(grid.get(Pos::new(4, 3)), Cell::Wall);
        assert_eq!(grid.get(Pos::new(6, 3)), Cell::Path);
        assert!(is_spanning_tree(&grid));
        assert_eq!(stats.snapshot().wall_pushes, 1);
    }

    #[test]
    fn test_pushes_vertical_gap_right() {
        // Two full rows joined in the middle column
        let grid = Grid::new(2, 3);
        for col in 0..2 {
            open(&grid, Pos::room(0, col), Pos::room(0, col + 1));
            open(&grid, Pos::room(1, col), Pos::room(1, col + 1));
        }
        open(&grid, Pos::room(0, 1), Pos::room(1, 1));

        let moved = push_mid_wall_openings(&grid, &EngineStats::new(), &DisplaySignal::silent());

        assert_eq!(moved, 1);
        assert_eq!(grid.get(Pos::new(3, 4)), Cell::Wall);
        assert_eq!(grid.get(Pos::new(3, 6)), Cell::Path);
        assert!(is_spanning_tree(&grid));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let grid = two_columns();
        let stats = EngineStats::new();
        push_mid_wall_openings(&grid, &stats, &DisplaySignal::silent());
        let before = grid.snapshot();

        assert_eq!(push_mid_wall_openings(&grid, &stats, &DisplaySignal::silent()), 0);
        assert_eq!(grid.snapshot(), before);
        assert_eq!(mid_wall_openings(&grid), 0);
    }
}
