//! Entrance/exit placement and the exhaustive search for the pair that
//! gives the longest solution.

use crate::display::DisplaySignal;
use crate::error::{MazeError, Result};
use crate::grid::{Cell, Grid, Pos};
use crate::rng::SharedRng;
use crate::solver::{SolveMetrics, Solver};
use crate::stats::EngineStats;
use crate::tasks::TaskGroup;
use serde::{Deserialize, Serialize};
use std::thread;
use tracing::{debug, trace};

/// Entrance above a room of the first row and exit below a room of the last
/// row, both given as room columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Openings {
    pub entrance: usize,
    pub exit: usize,
}

impl Openings {
    pub fn new(entrance: usize, exit: usize) -> Self {
        Self { entrance, exit }
    }

    /// Grid column of the entrance passage.
    pub fn entrance_col(&self) -> usize {
        Pos::room(0, self.entrance).col
    }

    /// Grid column of the exit passage.
    pub fn exit_col(&self) -> usize {
        Pos::room(0, self.exit).col
    }

    pub fn entrance_pos(&self, grid: &Grid) -> Pos {
        Pos::new(grid.entrance_row(), self.entrance_col())
    }

    pub fn exit_pos(&self, grid: &Grid) -> Pos {
        Pos::new(grid.exit_row(), self.exit_col())
    }

    /// Check both columns lie inside a maze `width` rooms wide.
    pub fn validate(&self, width: usize) -> Result<()> {
        if self.entrance >= width || self.exit >= width {
            return Err(MazeError::OpeningOutOfRange {
                entrance: self.entrance,
                exit: self.exit,
                width,
            });
        }
        Ok(())
    }

    /// Open both passages in the outer wall.
    pub(crate) fn create(&self, grid: &Grid) {
        let _ = grid.try_claim(self.entrance_pos(grid), Cell::Wall, Cell::Path);
        let _ = grid.try_claim(self.exit_pos(grid), Cell::Wall, Cell::Path);
    }

    /// Close both passages again. Expects the solution to be cleared first.
    pub(crate) fn remove(&self, grid: &Grid) {
        let _ = grid.try_claim(self.entrance_pos(grid), Cell::Path, Cell::Wall);
        let _ = grid.try_claim(self.exit_pos(grid), Cell::Path, Cell::Wall);
    }

    pub(crate) fn solver<'a>(
        &self,
        grid: &'a Grid,
        rng: &'a SharedRng,
        stats: &'a EngineStats,
        display: &'a DisplaySignal,
        group: &'a TaskGroup,
    ) -> Solver<'a> {
        Solver::new(grid, rng, stats, display, group, self.entrance_col(), self.exit_col())
    }
}

/// The winning pair and the solution it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningChoice {
    pub openings: Openings,
    pub metrics: SolveMetrics,
}

impl OpeningChoice {
    fn beats(&self, other: &OpeningChoice) -> bool {
        let (a, b) = (self.metrics, other.metrics);
        a.path_length > b.path_length || (a.path_length == b.path_length && a.turn_count > b.turn_count)
    }
}

/// A room's column is only offered as an opening when the room sits at a
/// corner, i.e. has a wall on its left or right.
fn is_anchored(grid: &Grid, room: Pos) -> bool {
    let side_wall = |d_col: isize| room.offset(0, d_col).is_some_and(|p| grid.get(p) == Cell::Wall);
    side_wall(-1) || side_wall(1)
}

/// Solve the maze for every candidate opening pair and commit the pair with
/// the longest solution, ties going to the one with more turns. Returns
/// `None` if no pair could be solved.
pub(crate) fn optimize(grid: &Grid, rng: &SharedRng, stats: &EngineStats) -> Option<OpeningChoice> {
    let width = grid.width();
    let last_row = grid.height() - 1;
    let entrances: Vec<usize> = (0..width)
        .filter(|&c| is_anchored(grid, Pos::room(0, c)))
        .collect();
    let exits: Vec<usize> = (0..width)
        .filter(|&c| is_anchored(grid, Pos::room(last_row, c)))
        .collect();

    let silent = DisplaySignal::silent();
    let mut best: Option<OpeningChoice> = None;
    for &entrance in &entrances {
        for &exit in &exits {
            let openings = Openings::new(entrance, exit);
            openings.create(grid);

            let group = TaskGroup::new(0);
            let solver = openings.solver(grid, rng, stats, &silent, &group);
            let solved = thread::scope(|s| solver.solve(s));
            stats.record_solve();
            trace!(entrance, exit, ?solved, "opening pair solved");

            if let Some(metrics) = solved {
                let choice = OpeningChoice { openings, metrics };
                if best.map_or(true, |b| choice.beats(&b)) {
                    stats.record_best_solution(metrics.path_length, metrics.turn_count);
                    best = Some(choice);
                }
            }

            grid.clear_solution();
            openings.remove(grid);
        }
    }
    stats.finish_maze();

    if let Some(choice) = best {
        choice.openings.create(grid);
        debug!(
            entrance = choice.openings.entrance,
            exit = choice.openings.exit,
            path_length = choice.metrics.path_length,
            turns = choice.metrics.turn_count,
            "best openings"
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{open, room_distances};

    fn optimize_fresh(grid: &Grid) -> Option<OpeningChoice> {
        optimize(grid, &SharedRng::with_seed(3), &EngineStats::new())
    }

    /// Longest solution over every candidate pair, measured by BFS on the
    /// tree instead of by the solver.
    fn oracle(grid: &Grid) -> usize {
        let last_row = grid.height() - 1;
        let mut longest = 0;
        for entrance in (0..grid.width()).filter(|&c| is_anchored(grid, Pos::room(0, c))) {
            let dist = room_distances(grid, Pos::room(0, entrance));
            for exit in (0..grid.width()).filter(|&c| is_anchored(grid, Pos::room(last_row, c))) {
                if let Some(steps) = dist.get(&Pos::room(last_row, exit)) {
                    longest = longest.max(2 * steps + 1);
                }
            }
        }
        longest
    }

    /// 3x3 serpentine: right along row 0, left along row 1, right along row 2.
    fn serpentine() -> Grid {
        let grid = Grid::new(3, 3);
        for col in 0..2 {
            open(&grid, Pos::room(0, col), Pos::room(0, col + 1));
            open(&grid, Pos::room(1, col), Pos::room(1, col + 1));
            open(&grid, Pos::room(2, col), Pos::room(2, col + 1));
        }
        open(&grid, Pos::room(0, 2), Pos::room(1, 2));
        open(&grid, Pos::room(1, 0), Pos::room(2, 0));
        grid
    }

    #[test]
    fn test_serpentine_uses_whole_path() {
        let grid = serpentine();
        let choice = optimize_fresh(&grid).unwrap();

        assert_eq!(choice.openings, Openings::new(0, 2));
        assert_eq!(choice.metrics.path_length, 17);
        assert_eq!(choice.metrics.turn_count, 4);
        assert_eq!(choice.metrics.path_length, oracle(&grid));
    }

    #[test]
    fn test_winner_is_committed_and_grid_restored() {
        let grid = serpentine();
        let before = grid.snapshot();
        let choice = optimize_fresh(&grid).unwrap();

        assert_eq!(grid.get(choice.openings.entrance_pos(&grid)), Cell::Path);
        assert_eq!(grid.get(choice.openings.exit_pos(&grid)), Cell::Path);
        choice.openings.remove(&grid);
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn test_middle_of_straight_row_is_not_a_candidate() {
        let grid = serpentine();
        assert!(is_anchored(&grid, Pos::room(0, 0)));
        assert!(!is_anchored(&grid, Pos::room(0, 1)));
        assert!(is_anchored(&grid, Pos::room(0, 2)));
    }

    #[test]
    fn test_matches_oracle_on_comb() {
        let grid = Grid::new(3, 4);
        for col in 0..3 {
            open(&grid, Pos::room(1, col), Pos::room(1, col + 1));
        }
        for col in 0..4 {
            open(&grid, Pos::room(0, col), Pos::room(1, col));
            open(&grid, Pos::room(1, col), Pos::room(2, col));
        }
        let choice = optimize_fresh(&grid).unwrap();
        assert_eq!(choice.metrics.path_length, oracle(&grid));
        assert_eq!(choice.metrics.path_length, 11);
    }

    #[test]
    fn test_ties_go_to_more_turns() {
        let straight = OpeningChoice {
            openings: Openings::new(0, 0),
            metrics: SolveMetrics { path_length: 9, turn_count: 0 },
        };
        let bent = OpeningChoice {
            openings: Openings::new(0, 1),
            metrics: SolveMetrics { path_length: 9, turn_count: 2 },
        };
        assert!(bent.beats(&straight));
        assert!(!straight.beats(&bent));
        assert!(!straight.beats(&straight));
    }
}
