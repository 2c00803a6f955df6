//! Depth-first solution tracing.
//!
//! The walk marks each room and passage it enters as `Solved`, and on a dead
//! end retreats, re-marking what it leaves as `Tried`. With a task budget,
//! every fork in the maze hands its extra branches to helper tasks; a task
//! that retreats back to one of its forks first waits for the branches it
//! handed out there, and keeps its trail if one of them reached the exit.

use crate::direction::{Direction, Heading};
use crate::display::DisplaySignal;
use crate::grid::{Cell, Grid, Pos};
use crate::lookahead::Lookahead;
use crate::rng::SharedRng;
use crate::stats::EngineStats;
use crate::tasks::TaskGroup;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread::{Scope, ScopedJoinHandle};
use tracing::trace;

/// Length and shape of a traced solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveMetrics {
    /// Cells on the route from the entrance room to the exit room
    pub path_length: usize,
    /// Changes of heading along the route
    pub turn_count: usize,
}

/// Route measurements up to some room.
#[derive(Debug, Clone, Copy)]
struct Progress {
    length: usize,
    turns: usize,
    heading: Option<Heading>,
}

impl Progress {
    fn start() -> Self {
        Self {
            length: 1,
            turns: 0,
            heading: None,
        }
    }

    fn advance(self, heading: Heading) -> Self {
        let turned = self.heading.is_some_and(|prev| prev != heading);
        Self {
            length: self.length + 2,
            turns: self.turns + usize::from(turned),
            heading: Some(heading),
        }
    }

    fn metrics(&self) -> SolveMetrics {
        SolveMetrics {
            path_length: self.length,
            turn_count: self.turns,
        }
    }
}

/// One committed move; `before` is what to go back to on retreat.
struct Step {
    passage: Pos,
    room: Pos,
    before: Progress,
}

/// Branches handed to helpers at the room `depth` steps into a trail.
struct Fork<'scope> {
    depth: usize,
    branches: Vec<ScopedJoinHandle<'scope, bool>>,
}

pub(crate) struct Solver<'a> {
    grid: &'a Grid,
    rng: &'a SharedRng,
    stats: &'a EngineStats,
    display: &'a DisplaySignal,
    group: &'a TaskGroup,
    entrance: Pos,
    exit: Pos,
    solved: AtomicBool,
    result: OnceLock<SolveMetrics>,
}

impl<'a> Solver<'a> {
    /// A solver for the route between the entrance room in the first room row
    /// and the exit room in the last, both at the given grid columns.
    pub fn new(
        grid: &'a Grid,
        rng: &'a SharedRng,
        stats: &'a EngineStats,
        display: &'a DisplaySignal,
        group: &'a TaskGroup,
        entrance_col: usize,
        exit_col: usize,
    ) -> Self {
        Self {
            grid,
            rng,
            stats,
            display,
            group,
            entrance: Pos::new(grid.entrance_row() + 1, entrance_col),
            exit: Pos::new(grid.exit_row() - 1, exit_col),
            solved: AtomicBool::new(false),
            result: OnceLock::new(),
        }
    }

    /// Trace the route, waiting for every helper before returning. The route
    /// is left marked `Solved`, openings included.
    pub fn solve<'scope, 'env>(&'scope self, scope: &'scope Scope<'scope, 'env>) -> Option<SolveMetrics>
    where
        'a: 'scope,
    {
        let opening = Pos::new(self.grid.entrance_row(), self.entrance.col);
        if self.grid.try_claim(self.entrance, Cell::Path, Cell::Solved).is_err() {
            return None;
        }
        let _ = self.grid.try_claim(opening, Cell::Path, Cell::Solved);
        self.display.notify();

        self.explore(scope, self.entrance, Progress::start(), None);
        let helpers = self.group.wait();
        let result = self.result.get().copied();
        trace!(helpers, ?result, "solve finished");
        result
    }

    /// Walk from `origin`, optionally committing to `first` before anything
    /// else. Returns true if this task reached the exit, or if a branch it
    /// forked did and the trail back to `origin` is part of the route.
    fn explore<'scope, 'env>(
        &'scope self,
        scope: &'scope Scope<'scope, 'env>,
        origin: Pos,
        base: Progress,
        first: Option<Direction>,
    ) -> bool
    where
        'a: 'scope,
    {
        let look = Lookahead::tracing(self.grid, self.rng, self.stats);
        let mut trail: Vec<Step> = Vec::new();
        let mut forks: Vec<Fork<'scope>> = Vec::new();
        let mut progress = base;

        if let Some(dir) = first {
            match self.advance(origin, &dir, progress) {
                Some(step) => {
                    trail.push(step);
                    progress = progress.advance(dir.heading);
                }
                None => return false,
            }
        }

        loop {
            let frontier = trail.last().map_or(origin, |step| step.room);
            if frontier == self.exit {
                return self.finish(progress);
            }

            let options = look.trace_directions(frontier);
            if let Some(dir) = options.first() {
                if options.len() > 1 && !self.solved.load(Ordering::Acquire) {
                    let branches: Vec<_> = options
                        .iter()
                        .skip(1)
                        .filter_map(|extra| {
                            self.group
                                .try_spawn(scope, move || self.explore(scope, frontier, progress, Some(extra)))
                        })
                        .collect();
                    if !branches.is_empty() {
                        forks.push(Fork {
                            depth: trail.len(),
                            branches,
                        });
                    }
                }
                if let Some(step) = self.advance(frontier, &dir, progress) {
                    trail.push(step);
                    progress = progress.advance(dir.heading);
                }
                continue;
            }

            // Dead end: settle branches forked here before giving the room up
            let mut reached = false;
            while forks.last().is_some_and(|fork| fork.depth == trail.len()) {
                if let Some(fork) = forks.pop() {
                    for branch in fork.branches {
                        reached |= matches!(branch.join(), Ok(true));
                    }
                }
            }
            if reached {
                return true;
            }

            let Some(step) = trail.pop() else {
                if first.is_none() {
                    let _ = self.grid.try_claim(origin, Cell::Solved, Cell::Tried);
                }
                return false;
            };
            let _ = self.grid.try_claim(step.room, Cell::Solved, Cell::Tried);
            let _ = self.grid.try_claim(step.passage, Cell::Solved, Cell::Tried);
            progress = step.before;
            self.display.notify();
        }
    }

    /// Claim the passage and room one step from `from`.
    fn advance(&self, from: Pos, dir: &Direction, before: Progress) -> Option<Step> {
        let (passage, room) = self.grid.neighbor(from, dir)?;
        self.grid.try_claim(passage, Cell::Path, Cell::Solved).ok()?;
        if self.grid.try_claim(room, Cell::Path, Cell::Solved).is_err() {
            let _ = self.grid.try_claim(passage, Cell::Solved, Cell::Path);
            return None;
        }
        self.display.notify();
        Some(Step {
            passage,
            room,
            before,
        })
    }

    fn finish(&self, progress: Progress) -> bool {
        let opening = Pos::new(self.grid.exit_row(), self.exit.col);
        let _ = self.grid.try_claim(opening, Cell::Path, Cell::Solved);
        self.solved.store(true, Ordering::Release);
        self.display.flush();
        self.result.set(progress.metrics()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::open;
    use std::thread;

    fn solve_between(grid: &Grid, entrance_col: usize, exit_col: usize, budget: usize) -> Option<SolveMetrics> {
        grid.restore(Pos::new(grid.entrance_row(), entrance_col), Cell::Path);
        grid.restore(Pos::new(grid.exit_row(), exit_col), Cell::Path);
        let rng = SharedRng::with_seed(5);
        let stats = EngineStats::new();
        let display = DisplaySignal::silent();
        let group = TaskGroup::new(budget);
        let solver = Solver::new(grid, &rng, &stats, &display, &group, entrance_col, exit_col);
        thread::scope(|s| solver.solve(s))
    }

    /// Rooms on the route: marked `Solved` and at even/even positions.
    fn solved_rooms(grid: &Grid) -> usize {
        grid.rooms().filter(|&r| grid.get(r) == Cell::Solved).count()
    }

    /// A comb: one top corridor with a tooth hanging from every room.
    fn comb(height: usize, width: usize) -> Grid {
        let grid = Grid::new(height, width);
        for col in 0..width - 1 {
            open(&grid, Pos::room(0, col), Pos::room(0, col + 1));
        }
        for col in 0..width {
            for row in 0..height - 1 {
                open(&grid, Pos::room(row, col), Pos::room(row + 1, col));
            }
        }
        grid
    }

    #[test]
    fn test_straight_corridor() {
        // 1x3: entrance and exit both over the middle room
        let grid = Grid::new(1, 3);
        open(&grid, Pos::room(0, 0), Pos::room(0, 1));
        open(&grid, Pos::room(0, 1), Pos::room(0, 2));

        let metrics = solve_between(&grid, 4, 4, 0).unwrap();
        assert_eq!(metrics.path_length, 1);
        assert_eq!(metrics.turn_count, 0);
        assert_eq!(grid.get(Pos::new(1, 4)), Cell::Solved);
        assert_eq!(grid.get(Pos::new(3, 4)), Cell::Solved);
    }

    #[test]
    fn test_route_through_comb() {
        let grid = comb(4, 5);
        // Enter above the first tooth, leave below the fourth
        let metrics = solve_between(&grid, Pos::room(0, 0).col, Pos::room(3, 3).col, 0).unwrap();

        // Across 3 rooms then down 3: 7 rooms, 6 passages
        assert_eq!(metrics.path_length, 13);
        assert_eq!(metrics.turn_count, 1);
        assert_eq!(solved_rooms(&grid), 7);
        assert_eq!(grid.count(Cell::Tried) % 2, 0);
    }

    #[test]
    fn test_concurrent_matches_single() {
        for budget in [0, 1, 3, 16] {
            let grid = comb(6, 8);
            let metrics = solve_between(&grid, Pos::room(0, 7).col, Pos::room(5, 2).col, budget).unwrap();
            assert_eq!(metrics.path_length, 2 * (5 + 5) + 1, "budget {budget}");
            assert_eq!(metrics.turn_count, 1);
            assert_eq!(solved_rooms(&grid), 11, "budget {budget}");
        }
    }

    #[test]
    fn test_unreachable_exit() {
        let grid = Grid::new(2, 2);
        open(&grid, Pos::room(0, 0), Pos::room(0, 1));
        open(&grid, Pos::room(1, 0), Pos::room(1, 1));

        assert_eq!(solve_between(&grid, 2, 2, 0), None);
        assert_eq!(solved_rooms(&grid), 0);
        assert_eq!(grid.get(Pos::room(0, 0)), Cell::Tried);
    }

    #[test]
    fn test_progress_counts_turns() {
        let p = Progress::start()
            .advance(Heading::Down)
            .advance(Heading::Down)
            .advance(Heading::Right)
            .advance(Heading::Down);
        assert_eq!(p.length, 9);
        assert_eq!(p.turns, 2);
    }
}
