use crate::direction::DIRECTIONS;
use crate::display::DisplaySignal;
use crate::grid::{Cell, Grid, Pos};
use crate::lookahead::Lookahead;
use crate::rng::SharedRng;
use crate::stats::EngineStats;
use crate::tasks::TaskGroup;
use std::thread::Scope;
use tracing::trace;

/// Carves corridors into a walled grid until every room is reachable.
///
/// Shared by reference between the task that started carving and every
/// helper it spawns; all mutation goes through the grid's atomic cells.
pub(crate) struct Carver<'a> {
    grid: &'a Grid,
    rng: &'a SharedRng,
    stats: &'a EngineStats,
    display: &'a DisplaySignal,
    group: &'a TaskGroup,
    depth: usize,
}

impl<'a> Carver<'a> {
    pub fn new(
        grid: &'a Grid,
        rng: &'a SharedRng,
        stats: &'a EngineStats,
        display: &'a DisplaySignal,
        group: &'a TaskGroup,
        depth: usize,
    ) -> Self {
        Self {
            grid,
            rng,
            stats,
            display,
            group,
            depth,
        }
    }

    fn lookahead(&self) -> Lookahead<'a> {
        Lookahead::carving(self.grid, self.rng, self.stats, self.display, self.depth)
    }

    /// Carve the whole grid starting at `start` and wait for every helper.
    ///
    /// A task gives up when it loses a race for its corridor origin, so once
    /// all tasks are done the remaining walls are swept up until none is left.
    pub fn carve_all<'scope, 'env>(&'scope self, scope: &'scope Scope<'scope, 'env>, start: Pos)
    where
        'a: 'scope,
    {
        self.run(scope, Some(start));
        self.group.wait();
        while self.find_path_start().is_some() {
            self.run(scope, None);
            self.group.wait();
        }
    }

    /// Carve from `first` (if given), then keep starting corridors off the
    /// existing paths until no room can start one.
    fn run<'scope, 'env>(&'scope self, scope: &'scope Scope<'scope, 'env>, first: Option<Pos>)
    where
        'a: 'scope,
    {
        if let Some(start) = first {
            self.carve_path(scope, start);
        }
        while let Some(start) = self.find_path_start() {
            if self.carve_path(scope, start) == 0 {
                break;
            }
        }
    }

    /// Extend one corridor from `start` as far as the lookahead allows.
    /// Returns the number of rooms added.
    fn carve_path<'scope, 'env>(&'scope self, scope: &'scope Scope<'scope, 'env>, start: Pos) -> usize
    where
        'a: 'scope,
    {
        self.stats.record_corridor();
        // The very first corridor starts inside solid wall
        let _ = self.grid.try_claim(start, Cell::Wall, Cell::Path);

        let look = self.lookahead();
        let mut requested = self.depth as i32;
        let mut frontier = start;
        let mut length = 0;
        loop {
            let found = look.find_directions(frontier, &mut requested, Cell::Wall);
            if found.is_empty() {
                break;
            }
            let Some(dir) = found.get(self.rng.below(found.len())) else {
                break;
            };
            let Some((passage, room)) = self.grid.neighbor(frontier, &dir) else {
                break;
            };
            if self.grid.try_claim(passage, Cell::Wall, Cell::Path).is_err() {
                continue;
            }
            if self.grid.try_claim(room, Cell::Wall, Cell::Path).is_err() {
                let _ = self.grid.try_claim(passage, Cell::Path, Cell::Wall);
                continue;
            }
            frontier = room;
            length += 1;
            self.stats.record_carved_step();
            self.display.notify();
            self.spawn_helper(scope);
        }
        trace!(%start, end = %frontier, length, "corridor carved");
        length
    }

    fn spawn_helper<'scope, 'env>(&'scope self, scope: &'scope Scope<'scope, 'env>)
    where
        'a: 'scope,
    {
        if !self.group.has_capacity() {
            return;
        }
        if self.group.try_spawn(scope, move || self.run(scope, None)).is_some() {
            self.stats.record_task_spawned();
        }
    }

    /// Scan the rooms, starting at a random one, for a carved room that is
    /// not the middle of a straight corridor and still has a wall to carve
    /// into.
    pub fn find_path_start(&self) -> Option<Pos> {
        let height = self.grid.height();
        let width = self.grid.width();
        let row_start = self.rng.below(height);
        let col_start = self.rng.below(width);
        let look = self.lookahead();

        for i in 0..height {
            for j in 0..width {
                let room = Pos::room((row_start + i) % height, (col_start + j) % width);
                if self.grid.get(room) != Cell::Path || self.straight_through(room) {
                    continue;
                }
                let mut requested = 0;
                if !look.find_directions(room, &mut requested, Cell::Wall).is_empty() {
                    return Some(room);
                }
            }
        }
        None
    }

    /// Carved both ways along one axis.
    fn straight_through(&self, room: Pos) -> bool {
        let open = |d_row: isize, d_col: isize| {
            let passage = room.offset(d_row / 2, d_col / 2);
            let next = room.offset(d_row, d_col);
            matches!((passage, next), (Some(p), Some(n))
                if self.grid.get(p) == Cell::Path && self.grid.get(n) == Cell::Path)
        };
        let [down, up, right, left] = DIRECTIONS.map(|d| open(d.d_row, d.d_col));
        (up && down) || (left && right)
    }
}
