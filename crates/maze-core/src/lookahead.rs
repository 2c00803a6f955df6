//! Bounded lookahead over the shared grid.
//!
//! A query asks which of the four directions out of a room can be extended
//! into a chain of `requested + 1` rooms that all still hold the target
//! value (`Wall` while carving, `Path` while tracing a solution). Probed
//! cells are reserved as `Checking` so concurrent tasks do not probe through
//! each other, and every reservation is undone before the probe returns:
//! only the caller commits a direction.
//!
//! When no direction reaches the requested depth the query retries with the
//! depth reduced by the smallest shortfall seen, so repeated queries settle
//! on the longest chain that actually exists instead of creeping down by one.

use crate::direction::{self, Direction, DirectionSet, DIRECTIONS};
use crate::display::DisplaySignal;
use crate::grid::{Cell, Grid, Pos};
use crate::rng::SharedRng;
use crate::stats::EngineStats;

/// Probes allowed per direction, per unit of configured depth.
const PROBES_PER_LEVEL: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Carve,
    Trace,
}

/// Per-direction probe accounting.
struct ProbeBudget {
    limit: usize,
    used: usize,
}

pub(crate) struct Lookahead<'a> {
    grid: &'a Grid,
    rng: &'a SharedRng,
    stats: &'a EngineStats,
    display: Option<&'a DisplaySignal>,
    mode: Mode,
    depth: i32,
}

impl<'a> Lookahead<'a> {
    /// Lookahead for carving new corridors through `Wall`.
    pub fn carving(
        grid: &'a Grid,
        rng: &'a SharedRng,
        stats: &'a EngineStats,
        display: &'a DisplaySignal,
        depth: usize,
    ) -> Self {
        Self {
            grid,
            rng,
            stats,
            display: Some(display),
            mode: Mode::Carve,
            depth: depth as i32,
        }
    }

    /// Single-step lookahead for following existing `Path`.
    pub fn tracing(grid: &'a Grid, rng: &'a SharedRng, stats: &'a EngineStats) -> Self {
        Self {
            grid,
            rng,
            stats,
            display: None,
            mode: Mode::Trace,
            depth: -1,
        }
    }

    /// Directions out of `origin` whose next cells hold `Path`, in random order.
    pub fn trace_directions(&self, origin: Pos) -> DirectionSet {
        let mut requested = -1;
        self.find_directions(origin, &mut requested, Cell::Path)
    }

    /// Directions out of `origin` that can be extended `requested` rooms deep
    /// through cells holding `target`.
    ///
    /// `requested` is updated to the depth that was finally satisfied (one
    /// more if the full request was met and is still below the configured
    /// depth), so a carver can feed it back into its next query.
    pub fn find_directions(&self, origin: Pos, requested: &mut i32, target: Cell) -> DirectionSet {
        let mut found = DirectionSet::new();
        let mut probes = 0;

        let holds_origin = target == Cell::Wall;
        if holds_origin && self.grid.try_claim(origin, Cell::Path, Cell::Checking).is_err() {
            return found;
        }

        let mut len = *requested;
        let mut lowest = [len; 4];
        loop {
            self.stats.record_probe(len.max(0) as usize, 0);
            let offset = self.rng.below(DIRECTIONS.len());
            for (i, dir) in direction::rotated(offset).enumerate() {
                let mut remaining = len;
                if self.look(origin, dir, target, &mut remaining, &mut lowest[i], &mut probes) {
                    found.push(*dir);
                }
            }
            if !found.is_empty() || len < 0 {
                break;
            }
            let shortfall = lowest.iter().copied().min().unwrap_or(1).max(1);
            len -= shortfall;
        }

        if len == *requested && len < self.depth {
            len += 1;
        }
        *requested = len;

        if holds_origin {
            let _ = self.grid.try_claim(origin, Cell::Checking, Cell::Path);
        }
        self.stats.record_checks(probes);
        found
    }

    /// Both cells one step away hold `target`.
    fn matches(&self, from: Pos, dir: &Direction, target: Cell) -> bool {
        self.grid
            .neighbor(from, dir)
            .is_some_and(|(passage, room)| {
                self.grid.get(passage) == target && self.grid.get(room) == target
            })
    }

    fn look(
        &self,
        origin: Pos,
        dir: &Direction,
        target: Cell,
        remaining: &mut i32,
        lowest: &mut i32,
        probes: &mut usize,
    ) -> bool {
        if !self.matches(origin, dir, target) {
            return false;
        }
        // Orphans only matter for a fresh carving request at full depth
        if self.mode == Mode::Carve
            && *remaining > 0
            && *remaining == self.depth
            && self.would_orphan(origin, dir)
        {
            return false;
        }
        let mut budget = ProbeBudget {
            limit: PROBES_PER_LEVEL * (self.depth + 1).max(0) as usize,
            used: 0,
        };
        self.probe(origin, dir, target, remaining, lowest, &mut budget, probes)
    }

    #[allow(clippy::too_many_arguments)]
    fn probe(
        &self,
        from: Pos,
        dir: &Direction,
        target: Cell,
        remaining: &mut i32,
        lowest: &mut i32,
        budget: &mut ProbeBudget,
        probes: &mut usize,
    ) -> bool {
        if *remaining < 0 {
            return true;
        }
        if budget.used >= budget.limit {
            self.stats.record_checks_exceeded();
            return false;
        }
        let Some((passage, room)) = self.grid.neighbor(from, dir) else {
            return false;
        };
        if self.grid.get(room) != target {
            return false;
        }
        if self.grid.try_claim(passage, target, Cell::Checking).is_err() {
            return false;
        }
        if self.grid.try_claim(room, target, Cell::Checking).is_err() {
            let _ = self.grid.try_claim(passage, Cell::Checking, target);
            return false;
        }
        self.show_probe(*remaining, *probes);

        *remaining -= 1;
        budget.used += 1;
        *probes += 1;

        let offset = self.rng.below(DIRECTIONS.len());
        let mut extended = false;
        for next in direction::rotated(offset) {
            let mut branch = *remaining;
            if self.matches(room, next, target)
                && self.probe(room, next, target, &mut branch, lowest, budget, probes)
            {
                *remaining = branch;
                extended = true;
                break;
            }
        }
        *lowest = (*lowest).min(*remaining);
        *remaining += 1;

        let _ = self.grid.try_claim(room, Cell::Checking, target);
        let _ = self.grid.try_claim(passage, Cell::Checking, target);
        extended
    }

    fn show_probe(&self, remaining: i32, probes: usize) {
        if let Some(display) = self.display.filter(|d| d.shows_checks()) {
            self.stats.record_probe(remaining.max(0) as usize, probes);
            display.notify();
        }
    }

    /// Would carving from `origin` in `dir` seal off a neighbouring room?
    ///
    /// The two cells are held as `Checking` during the check and read as
    /// `Path`; other tasks never see them carved.
    fn would_orphan(&self, origin: Pos, dir: &Direction) -> bool {
        let Some((passage, room)) = self.grid.neighbor(origin, dir) else {
            return false;
        };
        if self.grid.try_claim(room, Cell::Wall, Cell::Checking).is_err() {
            return false;
        }
        if self.grid.try_claim(passage, Cell::Wall, Cell::Checking).is_err() {
            let _ = self.grid.try_claim(room, Cell::Checking, Cell::Wall);
            return false;
        }

        let carved = |pos: Pos| {
            if pos == room || pos == passage {
                Cell::Path
            } else {
                self.grid.get(pos)
            }
        };
        let orphan = DIRECTIONS
            .iter()
            .filter_map(|d| room.offset(d.d_row, d.d_col))
            .any(|next| walled_in(self.grid, next, &carved));

        let _ = self.grid.try_claim(room, Cell::Checking, Cell::Wall);
        let _ = self.grid.try_claim(passage, Cell::Checking, Cell::Wall);
        orphan
    }
}

/// A room walled in on all four sides with `Path` beyond every wall.
pub fn is_orphan(grid: &Grid, room: Pos) -> bool {
    walled_in(grid, room, |pos| grid.get(pos))
}

fn walled_in(grid: &Grid, room: Pos, cell: impl Fn(Pos) -> Cell) -> bool {
    grid.is_interior_room(room)
        && DIRECTIONS.iter().all(|d| {
            let wall = room.offset(d.d_row / 2, d.d_col / 2);
            let beyond = room.offset(d.d_row, d.d_col);
            matches!((wall, beyond), (Some(w), Some(b))
                if cell(w) == Cell::Wall && cell(b) == Cell::Path)
        })
}
