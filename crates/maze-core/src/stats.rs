use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters updated concurrently by every task of a generation run.
#[derive(Debug, Default)]
pub struct EngineStats {
    seed: AtomicU64,
    mazes_created: AtomicUsize,
    corridors: AtomicUsize,
    carved_length: AtomicUsize,
    tasks_spawned: AtomicUsize,
    max_checks: AtomicUsize,
    checks_exceeded: AtomicUsize,
    wall_pushes: AtomicUsize,
    solves: AtomicUsize,
    solve_length: AtomicUsize,
    sum_solve_length: AtomicUsize,
    turn_count: AtomicUsize,
    display_depth: AtomicUsize,
    display_checks: AtomicUsize,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the per-maze counters at the start of a new attempt.
    pub(crate) fn begin_maze(&self, seed: u64) {
        self.seed.store(seed, Ordering::Relaxed);
        self.mazes_created.fetch_add(1, Ordering::Relaxed);
        for counter in [
            &self.corridors,
            &self.carved_length,
            &self.tasks_spawned,
            &self.max_checks,
            &self.checks_exceeded,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_corridor(&self) {
        self.corridors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_carved_step(&self) {
        self.carved_length.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_task_spawned(&self) {
        self.tasks_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_checks(&self, checks: usize) {
        self.max_checks.fetch_max(checks, Ordering::Relaxed);
    }

    pub(crate) fn record_checks_exceeded(&self) {
        self.checks_exceeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_wall_push(&self) {
        self.wall_pushes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_solve(&self) {
        self.solves.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_best_solution(&self, length: usize, turns: usize) {
        self.solve_length.store(length, Ordering::Relaxed);
        self.turn_count.store(turns, Ordering::Relaxed);
    }

    pub(crate) fn finish_maze(&self) {
        let length = self.solve_length.load(Ordering::Relaxed);
        self.sum_solve_length.fetch_add(length, Ordering::Relaxed);
    }

    pub(crate) fn record_probe(&self, depth: usize, checks: usize) {
        self.display_depth.store(depth, Ordering::Relaxed);
        if checks != 0 {
            self.display_checks.store(checks, Ordering::Relaxed);
        }
    }

    pub fn max_checks(&self) -> usize {
        self.max_checks.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> GenerationStats {
        GenerationStats {
            seed: self.seed.load(Ordering::Relaxed),
            mazes_created: self.mazes_created.load(Ordering::Relaxed),
            corridors: self.corridors.load(Ordering::Relaxed),
            carved_length: self.carved_length.load(Ordering::Relaxed),
            tasks_spawned: self.tasks_spawned.load(Ordering::Relaxed),
            max_checks: self.max_checks.load(Ordering::Relaxed),
            checks_exceeded: self.checks_exceeded.load(Ordering::Relaxed),
            wall_pushes: self.wall_pushes.load(Ordering::Relaxed),
            solves: self.solves.load(Ordering::Relaxed),
            solve_length: self.solve_length.load(Ordering::Relaxed),
            sum_solve_length: self.sum_solve_length.load(Ordering::Relaxed),
            turn_count: self.turn_count.load(Ordering::Relaxed),
            display_depth: self.display_depth.load(Ordering::Relaxed),
            display_checks: self.display_checks.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Seed of the current (or accepted) maze
    pub seed: u64,
    /// Mazes generated so far, including rejected attempts
    pub mazes_created: usize,
    /// Corridors carved in the current maze
    pub corridors: usize,
    /// Room-to-room steps carved in the current maze
    pub carved_length: usize,
    /// Extra carving tasks spawned for the current maze
    pub tasks_spawned: usize,
    /// Largest number of probes a single direction query needed
    pub max_checks: usize,
    /// Lookahead searches abandoned because the probe budget ran out
    pub checks_exceeded: usize,
    /// Mid-wall openings relocated by the normalizer
    pub wall_pushes: usize,
    /// Solver runs performed by the opening optimizer
    pub solves: usize,
    /// Best solution length of the current maze
    pub solve_length: usize,
    /// Sum of best solution lengths over all mazes
    pub sum_solve_length: usize,
    /// Turns along the best solution of the current maze
    pub turn_count: usize,
    /// Requested depth of the most recent lookahead
    pub display_depth: usize,
    /// Probes used by the most recent lookahead
    pub display_checks: usize,
}

impl GenerationStats {
    pub fn avg_corridor_length(&self) -> usize {
        self.carved_length / self.corridors.max(1)
    }

    pub fn avg_solve_length(&self) -> usize {
        self.sum_solve_length / self.mazes_created.max(1)
    }
}
