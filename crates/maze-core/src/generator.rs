use crate::carver::Carver;
use crate::config::{MazeConfig, MAX_DEPTH};
use crate::display::DisplaySignal;
use crate::error::{MazeError, Result};
use crate::grid::{Grid, Pos};
use crate::normalize;
use crate::openings::{self, OpeningChoice, Openings};
use crate::rng::{entropy_seed, SharedRng};
use crate::solver::SolveMetrics;
use crate::stats::{EngineStats, GenerationStats};
use crate::tasks::TaskGroup;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::{debug, info, warn};

/// Summary of one carving run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarveReport {
    pub corridors: usize,
    pub total_length: usize,
    pub tasks_spawned: usize,
    pub max_checks: usize,
    pub checks_exceeded: usize,
}

/// A grid together with everything the engine shares across tasks while
/// working on it: the random source, the statistics and the display signal.
///
/// Each phase can be driven on its own; [`MazeGenerator`] chains them.
pub struct Maze {
    grid: Grid,
    rng: SharedRng,
    stats: EngineStats,
    display: DisplaySignal,
    openings: Mutex<Option<Openings>>,
}

impl Maze {
    /// An all-wall maze of `height` x `width` rooms.
    pub fn new(height: usize, width: usize, seed: u64) -> Result<Self> {
        MazeConfig::default().with_size(height, width).validate()?;
        Ok(Self {
            grid: Grid::new(height, width),
            rng: SharedRng::with_seed(seed),
            stats: EngineStats::new(),
            display: DisplaySignal::silent(),
            openings: Mutex::new(None),
        })
    }

    /// Request redraws on `display` while carving and normalizing.
    pub fn with_display(mut self, display: DisplaySignal) -> Self {
        self.display = display;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Currently committed openings, if any.
    pub fn openings(&self) -> Option<Openings> {
        *self.openings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wall everything in again and restart the random sequence at `seed`.
    pub fn reset(&self, seed: u64) {
        self.grid.reset();
        self.rng.reseed(seed);
        self.stats.begin_maze(seed);
        *self.openings.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Carve the grid into a spanning tree, starting from a random room.
    /// Every extra task is finished when this returns.
    pub fn carve(&self, depth: usize, task_budget: usize) -> Result<CarveReport> {
        if depth > MAX_DEPTH {
            return Err(MazeError::DepthOutOfRange {
                depth,
                max: MAX_DEPTH,
            });
        }
        let start = Pos::room(
            self.rng.below(self.grid.height()),
            self.rng.below(self.grid.width()),
        );
        let group = TaskGroup::new(task_budget);
        let carver = Carver::new(&self.grid, &self.rng, &self.stats, &self.display, &group, depth);
        thread::scope(|s| carver.carve_all(s, start));
        self.display.flush();

        let snapshot = self.stats.snapshot();
        let report = CarveReport {
            corridors: snapshot.corridors,
            total_length: snapshot.carved_length,
            tasks_spawned: snapshot.tasks_spawned,
            max_checks: snapshot.max_checks,
            checks_exceeded: snapshot.checks_exceeded,
        };
        debug!(
            corridors = report.corridors,
            length = report.total_length,
            tasks = report.tasks_spawned,
            max_checks = report.max_checks,
            checks_exceeded = report.checks_exceeded,
            "maze carved"
        );
        Ok(report)
    }

    /// Move every mid-wall opening to a corner. Returns how many moved.
    pub fn normalize_openings(&self) -> usize {
        let moved = normalize::push_mid_wall_openings(&self.grid, &self.stats, &self.display);
        debug!(moved, "mid-wall openings pushed");
        moved
    }

    /// Try every candidate entrance/exit pair and commit the one with the
    /// longest solution.
    pub fn optimize_openings(&self) -> Option<OpeningChoice> {
        self.clear_openings();
        let choice = openings::optimize(&self.grid, &self.rng, &self.stats)?;
        *self.openings.lock().unwrap_or_else(PoisonError::into_inner) = Some(choice.openings);
        Some(choice)
    }

    /// Replace the committed openings with `openings`. Columns outside the
    /// maze are rejected and leave the grid untouched.
    pub fn set_openings(&self, openings: Openings) -> Result<()> {
        openings.validate(self.grid.width())?;
        self.clear_openings();
        openings.create(&self.grid);
        *self.openings.lock().unwrap_or_else(PoisonError::into_inner) = Some(openings);
        Ok(())
    }

    fn clear_openings(&self) {
        self.grid.clear_solution();
        let previous = self.openings.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(previous) = previous {
            previous.remove(&self.grid);
        }
    }

    /// Trace the solution between the committed openings without drawing.
    pub fn solve(&self, task_budget: usize) -> Option<SolveMetrics> {
        self.solve_with(task_budget, &DisplaySignal::silent())
    }

    /// Trace the solution between the committed openings, requesting redraws
    /// on `display`. Any earlier solution is cleared first.
    pub fn solve_with(&self, task_budget: usize, display: &DisplaySignal) -> Option<SolveMetrics> {
        let openings = self.openings()?;
        self.grid.clear_solution();
        let group = TaskGroup::new(task_budget);
        let solver = openings.solver(&self.grid, &self.rng, &self.stats, display, &group);
        let metrics = thread::scope(|s| solver.solve(s));
        display.flush();
        metrics
    }
}

/// Outcome of an accepted generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeReport {
    /// Attempts used, the accepted one included
    pub attempts: usize,
    pub seed: u64,
    pub carve: CarveReport,
    pub wall_pushes: usize,
    pub openings: Openings,
    pub solution: SolveMetrics,
    pub stats: GenerationStats,
}

/// Carves, normalizes, optimizes and solves mazes until one meets the
/// configured minimum solution length.
pub struct MazeGenerator {
    config: MazeConfig,
    maze: Maze,
    solve_display: DisplaySignal,
}

impl MazeGenerator {
    pub fn new(config: MazeConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let maze = Maze::new(config.height, config.width, seed)?;
        Ok(Self {
            config,
            maze,
            solve_display: DisplaySignal::silent(),
        })
    }

    /// Redraw signal used while carving and normalizing.
    pub fn with_display(mut self, display: DisplaySignal) -> Self {
        self.maze = self.maze.with_display(display);
        self
    }

    /// Redraw signal used while tracing the final solution.
    pub fn with_solve_display(mut self, display: DisplaySignal) -> Self {
        self.solve_display = display;
        self
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Run attempts until one is accepted. The first attempt uses the
    /// configured seed, later ones fresh entropy. The accepted maze is left
    /// in [`Self::maze`] with its openings committed and its solution marked.
    pub fn generate(&self) -> Result<MazeReport> {
        let config = &self.config;
        let mut best_path_length = 0;

        for attempt in 1..=config.max_attempts {
            let seed = match config.seed {
                Some(seed) if attempt == 1 => seed,
                _ => entropy_seed(),
            };
            debug!(attempt, seed, "generating maze");
            self.maze.reset(seed);

            let carve = self.maze.carve(config.depth, config.task_budget)?;
            let wall_pushes = self.maze.normalize_openings();
            let Some(choice) = self.maze.optimize_openings() else {
                warn!(attempt, "no solvable opening pair");
                continue;
            };
            self.maze.display.milestone();
            best_path_length = best_path_length.max(choice.metrics.path_length);
            if choice.metrics.path_length < config.min_path_length {
                warn!(
                    attempt,
                    path_length = choice.metrics.path_length,
                    min_path_length = config.min_path_length,
                    "solution too short, regenerating"
                );
                continue;
            }

            let solution = self
                .maze
                .solve_with(config.task_budget, &self.solve_display)
                .unwrap_or(choice.metrics);
            self.solve_display.milestone();
            info!(
                attempt,
                seed,
                path_length = solution.path_length,
                turns = solution.turn_count,
                "maze accepted"
            );
            return Ok(MazeReport {
                attempts: attempt,
                seed,
                carve,
                wall_pushes,
                openings: choice.openings,
                solution,
                stats: self.maze.stats().snapshot(),
            });
        }

        Err(MazeError::ConstraintUnsatisfiable {
            attempts: config.max_attempts,
            min_path_length: config.min_path_length,
            best_path_length,
        })
    }
}
