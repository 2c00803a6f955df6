//! Maze generation and solving engine.
//!
//! Mazes live on a doubled-coordinate grid of atomic cells shared by every
//! carving and solving task. Corridors are carved with a bounded lookahead,
//! mid-wall openings are pushed to corners, and the entrance/exit pair with
//! the longest solution is chosen by solving every candidate pair.

mod carver;
mod config;
mod direction;
mod display;
mod error;
mod generator;
mod grid;
mod lookahead;
mod normalize;
mod openings;
mod rng;
mod solver;
mod stats;
mod tasks;

#[cfg(test)]
mod test_support;

pub use config::{MazeConfig, MAX_DEPTH, MAX_HEIGHT, MAX_WIDTH};
pub use direction::{Direction, Heading, DIRECTIONS};
pub use display::DisplaySignal;
pub use error::{MazeError, Result};
pub use generator::{CarveReport, Maze, MazeGenerator, MazeReport};
pub use grid::{Cell, Grid, Pos};
pub use lookahead::is_orphan;
pub use normalize::is_mid_wall_opening;
pub use openings::{OpeningChoice, Openings};
pub use rng::{entropy_seed, SharedRng};
pub use solver::SolveMetrics;
pub use stats::{EngineStats, GenerationStats};
