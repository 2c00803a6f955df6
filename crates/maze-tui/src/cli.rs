use clap::{ArgAction, Parser};
use maze_core::{MazeConfig, MAX_DEPTH, MAX_HEIGHT, MAX_WIDTH};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Highest accepted refresh rate.
pub const MAX_FPS: u32 = 100_000;

/// Concurrent maze generator and solver.
///
/// Carves a maze that fills the terminal, moves every opening to a corner,
/// picks the entrance/exit pair with the longest solution and draws it.
#[derive(Parser, Debug)]
#[command(name = "maze", version, about, disable_help_flag = true)]
pub struct Args {
    /// Maze height in rooms (default: terminal height)
    #[arg(short = 'h', long)]
    pub height: Option<usize>,

    /// Maze width in rooms (default: terminal width)
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Corridor length that must fit before a direction is carved
    #[arg(short, long, default_value_t = 0)]
    pub depth: usize,

    /// Extra carving and solving threads
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Minimum solution length in cells; shorter mazes are regenerated
    #[arg(short = 'p', long = "path", default_value_t = 0)]
    pub min_path: usize,

    /// Random seed for the first maze (default: from the OS)
    #[arg(short = 'r', long = "random")]
    pub seed: Option<u64>,

    /// Give up after this many mazes
    #[arg(long, default_value_t = 100)]
    pub attempts: usize,

    /// Frames per second while carving (0: draw only the result)
    #[arg(short, long, default_value_t = 0)]
    pub fps: u32,

    /// Pause on every generated maze and its solution
    #[arg(short, long)]
    pub show: bool,

    /// Animate the final solve as well
    #[arg(short, long)]
    pub view: bool,

    /// Draw lookahead probes while carving
    #[arg(short, long)]
    pub look: bool,

    /// Draw only walls that border a path
    #[arg(short, long)]
    pub blank: bool,

    /// Write the finished maze as ASCII to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write run statistics as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

/// Largest maze that fits the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_height: usize,
    pub max_width: usize,
}

impl Limits {
    /// Limits for a terminal of `(columns, rows)`, or 80x24 if unknown.
    pub fn for_terminal(size: Option<(u16, u16)>) -> Self {
        let (cols, rows) = size.unwrap_or((80, 24));
        Self {
            max_height: (usize::from(rows).saturating_sub(3) / 2).clamp(1, MAX_HEIGHT),
            max_width: (usize::from(cols).saturating_sub(1) / 4).clamp(1, MAX_WIDTH),
        }
    }
}

/// Everything the front-end needs for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: MazeConfig,
    pub frame_delay: Duration,
    pub show: bool,
    pub view: bool,
    pub look: bool,
    pub blank: bool,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl Args {
    /// Clamp every value into range and build the run settings.
    pub fn into_settings(self, limits: Limits) -> Settings {
        let height = fit_dimension("height", self.height, limits.max_height);
        let width = fit_dimension("width", self.width, limits.max_width);

        let depth = if self.depth > MAX_DEPTH {
            warn!(depth = self.depth, max = MAX_DEPTH, "depth clamped");
            MAX_DEPTH
        } else {
            self.depth
        };

        let fps = if self.fps > MAX_FPS {
            warn!(fps = self.fps, max = MAX_FPS, "fps clamped");
            MAX_FPS
        } else {
            self.fps
        };

        // A third of the rooms on the route is about the best a maze manages
        let longest = 2 * (height * width / 3) + 1;
        let min_path_length = if self.min_path > longest {
            warn!(min_path = self.min_path, max = longest, "minimum path length clamped");
            longest
        } else {
            self.min_path
        };

        let attempts = if self.attempts == 0 {
            warn!("attempts raised to 1");
            1
        } else {
            self.attempts
        };

        Settings {
            config: MazeConfig {
                height,
                width,
                depth,
                task_budget: self.threads,
                min_path_length,
                seed: self.seed,
                max_attempts: attempts,
            },
            frame_delay: frame_delay(fps),
            show: self.show,
            view: self.view,
            look: self.look,
            blank: self.blank,
            output: self.output,
            report: self.report,
        }
    }
}

fn fit_dimension(name: &str, requested: Option<usize>, max: usize) -> usize {
    match requested {
        None => max,
        Some(value) if (1..=max).contains(&value) => value,
        Some(value) => {
            warn!(dimension = name, value, max, "dimension clamped to terminal");
            max
        }
    }
}

fn frame_delay(fps: u32) -> Duration {
    if fps == 0 {
        Duration::ZERO
    } else {
        Duration::from_micros(1_000_000 / u64::from(fps))
    }
}
