use anyhow::{Context, Result};
use maze_core::{GenerationStats, MazeConfig, MazeReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything known about a finished run, as written by `--report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub config: MazeConfig,
    pub result: MazeReport,
    /// Redraws performed by the display task
    pub frames: usize,
}

impl RunReport {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing run report")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

/// The statistics line drawn under the maze.
pub fn status_line(stats: &GenerationStats, height: usize, width: usize, frames: usize) -> String {
    format!(
        "frames={frames}, height={height}, width={width}, seed={}, wall_pushes={}, mazes={}, solves={}, \
         avg_solve={}, solve={}, turns={}, avg_corridor={}, corridors={}, carved={}, tasks={}, \
         depth={}, checks={}, max_checks={}, checks_exceeded={}",
        stats.seed,
        stats.wall_pushes,
        stats.mazes_created,
        stats.solves,
        stats.avg_solve_length(),
        stats.solve_length,
        stats.turn_count,
        stats.avg_corridor_length(),
        stats.corridors,
        stats.carved_length,
        stats.tasks_spawned,
        stats.display_depth,
        stats.display_checks,
        stats.max_checks,
        stats.checks_exceeded,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_fields() {
        let stats = GenerationStats {
            seed: 42,
            corridors: 4,
            carved_length: 20,
            solve_length: 31,
            ..Default::default()
        };
        let line = status_line(&stats, 5, 6, 3);
        assert!(line.starts_with("frames=3, height=5, width=6, seed=42,"));
        assert!(line.contains("solve=31,"));
        assert!(line.contains("avg_corridor=5,"));
        assert!(line.ends_with("checks_exceeded=0"));
    }
}
