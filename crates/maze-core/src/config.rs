use crate::error::{MazeError, Result};
use serde::{Deserialize, Serialize};

/// Largest supported number of room rows.
pub const MAX_HEIGHT: usize = 100;
/// Largest supported number of room columns.
pub const MAX_WIDTH: usize = 300;
/// Largest supported lookahead depth.
pub const MAX_DEPTH: usize = 100;

/// Configuration for maze generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Rooms per column
    pub height: usize,
    /// Rooms per row
    pub width: usize,
    /// Corridor length that must be carvable before a direction is taken
    pub depth: usize,
    /// Extra concurrent tasks allowed while carving or solving (0 = one task)
    pub task_budget: usize,
    /// Shortest acceptable solution, in grid cells
    pub min_path_length: usize,
    /// Seed for the first attempt; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Maximum attempts before giving up
    pub max_attempts: usize,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            height: 10,
            width: 20,
            depth: 0,
            task_budget: 0,
            min_path_length: 0,
            seed: None,
            max_attempts: 100,
        }
    }
}

impl MazeConfig {
    pub fn small() -> Self {
        Self {
            height: 5,
            width: 10,
            ..Self::default()
        }
    }

    pub fn medium() -> Self {
        Self {
            height: 20,
            width: 40,
            depth: 2,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, height: usize, width: usize) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every bound the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_HEIGHT).contains(&self.height) || !(1..=MAX_WIDTH).contains(&self.width) {
            return Err(MazeError::InvalidDimensions {
                height: self.height,
                width: self.width,
                max_height: MAX_HEIGHT,
                max_width: MAX_WIDTH,
            });
        }
        if self.depth > MAX_DEPTH {
            return Err(MazeError::DepthOutOfRange {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }
        if self.max_attempts == 0 {
            return Err(MazeError::NoAttempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for config in [
            MazeConfig::default(),
            MazeConfig::small(),
            MazeConfig::medium(),
        ] {
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let config = MazeConfig::default().with_size(0, 5);
        assert!(matches!(
            config.validate(),
            Err(MazeError::InvalidDimensions { height: 0, width: 5, .. })
        ));

        let config = MazeConfig::default().with_size(5, MAX_WIDTH + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_deep_lookahead() {
        let config = MazeConfig {
            depth: MAX_DEPTH + 1,
            ..MazeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(MazeError::DepthOutOfRange { depth: MAX_DEPTH + 1, max: MAX_DEPTH })
        );
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let config = MazeConfig {
            max_attempts: 0,
            ..MazeConfig::default()
        };
        assert_eq!(config.validate(), Err(MazeError::NoAttempts));
    }
}
