use thiserror::Error;

/// Errors returned by the maze engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Height or width outside the supported range.
    #[error("invalid maze dimensions {height}x{width} (supported: 1..={max_height} x 1..={max_width})")]
    InvalidDimensions {
        height: usize,
        width: usize,
        max_height: usize,
        max_width: usize,
    },

    /// Lookahead depth above the supported maximum.
    #[error("lookahead depth {depth} exceeds maximum of {max}")]
    DepthOutOfRange { depth: usize, max: usize },

    /// An entrance or exit column outside the maze.
    #[error("openings {entrance}/{exit} outside a maze {width} rooms wide")]
    OpeningOutOfRange {
        entrance: usize,
        exit: usize,
        width: usize,
    },

    /// The attempt ceiling is zero, so nothing would ever be generated.
    #[error("max_attempts must be at least 1")]
    NoAttempts,

    /// Every regeneration attempt missed the minimum solution length.
    #[error(
        "no maze with a solution of at least {min_path_length} cells after {attempts} attempts (best: {best_path_length})"
    )]
    ConstraintUnsatisfiable {
        attempts: usize,
        min_path_length: usize,
        best_path_length: usize,
    },
}

pub type Result<T> = std::result::Result<T, MazeError>;
