use serde::{Deserialize, Serialize};

/// Compass heading of a move; only used to count turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

/// A full step between two rooms: two grid cells along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub d_row: isize,
    pub d_col: isize,
    pub heading: Heading,
}

pub const DIRECTIONS: [Direction; 4] = [
    Direction { d_row: 2, d_col: 0, heading: Heading::Down },
    Direction { d_row: -2, d_col: 0, heading: Heading::Up },
    Direction { d_row: 0, d_col: 2, heading: Heading::Right },
    Direction { d_row: 0, d_col: -2, heading: Heading::Left },
];

/// The direction table starting at `offset` and wrapping around.
pub fn rotated(offset: usize) -> impl Iterator<Item = &'static Direction> {
    (0..DIRECTIONS.len()).map(move |i| &DIRECTIONS[(i + offset) % DIRECTIONS.len()])
}

/// Up to four directions accepted by a lookahead query.
#[derive(Debug, Clone, Default)]
pub struct DirectionSet {
    dirs: [Option<Direction>; 4],
    len: usize,
}

impl DirectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dir: Direction) {
        if self.len < self.dirs.len() {
            self.dirs[self.len] = Some(dir);
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<Direction> {
        self.dirs.get(index).copied().flatten()
    }

    pub fn first(&self) -> Option<Direction> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.dirs.iter().take(self.len).filter_map(|d| *d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_covers_every_direction() {
        for offset in 0..4 {
            let headings: Vec<_> = rotated(offset).map(|d| d.heading).collect();
            assert_eq!(headings.len(), 4);
            for dir in DIRECTIONS {
                assert!(headings.contains(&dir.heading));
            }
            assert_eq!(headings[0], DIRECTIONS[offset].heading);
        }
    }

    #[test]
    fn test_direction_set() {
        let mut set = DirectionSet::new();
        assert!(set.is_empty());
        assert_eq!(set.first(), None);

        for dir in DIRECTIONS {
            set.push(dir);
        }
        set.push(DIRECTIONS[0]);

        assert_eq!(set.len(), 4);
        assert_eq!(set.first(), Some(DIRECTIONS[0]));
        assert_eq!(set.iter().count(), 4);
    }
}
