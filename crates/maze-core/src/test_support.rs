//! Grid builders and structural checks shared by the unit tests.

use crate::direction::DIRECTIONS;
use crate::grid::{Cell, Grid, Pos};
use crate::normalize::is_mid_wall_opening;
use std::collections::{HashMap, VecDeque};

/// Carve the passage between two adjacent rooms, and the rooms themselves.
pub fn open(grid: &Grid, a: Pos, b: Pos) {
    let passage = Pos::new((a.row + b.row) / 2, (a.col + b.col) / 2);
    for pos in [a, passage, b] {
        grid.restore(pos, Cell::Path);
    }
}

/// Rooms reachable from `room` through non-wall passages.
fn room_edges(grid: &Grid, room: Pos) -> impl Iterator<Item = Pos> + '_ {
    DIRECTIONS.iter().filter_map(move |d| {
        let (passage, next) = grid.neighbor(room, d)?;
        (grid.get(passage) != Cell::Wall).then_some(next)
    })
}

/// Breadth-first distances in rooms from `start` over open passages.
pub fn room_distances(grid: &Grid, start: Pos) -> HashMap<Pos, usize> {
    let mut dist = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    while let Some(room) = queue.pop_front() {
        let d = dist[&room];
        for next in room_edges(grid, room) {
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

/// Every room carved, every room reachable, and exactly `rooms - 1` open
/// interior passages, so there are no cycles.
pub fn is_spanning_tree(grid: &Grid) -> bool {
    let rooms = grid.height() * grid.width();
    let all_carved = grid.rooms().all(|room| grid.get(room) != Cell::Wall);
    let reachable = room_distances(grid, Pos::room(0, 0)).len();
    let mut passages = 0;
    for room in grid.rooms() {
        passages += room_edges(grid, room).count();
    }
    all_carved && reachable == rooms && passages / 2 == rooms - 1
}

/// Interior passages that still open in the middle of a wall.
pub fn mid_wall_openings(grid: &Grid) -> usize {
    (1..grid.rows() - 1)
        .flat_map(|row| (1..grid.cols() - 1).map(move |col| Pos::new(row, col)))
        .filter(|pos| pos.is_passage() && is_mid_wall_opening(grid, *pos))
        .count()
}
