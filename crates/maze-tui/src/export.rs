//! Portable ASCII form of a finished maze.
//!
//! The first line is `"<height> <width>"` in rooms, followed by one line per
//! grid row inside the border ring: `' '` path, `'*'` solved, `'.'` tried,
//! `'#'` checking, `'-'`/`'|'` wall segments and `'+'`/`'-'`/`'|'` at posts
//! depending on which arms of the post meet a path.

use anyhow::{Context, Result};
use maze_core::{Cell, Grid, Pos};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const POSTS: [char; 16] = [
    ' ', '|', '-', '+', '|', '|', '+', '+', '-', '+', '-', '+', '+', '+', '+', '+',
];

/// Glyph for one interior cell.
fn glyph(grid: &Grid, row: usize, col: usize) -> char {
    let at = |r: usize, c: usize| grid.get(Pos::new(r, c));
    let wall = |r: usize, c: usize| at(r, c) == Cell::Wall;
    match at(row, col) {
        Cell::Wall if row % 2 == 1 && col % 2 == 1 => {
            let (i, j) = (row, col);
            let up = wall(i - 1, j) && (!wall(i - 1, j - 1) || !wall(i - 1, j + 1));
            let right = wall(i, j + 1) && (!wall(i - 1, j + 1) || !wall(i + 1, j + 1));
            let down = wall(i + 1, j) && (!wall(i + 1, j - 1) || !wall(i + 1, j + 1));
            let left = wall(i, j - 1) && (!wall(i - 1, j - 1) || !wall(i + 1, j - 1));
            POSTS[usize::from(up) | usize::from(right) << 1 | usize::from(down) << 2 | usize::from(left) << 3]
        }
        Cell::Wall if row % 2 == 1 => '-',
        Cell::Wall => '|',
        Cell::Path => ' ',
        Cell::Tried => '.',
        Cell::Solved => '*',
        Cell::Checking => '#',
    }
}

/// Write `grid` in the ASCII format.
pub fn write_ascii<W: Write>(grid: &Grid, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{} {}", grid.height(), grid.width())?;
    for row in 1..grid.rows() - 1 {
        let line: String = (1..grid.cols() - 1).map(|col| glyph(grid, row, col)).collect();
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Save `grid` to `path`, replacing any existing file.
pub fn save(grid: &Grid, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_ascii(grid, &mut out).with_context(|| format!("writing {}", path.display()))
}

/// Read the `"<height> <width>"` header line back.
#[cfg(test)]
pub fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let height = parts.next()?.parse().ok()?;
    let width = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((height, width))
}
