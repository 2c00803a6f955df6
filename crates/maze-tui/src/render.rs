use crate::theme::Theme;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use maze_core::{Cell, Grid, Pos};
use std::io::{self, Write};

/// Line-drawing glyph for each combination of up=1, right=2, down=4, left=8.
const GLYPHS: [char; 16] = [
    ' ', '│', '─', '└', '│', '│', '┌', '├', '─', '┘', '─', '┴', '┐', '┤', '┬', '┼',
];
const HORIZONTAL: char = '─';
const BLANK: char = ' ';

/// How a run of glyphs is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Plain,
    Wall,
    Solved,
    Checking,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Draw only walls that border a path
    pub blank: bool,
    /// Draw cells held by lookahead probes
    pub show_checks: bool,
}

/// One screen row as runs of equally styled text.
pub type Row = Vec<(Ink, String)>;

fn glyph(up: bool, right: bool, down: bool, left: bool) -> char {
    GLYPHS[usize::from(up) | usize::from(right) << 1 | usize::from(down) << 2 | usize::from(left) << 3]
}

fn push(row: &mut Row, ink: Ink, text: &str) {
    match row.last_mut() {
        Some((last, run)) if *last == ink => run.push_str(text),
        _ => row.push((ink, text.to_string())),
    }
}

/// Lay out the inside of the border ring. Even columns are drawn three
/// glyphs wide so rooms come out roughly square.
pub fn frame_rows(grid: &Grid, options: RenderOptions) -> Vec<Row> {
    let at = |row: usize, col: usize| grid.get(Pos::new(row, col));
    let is_wall = |cell: Cell| cell == Cell::Wall || (!options.show_checks && cell == Cell::Checking);

    let mut rows = Vec::with_capacity(grid.rows() - 2);
    for i in 1..grid.rows() - 1 {
        let mut row = Row::new();
        for j in 1..grid.cols() - 1 {
            let here = at(i, j);
            let (up, right, down, left) = (at(i - 1, j), at(i, j + 1), at(i + 1, j), at(i, j - 1));

            let vertex = if i % 2 == 1 && j % 2 == 1 {
                // Posts: only draw a wall arm that has a path along one side
                glyph(
                    is_wall(up) && (!is_wall(at(i - 1, j - 1)) || !is_wall(at(i - 1, j + 1))),
                    is_wall(right) && (!is_wall(at(i - 1, j + 1)) || !is_wall(at(i + 1, j + 1))),
                    is_wall(down) && (!is_wall(at(i + 1, j - 1)) || !is_wall(at(i + 1, j + 1))),
                    is_wall(left) && (!is_wall(at(i - 1, j - 1)) || !is_wall(at(i + 1, j - 1))),
                )
            } else {
                glyph(
                    is_wall(up) && (!is_wall(left) || !is_wall(right)),
                    is_wall(right) && (!is_wall(up) || !is_wall(down)),
                    is_wall(down) && (!is_wall(left) || !is_wall(right)),
                    is_wall(left) && (!is_wall(up) || !is_wall(down)),
                )
            };
            let connected = glyph(up == here, right == here, down == here, left == here);

            let trail = |cell: Cell| cell == Cell::Solved || cell == Cell::Checking;
            let left_char = if i % 2 == 0 && trail(left) { HORIZONTAL } else { BLANK };
            let right_char = if i % 2 == 0 && trail(right) { HORIZONTAL } else { BLANK };
            let wall_char = if options.blank { vertex } else { connected };

            let wide = j % 2 == 0;
            let mut cell = |ink: Ink, first: char, middle: char, last: char| {
                let mut text = String::from(first);
                if wide {
                    text.push(middle);
                    text.push(last);
                }
                push(&mut row, ink, &text);
            };
            match here {
                Cell::Solved => cell(Ink::Solved, left_char, connected, right_char),
                Cell::Checking if options.show_checks => {
                    cell(Ink::Checking, left_char, connected, right_char)
                }
                Cell::Wall if i % 2 == 1 || j % 2 == 1 => cell(Ink::Wall, wall_char, wall_char, wall_char),
                _ => cell(Ink::Plain, BLANK, BLANK, BLANK),
            }
        }
        rows.push(row);
    }
    rows
}

/// Draw the grid from the top-left corner followed by `status`.
pub fn render<W: Write>(
    out: &mut W,
    grid: &Grid,
    options: RenderOptions,
    theme: &Theme,
    status: &str,
) -> io::Result<()> {
    let rows = frame_rows(grid, options);
    for (y, row) in rows.iter().enumerate() {
        queue!(out, MoveTo(0, y as u16))?;
        for (ink, text) in row {
            match ink {
                Ink::Plain => queue!(out, ResetColor)?,
                Ink::Wall => queue!(out, SetForegroundColor(theme.wall))?,
                Ink::Solved => queue!(out, SetForegroundColor(theme.solved), SetAttribute(Attribute::Bold))?,
                Ink::Checking => {
                    queue!(out, SetForegroundColor(theme.checking), SetAttribute(Attribute::Bold))?
                }
            }
            queue!(out, Print(text), SetAttribute(Attribute::Reset))?;
        }
    }
    queue!(
        out,
        MoveTo(0, rows.len() as u16),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(theme.status),
        Print(status),
        SetForegroundColor(Color::Reset),
    )?;
    out.flush()
}
