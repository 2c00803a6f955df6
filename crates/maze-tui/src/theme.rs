use crossterm::style::Color;

/// Colors used when drawing a maze
#[derive(Debug, Clone)]
pub struct Theme {
    /// Walls and wall lattice
    pub wall: Color,
    /// Cells on the traced solution
    pub solved: Color,
    /// Cells held by a lookahead probe
    pub checking: Color,
    /// Statistics line under the maze
    pub status: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark terminal background (default)
    pub fn dark() -> Self {
        Self {
            wall: Color::Rgb { r: 200, g: 205, b: 220 },
            solved: Color::Rgb { r: 90, g: 255, b: 130 },
            checking: Color::Rgb { r: 255, g: 90, b: 90 },
            status: Color::Rgb { r: 160, g: 165, b: 185 },
        }
    }

    /// Basic ANSI colors for terminals without true color
    pub fn ansi() -> Self {
        Self {
            wall: Color::Reset,
            solved: Color::Green,
            checking: Color::Red,
            status: Color::DarkGrey,
        }
    }

    /// Pick a theme from the `COLORTERM` convention.
    pub fn detect() -> Self {
        match std::env::var("COLORTERM") {
            Ok(value) if value == "truecolor" || value == "24bit" => Self::dark(),
            _ => Self::ansi(),
        }
    }
}
