use crossterm::style::Color;

/// Colors for grid and report output
#[derive(Debug, Clone)]
pub struct Theme {
    /// Grid border and header color
    pub border: Color,
    /// Clue (given) cell color
    pub given: Color,
    /// Cell filled by a deductive rule
    pub deduced: Color,
    /// Cell filled by search
    pub searched: Color,
    /// Empty cell marker
    pub empty: Color,
    /// Error/conflict color
    pub error: Color,
    /// Success/complete color
    pub success: Color,
    /// Warning color
    pub warning: Color,
    /// Secondary text color
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark terminal theme
    pub fn dark() -> Self {
        Self {
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            given: Color::Rgb { r: 255, g: 255, b: 255 },
            deduced: Color::Rgb { r: 80, g: 180, b: 255 },
            searched: Color::Rgb { r: 255, g: 210, b: 100 },
            empty: Color::DarkGrey,
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            warning: Color::Rgb { r: 255, g: 180, b: 60 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
        }
    }
}
