use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Blocked (non-puzzle) cell fill
    pub blocked: Color,
    /// Cursor cell background
    pub cursor_bg: Color,
    /// Background of the run being annotated
    pub run_bg: Color,
    /// Solved digit color
    pub value: Color,
    /// Annotated sum color
    pub sum: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// Error message color
    pub error: Color,
    /// Success message color
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            blocked: Color::Rgb { r: 60, g: 64, b: 78 },
            cursor_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            run_bg: Color::Rgb { r: 50, g: 70, b: 60 },
            value: Color::Rgb { r: 80, g: 180, b: 255 },
            sum: Color::Rgb { r: 255, g: 210, b: 100 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            blocked: Color::Rgb { r: 205, g: 208, b: 218 },
            cursor_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            run_bg: Color::Rgb { r: 200, g: 230, b: 210 },
            value: Color::Rgb { r: 30, g: 100, b: 200 },
            sum: Color::Rgb { r: 170, g: 110, b: 20 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            blocked: Color::DarkGrey,
            cursor_bg: Color::Blue,
            run_bg: Color::DarkGreen,
            value: Color::Cyan,
            sum: Color::Yellow,
            info: Color::Grey,
            key: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
        }
    }

    /// Look a theme up by its config/CLI name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "high-contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// Name of the theme following `name` in the cycle order
    pub fn next_name(name: &str) -> &'static str {
        match name {
            "dark" => "light",
            "light" => "high-contrast",
            _ => "dark",
        }
    }
}
