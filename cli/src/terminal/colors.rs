use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const ADDR: Color = Color::BrightWhite;
pub const ONLINE: Color = Color::Green;
pub const OFFLINE: Color = Color::Red;
