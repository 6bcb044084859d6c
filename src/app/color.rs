use std::str::FromStr;

use ratatui::style::Color;

/// Background of the whole screen.
pub const BACKGROUND: Color = Color::Rgb(0xf5, 0xfc, 0xff);
/// Background of the add bar.
pub const ADD_BAR: Color = Color::Rgb(0x00, 0x7b, 0xff);

/// Parses a free-form color tag into a terminal color.
///
/// Accepts whatever ratatui understands: `#rrggbb`, names like `red` or
/// `light-blue`, and indexed colors like `42`. Anything else is `None` and the
/// row is drawn without a fill.
pub fn parse(tag: &str) -> Option<Color> {
    Color::from_str(tag.trim()).ok()
}

/// Foreground that stays readable on `bg`.
pub fn contrast(bg: Color) -> Color {
    match bg {
        Color::Rgb(r, g, b) => {
            let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
            if luma >= 128 { Color::Black } else { Color::White }
        }
        Color::Indexed(index) => contrast(indexed(index)),
        Color::Black
        | Color::Red
        | Color::Green
        | Color::Blue
        | Color::Magenta
        | Color::DarkGray
        | Color::LightBlue => Color::White,
        _ => Color::Black,
    }
}

/// Approximates an xterm 256-color index as a named or RGB color.
fn indexed(index: u8) -> Color {
    const BASE: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::Gray,
        Color::DarkGray,
        Color::LightRed,
        Color::LightGreen,
        Color::LightYellow,
        Color::LightBlue,
        Color::LightMagenta,
        Color::LightCyan,
        Color::White,
    ];
    // 6x6x6 cube steps
    let level = |v: u8| if v == 0 { 0 } else { 55 + 40 * v };

    match index {
        0..=15 => BASE[index as usize],
        16..=231 => {
            let n = index - 16;
            Color::Rgb(level(n / 36), level(n / 6 % 6), level(n % 6))
        }
        _ => {
            let grey = 8 + 10 * (index - 232);
            Color::Rgb(grey, grey, grey)
        }
    }
}
