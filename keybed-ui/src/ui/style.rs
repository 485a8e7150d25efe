use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

/// 24-bit terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const DARK_GRAY: Color = Color::new(100, 100, 100);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const SKY_BLUE: Color = Color::new(135, 206, 235);
    pub const GOLD: Color = Color::new(255, 215, 0);
    pub const SELECTION_BG: Color = Color::new(60, 100, 180);

    pub const IVORY: Color = Color::new(235, 230, 215);
    pub const EBONY: Color = Color::new(30, 30, 36);
    pub const KEY_DOWN: Color = Color::new(255, 165, 0);

    pub const METER_LOW: Color = Color::new(80, 220, 100);
    pub const METER_MID: Color = Color::new(255, 220, 50);
    pub const METER_HIGH: Color = Color::new(255, 80, 80);

    /// Face and label colors for a piano key.
    pub const fn key_colors(sharp: bool, held: bool) -> (Color, Color) {
        match (sharp, held) {
            (_, true) => (Color::KEY_DOWN, Color::BLACK),
            (true, false) => (Color::EBONY, Color::WHITE),
            (false, false) => (Color::IVORY, Color::BLACK),
        }
    }

    /// Volume bar color: green, yellow near the top, red at full.
    pub const fn meter(volume: u8) -> Color {
        match volume {
            0..=60 => Color::METER_LOW,
            61..=85 => Color::METER_MID,
            _ => Color::METER_HIGH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self { fg: None, bg: None, bold: false }
    }

    pub const fn fg(self, color: Color) -> Self {
        Self { fg: Some(color), ..self }
    }

    pub const fn bg(self, color: Color) -> Self {
        Self { bg: Some(color), ..self }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

impl From<Color> for RatatuiColor {
    fn from(c: Color) -> Self {
        RatatuiColor::Rgb(c.r, c.g, c.b)
    }
}

impl From<Style> for RatatuiStyle {
    fn from(s: Style) -> Self {
        let base = RatatuiStyle::default();
        let base = match s.fg {
            Some(fg) => base.fg(fg.into()),
            None => base,
        };
        let base = match s.bg {
            Some(bg) => base.bg(bg.into()),
            None => base,
        };
        if s.bold {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_overrides_face() {
        assert_eq!(Color::key_colors(true, true).0, Color::KEY_DOWN);
        assert_eq!(Color::key_colors(false, true).0, Color::KEY_DOWN);
        assert_eq!(Color::key_colors(true, false), (Color::EBONY, Color::WHITE));
    }

    #[test]
    fn style_converts_to_ratatui() {
        let s = RatatuiStyle::from(Style::new().fg(Color::GOLD).bold());
        assert_eq!(s.fg, Some(RatatuiColor::Rgb(255, 215, 0)));
        assert_eq!(s.bg, None);
        assert!(s.add_modifier.contains(Modifier::BOLD));
    }
}
