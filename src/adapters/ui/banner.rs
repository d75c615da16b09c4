//! Gradient ASCII banner (TECH PULSE).

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Teal (#00d4aa).
pub(crate) const TEAL: (u8, u8, u8) = (0x00, 0xd4, 0xaa);
/// Violet (#9b5de5).
pub(crate) const VIOLET: (u8, u8, u8) = (0x9b, 0x5d, 0xe5);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

pub(crate) fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Banner art lines; a plain title if the figlet font cannot be loaded.
fn banner_lines() -> Vec<String> {
    let Ok(font) = FIGfont::standard() else {
        return vec!["TECH PULSE".to_string()];
    };
    match font.convert("TECH PULSE") {
        Some(figure) => figure.to_string().lines().map(String::from).collect(),
        None => vec!["TECH PULSE".to_string()],
    }
}

/// Prints "TECH PULSE" with a teal-to-violet gradient, then the tagline and version.
pub fn print_welcome() {
    let mut out = stdout();
    let lines = banner_lines();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let _ = out.execute(SetForegroundColor(rgb(lerp_rgb(TEAL, VIOLET, t))));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(rgb(TEAL)));
    let _ = out.execute(Print(format!(
        "Your real-time feed of the hottest tech news, powered by AI summaries  v{}\r\n\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb(TEAL, VIOLET, 0.0), TEAL);
        assert_eq!(lerp_rgb(TEAL, VIOLET, 1.0), VIOLET);
    }

    #[test]
    fn test_banner_has_lines() {
        assert!(!banner_lines().is_empty());
    }
}
