use ratatui::style::Color;

pub const BAR_BG: Color = Color::Rgb(40, 40, 50);
pub const HEADER_BG: Color = Color::Rgb(0, 95, 135);
pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);
pub const STRIPE_BG: Color = Color::Rgb(25, 25, 35);

/// Higher alarms read hotter
pub fn color_for_alarm(alarm: Option<i64>) -> Color {
    match alarm {
        None | Some(i64::MIN..=0) => Color::Gray,
        Some(1) => Color::Yellow,
        Some(2) => Color::LightRed,
        Some(_) => Color::Red,
    }
}

/// Tint for the incident type column, keyed on common dispatch wording
pub fn color_for_type(kind: &str) -> Color {
    let kind = kind.to_ascii_lowercase();
    if kind.contains("fire") || kind.contains("smoke") || kind.contains("explosion") {
        Color::LightRed
    } else if kind.contains("medical") || kind.contains("ems") || kind.contains("rescue") {
        Color::LightGreen
    } else if kind.contains("hazmat") || kind.contains("gas") || kind.contains("spill") {
        Color::Magenta
    } else if kind.contains("alarm") {
        Color::Yellow
    } else if kind.contains("accident") || kind.contains("mva") || kind.contains("vehicle") {
        Color::Cyan
    } else {
        Color::White
    }
}
