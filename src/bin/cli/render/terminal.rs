use chrono::NaiveDate;

use litlearn_lib::papers::Paper;
use litlearn_lib::review::format_interval_weeks;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color when enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// `dd.mm.yyyy`, or a dash for a missing date
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Truncate to `width` characters with a trailing ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// One-line schedule summary, e.g. "index 3 · every 3w"
pub fn schedule_summary(paper: &Paper) -> String {
    match paper.review_state.as_ref() {
        Some(state) if state.expired => "expired".to_string(),
        Some(state) => format!(
            "index {} \u{00b7} every {}",
            state.fibonacci_index(),
            format_interval_weeks(state.current_interval_weeks)
        ),
        None => "not scheduled".to_string(),
    }
}

/// Render the stored excerpt shown when a card is revealed
pub fn render_excerpt(paper: &Paper, use_color: bool) -> String {
    let mut lines = Vec::new();
    let Some(excerpt) = paper.excerpt.as_ref() else {
        lines.push(paint("No excerpt stored", Color::DIM, use_color));
        return lines.join("\n");
    };

    lines.push(paint("Main claims", Color::BOLD, use_color));
    let claims = excerpt.main_claims.final_value.trim();
    if claims.is_empty() {
        lines.push(paint("  (none stored)", Color::DIM, use_color));
    } else {
        lines.extend(claims.lines().map(|l| format!("  {}", l)));
    }

    if !excerpt.topics.final_value.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{} {}",
            paint("Topics:", Color::BOLD, use_color),
            excerpt.topics.final_value.join(", ")
        ));
    }
    if !excerpt.key_concepts.final_value.is_empty() {
        lines.push(format!(
            "{} {}",
            paint("Concepts:", Color::BOLD, use_color),
            excerpt.key_concepts.final_value.join(", ")
        ));
    }
    let notes = excerpt.critical_notes.final_value.trim();
    if !notes.is_empty() {
        lines.push(format!("{} {}", paint("Critical notes:", Color::BOLD, use_color), notes));
    }

    lines.join("\n")
}
