use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

use crate::models::{FontSize, Theme};

/// Colours for one theme. Terminal colours are used so the reader respects
/// the user's palette.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub(crate) text: Style,
    pub(crate) muted: Style,
    pub(crate) accent: Style,
    pub(crate) header: Style,
    pub(crate) highlight: Style,
    pub(crate) background: Style,
}

impl Palette {
    pub(crate) fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Style::default().fg(Color::White),
                muted: Style::default().fg(Color::DarkGray),
                accent: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                header: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                highlight: Style::default().bg(Color::Rgb(30, 50, 70)),
                background: Style::default().bg(Color::Reset),
            },
            Theme::Light => Self {
                text: Style::default().fg(Color::Black),
                muted: Style::default().fg(Color::Gray),
                accent: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                header: Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
                highlight: Style::default().bg(Color::Rgb(220, 235, 250)),
                background: Style::default().bg(Color::White),
            },
        }
    }
}

/// Blank lines between verse blocks for a font size rank.
pub(crate) fn block_spacing(size: FontSize) -> usize {
    usize::from(size.rank().saturating_sub(1)) / 2
}

/// Terminals cannot scale glyphs; large ranks render the source text bold.
pub(crate) fn arabic_style(size: FontSize, palette: &Palette) -> Style {
    if size.rank() >= 4 {
        palette.text.add_modifier(Modifier::BOLD)
    } else {
        palette.text
    }
}

/// Greedy word wrap on character counts. Words longer than `width` are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("anything", 0).is_empty());
        assert!(wrap_text("   ", 5).is_empty());
    }

    #[test]
    fn spacing_grows_with_font_rank() {
        assert_eq!(block_spacing(FontSize::new(1)), 0);
        assert_eq!(block_spacing(FontSize::new(3)), 1);
        assert_eq!(block_spacing(FontSize::new(5)), 2);
    }

    #[test]
    fn surfaces_root_cause() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("failed to save setting")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk full");
    }
}
