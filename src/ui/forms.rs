use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::db::LastRead;
use crate::projector::BrowseTarget;

/// State for an active inline search over the navigation list.
#[derive(Debug, Default, Clone)]
pub(crate) struct SearchState {
    pub(crate) query: String,
}

impl SearchState {
    /// Trimmed query, or `None` when there is nothing to filter by.
    pub(crate) fn filter(&self) -> Option<String> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Startup question offered when a last-read pointer exists.
#[derive(Debug, Clone)]
pub(crate) struct ResumePrompt {
    pub(crate) last: LastRead,
    /// Human readable location, e.g. `Juz 3, verse 12`.
    pub(crate) location: String,
}

impl ResumePrompt {
    pub(crate) fn new(last: LastRead, title: &str) -> Self {
        Self {
            location: format!("{}, verse {}", title, last.index + 1),
            last,
        }
    }

    pub(crate) fn target(&self) -> BrowseTarget {
        self.last.target
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        let saved_at = chrono::DateTime::from_timestamp(self.last.updated_at, 0)
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_default();
        vec![
            Line::from("Continue where you left off?"),
            Line::from(""),
            Line::from(Span::styled(
                self.location.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(saved_at),
            Line::from(""),
            Line::from("[Y/Enter] Resume   [N/Esc] Start fresh"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_means_no_filter() {
        let mut state = SearchState::default();
        assert_eq!(state.filter(), None);
        state.query.push_str("  baq ");
        assert_eq!(state.filter().as_deref(), Some("baq"));
    }

    #[test]
    fn resume_prompt_describes_location() {
        let prompt = ResumePrompt::new(
            LastRead {
                target: BrowseTarget::Juz(3),
                index: 11,
                updated_at: 0,
            },
            "Juz 3",
        );
        assert_eq!(prompt.location, "Juz 3, verse 12");
        assert_eq!(prompt.target(), BrowseTarget::Juz(3));
        assert_eq!(prompt.lines().len(), 6);
    }
}
