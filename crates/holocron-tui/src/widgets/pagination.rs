//! Page navigation bar under the character cards.

use holocron_api::search::{total_pages, PAGE_SIZE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_PRIMARY, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    /// Total number of entries across all pages.
    pub total: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(current: u32, total: u32) -> Self {
        Self {
            current,
            total,
            page_size: PAGE_SIZE,
        }
    }

    pub fn pages(&self) -> u32 {
        total_pages(self.total)
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.pages()
    }

    /// Target page for a step of `delta`, or `None` if it would leave the range.
    pub fn step(&self, delta: i64) -> Option<u32> {
        let target = i64::from(self.current) + delta;
        (target >= 1 && target <= i64::from(self.pages())).then_some(target as u32)
    }

    pub fn line(&self) -> Line<'static> {
        let arrow = |enabled: bool, s: &'static str| {
            Span::styled(
                s,
                Style::default().fg(if enabled { C_PRIMARY } else { C_MUTED }),
            )
        };
        Line::from(vec![
            arrow(self.has_prev(), "‹ "),
            Span::styled(
                format!("page {} / {}", self.current, self.pages()),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            arrow(self.has_next(), " ›"),
            Span::styled(
                format!("   {} characters", self.total),
                Style::default().fg(C_SECONDARY),
            ),
        ])
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line()).alignment(Alignment::Center), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_stay_in_range() {
        let p = Pagination::new(1, 82);
        assert_eq!(p.pages(), 9);
        assert_eq!(p.step(-1), None);
        assert_eq!(p.step(1), Some(2));

        let last = Pagination::new(9, 82);
        assert!(!last.has_next());
        assert_eq!(last.step(1), None);
        assert_eq!(last.step(-1), Some(8));
    }

    #[test]
    fn line_shows_position() {
        let text: String = Pagination::new(2, 12)
            .line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("page 2 / 2"));
        assert!(text.contains("12 characters"));
    }
}
