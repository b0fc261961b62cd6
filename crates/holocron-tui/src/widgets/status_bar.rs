//! Status bar — bottom line with input mode and the keybindings for the
//! active view.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::router::Route;
use crate::theme::{C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
        }
    }
}

fn key_hints(mode: InputMode, route: &Route, searching: bool) -> &'static str {
    match (mode, route) {
        (InputMode::Search, _) => " type a name  Enter search  Esc clear/close",
        (InputMode::Normal, Route::List) if searching => {
            " ↑↓/jk select  Enter details  / search  b back to list  2 favourites  ? help  q quit"
        }
        (InputMode::Normal, Route::List) => {
            " ↑↓/jk select  Enter details  ←→ page  / search  2 favourites  ? help  q quit"
        }
        (InputMode::Normal, Route::Detail { .. }) => {
            " f add/remove favourite  Esc back  1 list  2 favourites  ? help  q quit"
        }
        (InputMode::Normal, Route::Favourites) => {
            " ↑↓/jk select  Enter details  x remove  b back to list  ? help  q quit"
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, route: &Route, searching: bool) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(key_hints(mode, route, searching), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_hint_hidden_while_searching() {
        assert!(key_hints(InputMode::Normal, &Route::List, false).contains("page"));
        assert!(!key_hints(InputMode::Normal, &Route::List, true).contains("page"));
    }
}
