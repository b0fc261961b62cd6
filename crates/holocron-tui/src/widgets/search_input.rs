//! SearchInput — wraps tui-input for the name search bar.
//!
//! The typed text is not the committed search term: it only reaches
//! `SearchState` when submitted and validated.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_MUTED, C_SEARCH_BG, C_SEARCH_FG};

#[derive(Debug, PartialEq, Eq)]
pub enum SearchInputAction {
    Edited,
    /// Enter pressed; carries the raw text.
    Submitted(String),
    Cancelled,
}

pub struct SearchInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl SearchInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Esc clears non-empty text first; a second Esc closes the bar.
    pub fn handle_key(&mut self, key: KeyEvent) -> SearchInputAction {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.clear();
                    SearchInputAction::Edited
                } else {
                    self.deactivate();
                    SearchInputAction::Cancelled
                }
            }
            KeyCode::Enter => SearchInputAction::Submitted(self.input.value().to_string()),
            _ => {
                self.input.handle_event(&Event::Key(key));
                SearchInputAction::Edited
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(4) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(
                format!("/ {}", self.placeholder),
                Style::default().fg(C_MUTED),
            )
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("/ {visible}"), Style::default().fg(C_SEARCH_FG))
        };

        frame.render_widget(
            Paragraph::new(Line::from(display)).style(Style::default().bg(C_SEARCH_BG)),
            area,
        );

        if self.active {
            let cursor_x = area.x + 2 + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
        }
    }
}
