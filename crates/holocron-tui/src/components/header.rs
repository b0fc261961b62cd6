//! Header component — 1-row top bar.
//!
//! Left: app title and the current view. Right: favourites count and the
//! API base url. Not focusable.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::character_card::truncate,
    theme::{C_ACCENT, C_FAVOURITE, C_MUTED, C_SECONDARY},
};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

fn build_left(state: &AppState, width: usize) -> Line<'static> {
    let label = truncate(&state.route.label(), width.saturating_sub(14));
    Line::from(vec![
        Span::styled(
            " HOLOCRON",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ›  ", Style::default().fg(C_MUTED)),
        Span::styled(label, Style::default().fg(C_SECONDARY)),
    ])
}

fn build_right(state: &AppState) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("♥ {}", state.favourites.len()),
            Style::default().fg(C_FAVOURITE),
        ),
        Span::styled(format!("  {} ", state.base_url), Style::default().fg(C_MUTED)),
    ])
    .right_aligned()
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        frame.render_widget(Clear, area);
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        frame.render_widget(
            Paragraph::new(build_left(state, halves[0].width as usize)),
            halves[0],
        );
        frame.render_widget(Paragraph::new(build_right(state)), halves[1]);
    }
}
