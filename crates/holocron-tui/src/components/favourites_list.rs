//! FavouritesList component — the session's favourite characters as cards.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::character_card::{CardView, CARD_HEIGHT},
    theme::{C_FAVOURITE, C_MUTED},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub const EMPTY_MESSAGE: &str = "No favourite characters";

pub fn cards(state: &AppState) -> Vec<CardView> {
    state
        .favourites
        .list()
        .iter()
        .map(CardView::from_favourite)
        .collect()
}

pub struct FavouritesList {
    list: ScrollableList<CardView>,
}

impl FavouritesList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
        }
    }

    fn open_selected(&self, state: &AppState) -> Vec<Action> {
        match state.favourites.list().get(self.list.selected) {
            Some(fav) => vec![Action::OpenDetail {
                id: fav.id.clone(),
                forwarded: fav.forward(),
            }],
            None => vec![],
        }
    }
}

impl Default for FavouritesList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FavouritesList {
    fn id(&self) -> ComponentId {
        ComponentId::FavouritesList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.list.set_items(cards(state));

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.open_selected(state),
            KeyCode::Char('x') | KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(card) = self.list.selected_item() {
                    return vec![Action::RemoveFavourite(card.id.clone())];
                }
            }
            KeyCode::Esc | KeyCode::Char('b') => return vec![Action::NavigateHome],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        self.list.set_items(cards(state));
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let row = event.row.saturating_sub(area.y + 1) as usize / CARD_HEIGHT;
                if self.list.handle_click(row) {
                    return self.open_selected(state);
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.list.set_items(cards(state));

        let count = state.favourites.len().to_string();
        let badge = (!state.favourites.is_empty()).then(|| Badge {
            text: &count,
            color: C_FAVOURITE,
        });
        let block = pane_chrome("favourites", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("  {EMPTY_MESSAGE}"),
                    Style::default().fg(C_MUTED),
                ))),
                inner,
            );
            return;
        }

        let visible_cards = (inner.height as usize / CARD_HEIGHT).max(1);
        self.list.ensure_visible(visible_cards);
        let items: Vec<_> = self
            .list
            .visible_items(visible_cards)
            .map(|(i, card)| card.item(i == self.list.selected, inner.width))
            .collect();
        frame.render_widget(List::new(items), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holocron_api::FavouriteEntry;
    use ratatui::{backend::TestBackend, crossterm::event::KeyModifiers, Terminal};

    fn fav(id: &str, name: &str, planet: &str) -> FavouriteEntry {
        FavouriteEntry {
            id: id.into(),
            name: name.into(),
            gender: "female".into(),
            height: "150".into(),
            home_planet: planet.into(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn empty_store_shows_no_cards() {
        let state = AppState::new("https://swapi.dev/api/");
        let mut view = FavouritesList::new();
        assert!(cards(&state).is_empty());
        assert_eq!(view.handle_key(key(KeyCode::Enter), &state), vec![]);
        assert_eq!(view.handle_key(key(KeyCode::Char('x')), &state), vec![]);
    }

    fn render(view: &mut FavouritesList, state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| view.draw(frame, frame.area(), true, state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn empty_store_draws_empty_message() {
        let mut state = AppState::new("https://swapi.dev/api/");
        let mut view = FavouritesList::new();
        assert!(render(&mut view, &state).contains(EMPTY_MESSAGE));

        state.favourites.add(fav("5", "Leia Organa", "Alderaan"));
        let screen = render(&mut view, &state);
        assert!(!screen.contains(EMPTY_MESSAGE));
        assert!(screen.contains("Leia Organa"));
    }

    #[test]
    fn remove_targets_selected_card() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.favourites.add(fav("5", "Leia Organa", "Alderaan"));
        state.favourites.add(fav("1", "Luke Skywalker", "Tatooine"));
        let mut view = FavouritesList::new();

        view.handle_key(key(KeyCode::Down), &state);
        assert_eq!(
            view.handle_key(key(KeyCode::Char('x')), &state),
            vec![Action::RemoveFavourite("1".into())]
        );
    }

    #[test]
    fn enter_opens_detail_with_stored_fields() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.favourites.add(fav("5", "Leia Organa", "Alderaan"));
        let mut view = FavouritesList::new();

        match view.handle_key(key(KeyCode::Enter), &state).as_slice() {
            [Action::OpenDetail { id, forwarded }] => {
                assert_eq!(id, "5");
                assert_eq!(forwarded.name, "Leia Organa");
                assert_eq!(forwarded.home_planet.as_deref(), Some("Alderaan"));
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn back_goes_home() {
        let state = AppState::new("https://swapi.dev/api/");
        let mut view = FavouritesList::new();
        assert_eq!(view.handle_key(key(KeyCode::Esc), &state), vec![Action::NavigateHome]);
    }
}
