//! CharacterList component — the root view.
//!
//! Shows one page of characters (or the results of a name search) as cards.
//! The phase is derived from the list request status:
//!
//! ```text
//!  Pending                       → Loading    (spinner only)
//!  Failed / Resolved, 0 results  → Empty      ("no character with this search")
//!  Resolved, ≥1 result           → Populated  (cards + pagination)
//! ```
//!
//! Pagination is hidden and page keys are inert while a search term is
//! active; search results always come from page 1 of the filtered set.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, Paragraph},
    Frame,
};

use holocron_api::{FetchStatus, ListPage};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::character_card::{CardView, CARD_HEIGHT},
    theme::{C_ERROR, C_MUTED, C_PENDING, C_SEARCH_FG, C_SECONDARY},
    widgets::{
        pagination::Pagination,
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        search_input::{SearchInput, SearchInputAction},
        toast::Severity,
    },
};

pub const EMPTY_MESSAGE: &str = "no character with this search";

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    /// Nothing to show. `reason` is set when the request failed.
    Empty { reason: Option<String> },
    Populated,
}

pub fn list_phase(status: &FetchStatus<ListPage>) -> ListPhase {
    match status {
        FetchStatus::Pending => ListPhase::Loading,
        FetchStatus::Failed(e) => ListPhase::Empty {
            reason: Some(e.to_string()),
        },
        FetchStatus::Resolved(page) if page.results.is_empty() => ListPhase::Empty { reason: None },
        FetchStatus::Resolved(_) => ListPhase::Populated,
    }
}

/// "Back to list" is offered only for settled search results.
pub fn show_back_to_list(state: &AppState) -> bool {
    state.search.is_searching() && !state.list.is_pending()
}

pub fn pagination(state: &AppState) -> Option<Pagination> {
    if state.search.is_searching() {
        return None;
    }
    match &state.list {
        FetchStatus::Resolved(page) if !page.results.is_empty() => {
            Some(Pagination::new(state.search.current_page(), page.count))
        }
        _ => None,
    }
}

pub fn cards(state: &AppState) -> Vec<CardView> {
    match &state.list {
        FetchStatus::Resolved(page) => page
            .results
            .iter()
            .map(|entry| CardView::from_entry(entry, state))
            .collect(),
        _ => Vec::new(),
    }
}

pub struct CharacterList {
    list: ScrollableList<CardView>,
    search: SearchInput,
    spinner_frame: usize,
}

impl CharacterList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            search: SearchInput::new("search characters by name…"),
            spinner_frame: 0,
        }
    }

    fn sync(&mut self, state: &AppState) {
        self.list.set_items(cards(state));
    }

    fn open_selected(&self, state: &AppState) -> Vec<Action> {
        let FetchStatus::Resolved(page) = &state.list else {
            return vec![];
        };
        let Some(entry) = page.results.get(self.list.selected) else {
            return vec![];
        };
        let home_planet = state.homeworld_name(&entry.homeworld).map(str::to_string);
        vec![Action::OpenDetail {
            id: entry.id(),
            forwarded: entry.forward(home_planet),
        }]
    }

    fn page_step(&self, delta: i64, state: &AppState) -> Vec<Action> {
        pagination(state)
            .and_then(|p| p.step(delta))
            .map(|page| vec![Action::ChangePage(page)])
            .unwrap_or_default()
    }

    fn handle_search_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        match self.search.handle_key(key) {
            SearchInputAction::Edited => vec![],
            SearchInputAction::Cancelled => vec![Action::CloseSearch],
            SearchInputAction::Submitted(raw) => {
                // Validate against a scratch copy; the App commits the term.
                let mut next = state.search.clone();
                match next.submit_search(&raw) {
                    Ok(()) => {
                        self.search.deactivate();
                        vec![
                            Action::CloseSearch,
                            Action::Search(next.search_term().to_string()),
                        ]
                    }
                    Err(e) => vec![Action::Notify(Severity::Warning, e.to_string())],
                }
            }
        }
    }

    fn draw_search_row(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        if self.search.is_active() {
            self.search.draw(frame, area);
            return;
        }
        let mut spans = vec![
            Span::styled(" results for ", Style::default().fg(C_SECONDARY)),
            Span::styled(
                format!("\"{}\"", state.search.search_term()),
                Style::default().fg(C_SEARCH_FG).add_modifier(Modifier::BOLD),
            ),
        ];
        if show_back_to_list(state) {
            spans.push(Span::styled("   [b] back to list", Style::default().fg(C_MUTED)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for CharacterList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CharacterList {
    fn id(&self) -> ComponentId {
        ComponentId::CharacterList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(state);

        if self.search.is_active() {
            return self.handle_search_key(key, state);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.open_selected(state),

            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => {
                return self.page_step(-1, state)
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => {
                return self.page_step(1, state)
            }

            KeyCode::Char('/') => {
                self.search.set_value(state.search.search_term());
                self.search.activate();
                return vec![Action::OpenSearch];
            }
            KeyCode::Char('b') | KeyCode::Esc if show_back_to_list(state) => {
                return vec![Action::BackToList];
            }
            KeyCode::Char('r') if !state.list.is_pending() => return vec![Action::Reload],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        self.sync(state);
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

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        if state.list.is_pending() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::BackToList => {
                self.search.clear();
                self.search.deactivate();
                self.list.select_first();
            }
            Action::Search(_) | Action::ChangePage(_) => self.list.select_first(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync(state);

        let title = if state.search.is_searching() {
            "search"
        } else {
            "characters"
        };
        let phase = list_phase(&state.list);
        let badge = match &phase {
            ListPhase::Empty { reason: Some(_) } => Some(Badge {
                text: "ERR",
                color: C_ERROR,
            }),
            ListPhase::Loading => Some(Badge {
                text: "…",
                color: C_PENDING,
            }),
            _ => None,
        };
        let block = pane_chrome(title, Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let pager = pagination(state);
        let search_h = u16::from(self.search.is_active() || state.search.is_searching());
        let pager_h = u16::from(pager.is_some());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(search_h),
                Constraint::Min(0),
                Constraint::Length(pager_h),
            ])
            .split(inner);

        if search_h > 0 {
            self.draw_search_row(frame, rows[0], state);
        }

        let body = rows[1];
        match phase {
            ListPhase::Loading => {
                let icon = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("  {icon} loading characters"),
                        Style::default().fg(C_PENDING),
                    )),
                    body,
                );
            }
            ListPhase::Empty { reason } => {
                let mut lines = vec![Line::from(Span::styled(
                    format!("  {EMPTY_MESSAGE}"),
                    Style::default().fg(C_MUTED),
                ))];
                if let Some(reason) = reason {
                    lines.push(Line::from(Span::styled(
                        format!("  {reason}  (r to retry)"),
                        Style::default().fg(C_ERROR),
                    )));
                }
                frame.render_widget(Paragraph::new(lines), body);
            }
            ListPhase::Populated => {
                let visible_cards = (body.height as usize / CARD_HEIGHT).max(1);
                self.list.ensure_visible(visible_cards);
                let items: Vec<_> = self
                    .list
                    .visible_items(visible_cards)
                    .map(|(i, card)| card.item(i == self.list.selected, body.width))
                    .collect();
                frame.render_widget(List::new(items), body);
            }
        }

        if let Some(p) = pager {
            p.draw(frame, rows[2]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holocron_api::{Entry, FetchError};
    use ratatui::{backend::TestBackend, crossterm::event::KeyModifiers, Terminal};

    fn entry(id: u32, name: &str) -> Entry {
        Entry {
            name: name.into(),
            url: format!("https://swapi.dev/api/people/{id}/"),
            gender: "male".into(),
            homeworld: "https://swapi.dev/api/planets/1/".into(),
            films: vec![],
            starships: vec![],
            height: "172".into(),
            hair_color: "blond".into(),
            eye_color: "blue".into(),
        }
    }

    fn page(count: u32, results: Vec<Entry>) -> FetchStatus<ListPage> {
        FetchStatus::Resolved(ListPage {
            count,
            next: None,
            previous: None,
            results,
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(list: &mut CharacterList, state: &AppState, text: &str) {
        for c in text.chars() {
            list.handle_key(key(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn phase_follows_request_status() {
        assert_eq!(list_phase(&FetchStatus::Pending), ListPhase::Loading);
        assert_eq!(list_phase(&page(0, vec![])), ListPhase::Empty { reason: None });
        assert_eq!(list_phase(&page(1, vec![entry(1, "Luke Skywalker")])), ListPhase::Populated);

        let failed = FetchStatus::Failed(FetchError::Status {
            status: 404,
            url: "https://swapi.dev/api/people/?page=99".into(),
        });
        assert!(matches!(list_phase(&failed), ListPhase::Empty { reason: Some(_) }));
    }

    fn render(list: &mut CharacterList, state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal
            .draw(|frame| list.draw(frame, frame.area(), true, state))
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
    fn zero_result_search_draws_empty_message() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.search.set_search_term("Yoda");
        state.list = page(0, vec![]);
        let mut list = CharacterList::new();

        let screen = render(&mut list, &state);
        assert!(screen.contains(EMPTY_MESSAGE));
        assert!(!screen.contains("(r to retry)"));
    }

    #[test]
    fn failed_page_draws_empty_message_with_reason() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.list = FetchStatus::Failed(FetchError::Network("timed out".into()));
        let mut list = CharacterList::new();

        let screen = render(&mut list, &state);
        assert!(screen.contains(EMPTY_MESSAGE));
        assert!(screen.contains("(r to retry)"));
    }

    #[test]
    fn blank_search_warns_and_dispatches_nothing() {
        let state = AppState::new("https://swapi.dev/api/");
        let mut list = CharacterList::new();

        assert_eq!(list.handle_key(key(KeyCode::Char('/')), &state), vec![Action::OpenSearch]);
        type_text(&mut list, &state, "   ");
        let actions = list.handle_key(key(KeyCode::Enter), &state);

        assert_eq!(
            actions,
            vec![Action::Notify(
                Severity::Warning,
                "Please enter a valid search term".into()
            )]
        );
        assert!(list.search.is_active());
        assert_eq!(state.search.search_term(), "");
    }

    #[test]
    fn valid_search_submits_trimmed_term() {
        let state = AppState::new("https://swapi.dev/api/");
        let mut list = CharacterList::new();

        list.handle_key(key(KeyCode::Char('/')), &state);
        type_text(&mut list, &state, " Luke ");
        let actions = list.handle_key(key(KeyCode::Enter), &state);

        assert_eq!(actions, vec![Action::CloseSearch, Action::Search("Luke".into())]);
        assert!(!list.search.is_active());
    }

    #[test]
    fn luke_on_page_three_shows_one_card_without_pagination() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.search.set_current_page(3);
        state.search.submit_search("Luke").unwrap();
        state.list = page(1, vec![entry(1, "Luke Skywalker")]);

        let shown = cards(&state);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].name, "Luke Skywalker");
        assert_eq!(pagination(&state), None);
        assert!(show_back_to_list(&state));
    }

    #[test]
    fn page_keys_are_inert_while_searching() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.list = page(82, (1..=10).map(|i| entry(i, "x")).collect());
        let mut list = CharacterList::new();

        assert_eq!(list.handle_key(key(KeyCode::Right), &state), vec![Action::ChangePage(2)]);
        assert_eq!(list.handle_key(key(KeyCode::Left), &state), vec![]);

        state.search.set_search_term("a");
        assert_eq!(list.handle_key(key(KeyCode::Right), &state), vec![]);
    }

    #[test]
    fn back_to_list_hidden_while_loading() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.search.set_search_term("Leia");
        state.list = FetchStatus::Pending;
        assert!(!show_back_to_list(&state));

        let mut list = CharacterList::new();
        assert_eq!(list.handle_key(key(KeyCode::Char('b')), &state), vec![]);

        state.list = page(0, vec![]);
        assert_eq!(list.handle_key(key(KeyCode::Char('b')), &state), vec![Action::BackToList]);
    }

    #[test]
    fn enter_forwards_known_fields() {
        let mut state = AppState::new("https://swapi.dev/api/");
        state.list = page(2, vec![entry(1, "Luke Skywalker"), entry(4, "Darth Vader")]);
        state.homeworlds.insert(
            "https://swapi.dev/api/planets/1/".into(),
            FetchStatus::Resolved("Tatooine".into()),
        );
        let mut list = CharacterList::new();

        list.handle_key(key(KeyCode::Down), &state);
        let actions = list.handle_key(key(KeyCode::Enter), &state);
        match actions.as_slice() {
            [Action::OpenDetail { id, forwarded }] => {
                assert_eq!(id, "4");
                assert_eq!(forwarded.name, "Darth Vader");
                assert_eq!(forwarded.home_planet.as_deref(), Some("Tatooine"));
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn back_to_list_clears_uncommitted_text() {
        let state = AppState::new("https://swapi.dev/api/");
        let mut list = CharacterList::new();
        list.handle_key(key(KeyCode::Char('/')), &state);
        type_text(&mut list, &state, "Obi");

        list.on_action(&Action::BackToList, &state);
        assert_eq!(list.search.text(), "");
        assert!(!list.search.is_active());
    }
}
