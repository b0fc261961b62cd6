//! CharacterDetail component — one character with its references resolved.
//!
//! The base fields arrive with the route (forwarded from the card that was
//! opened) and are never refetched. Films and starships are resolved one
//! request per reference; each group is folded into a single display state
//! with `holocron_api::aggregate`.
//!
//! The view owns a `Subscription`. Fetch tasks report through watchers
//! derived from it, so results arriving after the view is gone are dropped.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use holocron_api::subscription::{Subscription, Watcher};
use holocron_api::{
    aggregate, FavouriteEntry, FetchError, FetchStatus, ForwardedEntry, GroupPhase, GroupState,
    ReferenceKind,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_label, C_ACCENT, C_ERROR, C_FAVOURITE, C_MUTED, C_PENDING, C_PLANET, C_PRIMARY,
        C_SECONDARY,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub const ADD_LABEL: &str = "Add to Favourites";
pub const REMOVE_LABEL: &str = "Remove from Favourites";

pub fn favourite_label(is_favourite: bool) -> &'static str {
    if is_favourite {
        REMOVE_LABEL
    } else {
        ADD_LABEL
    }
}

/// All references of one kind for the current character, in the order the
/// entry lists them.
#[derive(Debug, Clone)]
pub struct ReferenceGroup {
    kind: ReferenceKind,
    urls: Vec<String>,
    statuses: Vec<FetchStatus<String>>,
}

impl ReferenceGroup {
    pub fn new(kind: ReferenceKind, urls: Vec<String>) -> Self {
        let statuses = vec![FetchStatus::Pending; urls.len()];
        Self {
            kind,
            urls,
            statuses,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Record the outcome for the reference at `index`. Out-of-range indices
    /// are ignored.
    pub fn apply(&mut self, index: usize, result: Result<String, FetchError>) {
        if let Some(slot) = self.statuses.get_mut(index) {
            *slot = FetchStatus::from_result(result);
        }
    }

    pub fn state(&self) -> GroupState {
        aggregate(&self.statuses)
    }

    /// Text and color for the value column. Resolved values are shown as soon
    /// as they arrive, next to the loading marker and the failure count.
    pub fn display(&self) -> (String, ratatui::style::Color) {
        if self.is_empty() {
            let text = match self.kind {
                ReferenceKind::Starship => "n/a",
                _ => "",
            };
            return (text.to_string(), C_MUTED);
        }
        let state = self.state();
        let failed = self.statuses.iter().filter(|s| s.is_failed()).count();
        let joined = state.joined();
        if state.is_failed() && joined.is_none() {
            return (format!("could not load {}", self.kind.label()), C_ERROR);
        }

        let mut parts: Vec<String> = joined.into_iter().collect();
        if state.is_pending() {
            parts.push("loading…".to_string());
        }
        if failed > 0 {
            parts.push(format!("({failed} could not be loaded)"));
        }
        let color = match state.phase {
            GroupPhase::Pending => C_PENDING,
            GroupPhase::Failed => C_ERROR,
            GroupPhase::Resolved => C_PRIMARY,
        };
        (parts.join("  "), color)
    }
}

pub struct CharacterDetail {
    id: String,
    fields: ForwardedEntry,
    films: ReferenceGroup,
    starships: ReferenceGroup,
    subscription: Subscription,
}

impl CharacterDetail {
    pub fn new(id: impl Into<String>, fields: ForwardedEntry) -> Self {
        let films = ReferenceGroup::new(ReferenceKind::Film, fields.films.clone());
        let starships = ReferenceGroup::new(ReferenceKind::Starship, fields.starships.clone());
        Self {
            id: id.into(),
            fields,
            films,
            starships,
            subscription: Subscription::new(),
        }
    }

    pub fn entry_id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> u64 {
        self.subscription.token()
    }

    pub fn watcher<M>(&self, tx: mpsc::Sender<M>) -> Watcher<M> {
        self.subscription.watcher(tx)
    }

    /// Every reference to resolve as `(kind, index within its group, url)`.
    pub fn references(&self) -> Vec<(ReferenceKind, usize, String)> {
        [&self.films, &self.starships]
            .into_iter()
            .flat_map(|group| {
                group
                    .urls()
                    .iter()
                    .enumerate()
                    .map(move |(i, url)| (group.kind(), i, url.clone()))
            })
            .collect()
    }

    pub fn apply(&mut self, kind: ReferenceKind, index: usize, result: Result<String, FetchError>) {
        match kind {
            ReferenceKind::Film => self.films.apply(index, result),
            ReferenceKind::Starship => self.starships.apply(index, result),
            ReferenceKind::Homeworld => {}
        }
    }

    pub fn films(&self) -> &ReferenceGroup {
        &self.films
    }

    pub fn starships(&self) -> &ReferenceGroup {
        &self.starships
    }

    pub fn favourite_entry(&self) -> FavouriteEntry {
        FavouriteEntry::from_forwarded(&self.id, &self.fields)
    }

    pub fn title(&self) -> String {
        if self.fields.name.is_empty() {
            format!("character {}", self.id)
        } else {
            self.fields.name.clone()
        }
    }
}

fn field_row<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", label), style_label()),
        value,
    ])
}

fn plain(value: &str) -> Span<'_> {
    if value.is_empty() {
        Span::styled("unknown", Style::default().fg(C_MUTED))
    } else {
        Span::styled(value, Style::default().fg(C_PRIMARY))
    }
}

impl Component for CharacterDetail {
    fn id(&self) -> ComponentId {
        ComponentId::CharacterDetail
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('f') | KeyCode::Char('*') => {
                vec![Action::ToggleFavourite(self.favourite_entry())]
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => vec![Action::NavigateBack],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let is_favourite = state.favourites.contains(&self.id);
        let title = self.title();
        let badge = is_favourite.then_some(Badge {
            text: "♥",
            color: C_FAVOURITE,
        });
        let block = pane_chrome(&title, None, focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let f = &self.fields;
        let homeworld = match f.home_planet.as_deref() {
            Some(name) if !name.is_empty() => Span::styled(name, Style::default().fg(C_PLANET)),
            _ => Span::styled("unknown", Style::default().fg(C_MUTED)),
        };
        let (films, films_color) = self.films.display();
        let (ships, ships_color) = self.starships.display();

        let height = if f.height.is_empty() {
            String::new()
        } else {
            format!("{} cm", f.height)
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            field_row("gender", plain(&f.gender)),
            field_row("height", plain(&height)),
            field_row("hair", plain(&f.hair_color)),
            field_row("eyes", plain(&f.eye_color)),
            field_row("homeworld", homeworld),
            Line::from(""),
            field_row("films", Span::styled(films, Style::default().fg(films_color))),
            field_row("starships", Span::styled(ships, Style::default().fg(ships_color))),
            Line::from(""),
            Line::from(vec![
                Span::raw("  "),
                Span::styled("[f] ", Style::default().fg(C_SECONDARY)),
                Span::styled(
                    favourite_label(is_favourite),
                    Style::default().fg(C_FAVOURITE).add_modifier(Modifier::BOLD),
                ),
                Span::styled("    [esc] back", Style::default().fg(C_SECONDARY)),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
