//! Character card — the row shape shared by the list and favourites views.
//!
//! ```text
//!  ♥ Luke Skywalker
//!    male · 172 cm · Tatooine
//! ```

use holocron_api::{Entry, FavouriteEntry, FetchStatus};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app_state::AppState;
use crate::theme::{C_ERROR, C_FAVOURITE, C_MUTED, C_PENDING, C_PLANET, C_PRIMARY, C_SECONDARY, C_SELECTION_BG};

/// Rows per card, including the blank separator.
pub const CARD_HEIGHT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanetLabel {
    Loading,
    Known(String),
    Unavailable,
}

impl PlanetLabel {
    pub fn from_status(status: Option<&FetchStatus<String>>) -> Self {
        match status {
            None | Some(FetchStatus::Pending) => Self::Loading,
            Some(FetchStatus::Resolved(name)) => Self::Known(name.clone()),
            Some(FetchStatus::Failed(_)) => Self::Unavailable,
        }
    }

    fn span(&self) -> Span<'static> {
        match self {
            Self::Loading => Span::styled("…", Style::default().fg(C_PENDING)),
            Self::Known(name) => Span::styled(name.clone(), Style::default().fg(C_PLANET)),
            Self::Unavailable => Span::styled("homeworld unavailable", Style::default().fg(C_ERROR)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub height: String,
    pub planet: PlanetLabel,
    pub favourite: bool,
}

impl CardView {
    /// Card for a list entry; the homeworld comes from the shared lookup.
    pub fn from_entry(entry: &Entry, state: &AppState) -> Self {
        let id = entry.id();
        Self {
            favourite: state.favourites.contains(&id),
            id,
            name: entry.name.clone(),
            gender: entry.gender.clone(),
            height: entry.height.clone(),
            planet: PlanetLabel::from_status(state.homeworld_status(&entry.homeworld)),
        }
    }

    /// Card for a stored favourite; the homeworld name is already known.
    pub fn from_favourite(fav: &FavouriteEntry) -> Self {
        let planet = if fav.home_planet.is_empty() {
            PlanetLabel::Unavailable
        } else {
            PlanetLabel::Known(fav.home_planet.clone())
        };
        Self {
            id: fav.id.clone(),
            name: fav.name.clone(),
            gender: fav.gender.clone(),
            height: fav.height.clone(),
            planet,
            favourite: true,
        }
    }

    pub fn item(&self, selected: bool, width: u16) -> ListItem<'static> {
        let name_style = if selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let heart = if self.favourite {
            Span::styled(" ♥ ", Style::default().fg(C_FAVOURITE))
        } else {
            Span::raw("   ")
        };
        let name = if self.name.is_empty() {
            format!("character {}", self.id)
        } else {
            truncate(&self.name, width.saturating_sub(4) as usize)
        };

        let mut facts = vec![Span::raw("   ")];
        for part in [&self.gender, &height_label(&self.height)] {
            if !part.is_empty() {
                facts.push(Span::styled(part.clone(), Style::default().fg(C_SECONDARY)));
                facts.push(Span::styled(" · ", Style::default().fg(C_MUTED)));
            }
        }
        facts.push(self.planet.span());

        let bg = if selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(vec![
            Line::from(vec![heart, Span::styled(name, name_style)]),
            Line::from(facts),
            Line::from(""),
        ])
        .style(bg)
    }
}

fn height_label(height: &str) -> String {
    match height {
        "" => String::new(),
        h if h.chars().all(|c| c.is_ascii_digit()) => format!("{h} cm"),
        h => h.to_string(),
    }
}

/// Cut `s` to at most `max` display columns, marking the cut with "…".
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
