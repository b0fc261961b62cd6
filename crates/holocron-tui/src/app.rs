//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Every remote read runs as a spawned task against the shared
//!   `ResourceClient` and reports back through the channel.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use holocron_api::client::SharedClient;
use holocron_api::{FetchError, FetchPolicy, FetchStatus, ForwardedEntry, ListPage, ListQuery, ReferenceKind};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    components::{
        character_detail::CharacterDetail, character_list::CharacterList,
        favourites_list::FavouritesList, header::Header, help_overlay::HelpOverlay,
    },
    router::{Navigator, Route},
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    ListLoaded {
        query: ListQuery,
        result: Result<ListPage, FetchError>,
    },
    Homeworld {
        url: String,
        result: Result<String, FetchError>,
    },
    /// One film or starship of the detail view identified by `token`.
    Reference {
        token: u64,
        kind: ReferenceKind,
        index: usize,
        result: Result<String, FetchError>,
    },
}

pub struct App {
    client: SharedClient,
    state: AppState,
    navigator: Navigator,

    header: Header,
    character_list: CharacterList,
    favourites_list: FavouritesList,
    /// Rebuilt on every entry into a detail route; dropping it detaches its
    /// subscription.
    detail: Option<CharacterDetail>,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    body_area: Rect,
    should_quit: bool,
    tick_rate: Duration,
    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,
    initial: Route,
}

impl App {
    pub fn new(client: SharedClient, tick_rate: Duration, initial: Route) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        let state = AppState::new(client.base_url().as_str());
        Self {
            client,
            state,
            navigator: Navigator::new(),
            header: Header::new(),
            character_list: CharacterList::new(),
            favourites_list: FavouritesList::new(),
            detail: None,
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            body_area: Rect::default(),
            should_quit: false,
            tick_rate,
            tx,
            rx: Some(rx),
            initial,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(mut rx) = self.rx.take() else {
            anyhow::bail!("event receiver already taken");
        };

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        // Polls so the thread notices when the loop has gone away.
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(200)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        self.start();
        let result = self.event_loop(&mut terminal, &mut rx).await;
        drop(rx);

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        rx: &mut mpsc::Receiver<AppMessage>,
    ) -> anyhow::Result<()> {
        let mut ui_tick = tokio::time::interval(self.tick_rate);
        ui_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 64;
                    self.handle_message(msg);
                    for _ in 0..MAX_DRAIN {
                        match rx.try_recv() {
                            Ok(next) => self.handle_message(next),
                            Err(_) => break,
                        }
                    }
                }
                _ = ui_tick.tick() => self.on_tick(),
            }
        }
        info!("holocron exiting");
        Ok(())
    }

    /// Issue the first list request and open the initial route.
    fn start(&mut self) {
        info!(base_url = %self.state.base_url, "holocron started");
        self.request_list(false);
        let initial = std::mem::replace(&mut self.initial, Route::List);
        if initial != Route::List {
            self.navigator.push(initial);
            self.sync_route();
        }
    }

    fn on_tick(&mut self) {
        self.toast.tick();
        let actions = self.character_list.tick(&self.state);
        for a in actions {
            self.dispatch(a);
        }
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                for a in self.handle_key(key) {
                    self.dispatch(a);
                }
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for a in self.handle_mouse(mouse) {
                    self.dispatch(a);
                }
            }
            AppMessage::Event(_) => {}

            AppMessage::ListLoaded { query, result } => self.on_list_loaded(query, result),

            AppMessage::Homeworld { url, result } => {
                if let Err(e) = &result {
                    warn!(%url, error = %e, "homeworld lookup failed");
                }
                self.state
                    .homeworlds
                    .insert(url, FetchStatus::from_result(result));
            }

            AppMessage::Reference {
                token,
                kind,
                index,
                result,
            } => match self.detail.as_mut() {
                Some(detail) if detail.token() == token => {
                    if let Err(e) = &result {
                        warn!(id = detail.entry_id(), kind = kind.label(), index, error = %e, "reference failed");
                    }
                    detail.apply(kind, index, result);
                }
                _ => debug!(token, "dropping reference result for a closed detail view"),
            },
        }
    }

    fn on_list_loaded(&mut self, query: ListQuery, result: Result<ListPage, FetchError>) {
        if self.state.list_query.as_ref() != Some(&query) {
            debug!(?query, "dropping stale list result");
            return;
        }
        match &result {
            Ok(page) => {
                info!(?query, count = page.count, shown = page.results.len(), "list loaded");
                self.request_homeworlds(page);
            }
            Err(e) => {
                warn!(?query, error = %e, "list request failed");
                self.toast
                    .error(format!("could not load characters ({})", e.label()));
            }
        }
        self.state.list = FetchStatus::from_result(result);
    }

    // ── Remote reads ──────────────────────────────────────────────────────────

    /// Request the list for the current search state. `force` drops any
    /// cached result for the query first.
    fn request_list(&mut self, force: bool) {
        let (query, planned) = self.state.search.list_plan();
        let policy = if force { FetchPolicy::Refetch } else { planned };
        debug!(?query, ?policy, "requesting list");

        self.state.list_query = Some(query.clone());
        self.state.list = FetchStatus::Pending;

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match policy {
                FetchPolicy::Refetch => client.refetch_entries(query.clone()).await,
                FetchPolicy::CacheFirst => client.fetch_list(query.clone()).await,
            };
            let _ = tx.send(AppMessage::ListLoaded { query, result }).await;
        });
    }

    /// Resolve the homeworld of every card on `page` that has no name yet.
    /// A failed lookup is retried the next time its card is shown.
    fn request_homeworlds(&mut self, page: &ListPage) {
        for entry in &page.results {
            let url = entry.homeworld.clone();
            if url.is_empty() {
                continue;
            }
            if matches!(
                self.state.homeworlds.get(&url),
                Some(FetchStatus::Pending | FetchStatus::Resolved(_))
            ) {
                continue;
            }
            if let Some(name) = self.client.cached_display(&url, ReferenceKind::Homeworld) {
                self.state.homeworlds.insert(url, FetchStatus::Resolved(name));
                continue;
            }

            self.state.homeworlds.insert(url.clone(), FetchStatus::Pending);
            let client = Arc::clone(&self.client);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let result = client.resolve_display(&url, ReferenceKind::Homeworld).await;
                let _ = tx.send(AppMessage::Homeworld { url, result }).await;
            });
        }
    }

    fn open_detail(&mut self, id: String, forwarded: ForwardedEntry) {
        let mut detail = CharacterDetail::new(id, forwarded);
        let mut spawned = 0usize;

        for (kind, index, url) in detail.references() {
            if let Some(name) = self.client.cached_display(&url, kind) {
                detail.apply(kind, index, Ok(name));
                continue;
            }
            let client = Arc::clone(&self.client);
            let watcher = detail.watcher(self.tx.clone());
            spawned += 1;
            tokio::spawn(async move {
                let result = client.resolve_display(&url, kind).await;
                let token = watcher.token();
                watcher
                    .notify(AppMessage::Reference {
                        token,
                        kind,
                        index,
                        result,
                    })
                    .await;
            });
        }

        info!(id = detail.entry_id(), spawned, "detail opened");
        self.detail = Some(detail);
    }

    /// Bring `state.route` and the detail view in line with the navigator.
    fn sync_route(&mut self) {
        let route = self.navigator.current().clone();
        if route == self.state.route {
            return;
        }
        debug!(from = %self.state.route.label(), to = %route.label(), "route change");
        self.state.route = route.clone();
        self.detail = None;
        if let Route::Detail { id, forwarded } = route {
            self.open_detail(id, forwarded);
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            // Any other key closes the overlay
            return vec![Action::ToggleHelp];
        }

        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('1') => return vec![Action::NavigateHome],
                KeyCode::Char('2') => return vec![Action::ShowFavourites],
                _ => {}
            }
        }

        match &self.state.route {
            Route::List => self.character_list.handle_key(key, &self.state),
            Route::Favourites => self.favourites_list.handle_key(key, &self.state),
            Route::Detail { .. } => match self.detail.as_mut() {
                Some(detail) => detail.handle_key(key, &self.state),
                None => vec![],
            },
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        fn hit(r: Rect, col: u16, row: u16) -> bool {
            col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
        }

        if self.help_overlay.visible || !hit(self.body_area, event.column, event.row) {
            return vec![];
        }
        let area = self.body_area;
        match &self.state.route {
            Route::List => self.character_list.handle_mouse(event, area, &self.state),
            Route::Favourites => self.favourites_list.handle_mouse(event, area, &self.state),
            Route::Detail { .. } => vec![],
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast first so views can react before the state changes
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.character_list.on_action(&action, s));
            out.extend(self.favourites_list.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions are applied, not re-broadcast
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Search / pagination ───────────────────────────────────────────
            Action::OpenSearch => self.state.input_mode = InputMode::Search,
            Action::CloseSearch => self.state.input_mode = InputMode::Normal,
            Action::Search(term) => match self.state.search.submit_search(&term) {
                Ok(()) => {
                    info!(term = self.state.search.search_term(), "search");
                    self.request_list(false);
                }
                Err(e) => self.toast.warning(e.to_string()),
            },
            Action::BackToList => {
                self.state.search.reset();
                self.state.input_mode = InputMode::Normal;
                self.request_list(false);
            }
            Action::ChangePage(page) => {
                if self.state.search.is_searching() {
                    debug!(page, "page change ignored while searching");
                    return;
                }
                self.state.search.set_current_page(page);
                self.request_list(false);
            }
            Action::Reload => self.request_list(true),

            // ── Navigation ────────────────────────────────────────────────────
            Action::OpenDetail { id, forwarded } => {
                self.navigator.push(Route::Detail { id, forwarded });
                self.sync_route();
            }
            Action::ShowFavourites => {
                self.navigator.push(Route::Favourites);
                self.sync_route();
            }
            Action::NavigateBack => {
                if self.navigator.back() {
                    self.sync_route();
                }
            }
            Action::NavigateHome => {
                self.navigator.home();
                self.sync_route();
            }

            // ── Favourites ────────────────────────────────────────────────────
            Action::ToggleFavourite(entry) => {
                let name = entry.name.clone();
                if self.state.favourites.toggle(entry) {
                    self.toast.success(format!("{name} added to favourites"));
                } else {
                    self.toast
                        .push(format!("{name} removed from favourites"), Severity::Info);
                }
            }
            Action::RemoveFavourite(id) => self.state.favourites.remove(&id),

            // ── UI ────────────────────────────────────────────────────────────
            Action::Notify(severity, message) => self.toast.push(message, severity),
            // The overlay flips itself in on_action
            Action::ToggleHelp => {}
            Action::Quit => self.should_quit = true,
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.draw(frame, outer[0], false, &self.state);

        self.body_area = outer[1];
        match &self.state.route {
            Route::List => self.character_list.draw(frame, outer[1], true, &self.state),
            Route::Favourites => self.favourites_list.draw(frame, outer[1], true, &self.state),
            Route::Detail { .. } => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.draw(frame, outer[1], true, &self.state);
                }
            }
        }

        status_bar::draw_keys_bar(
            frame,
            outer[2],
            self.state.input_mode,
            &self.state.route,
            self.state.search.is_searching(),
        );

        // ── Help overlay (on top of everything) ──────────────────────────────
        if self.help_overlay.visible {
            self.help_overlay.draw(frame, area, false, &self.state);
        }

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}
