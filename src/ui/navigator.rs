//! Front-end for a listing page: row navigation, opening and saving stories,
//! and the saved-entries overlay.
//!
//! `NavigatorState` is free of terminal and network access. Key presses and
//! timer ticks mutate it and return `Effect`s; `Navigator` performs those
//! (fetching pages, launching the browser) and feeds results back in.

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::Config;
use crate::extract::extract;
use crate::keymap::{ListAction, PageAction, input_action, list_action, page_action};
use crate::locator::{RowHandle, locate};
use crate::models::{Disposition, Flash, FlashKind};
use crate::monitor::{History, MonitorAction, PageMonitor};
use crate::opener::{Opener, SystemOpener};
use crate::page::{Fetcher, Location, Page};
use crate::selection::Selection;
use crate::settings::Settings;
use crate::state::{ListStore, State};
use crate::ui::board::Board;
use crate::ui::windows::{
    confirm::ConfirmWindow,
    help::HelpWindow,
    prompt::{PromptEvent, PromptInput},
    saved::SavedWindow,
};
use crate::ui::{Term, poll_timeout, restore_terminal, setup_terminal};
use crate::workflow::{DeleteOutcome, SaveOutcome, SavedEntries, save_story};

const MESSAGE_TTL: Duration = Duration::from_secs(3);
const FILE_WATCH_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(Location),
    /// Hand a URL to the system browser.
    Open(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageType,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    Saved(SavedEntries),
    Help,
    Prompt(PromptInput),
}

#[derive(Debug)]
pub struct NavigatorState {
    page: Option<Page>,
    rows: Selection<RowHandle>,
    flash: Option<Flash>,
    overlay: Overlay,
    monitor: PageMonitor,
    history: History,
    feedback: Duration,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl NavigatorState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            page: None,
            rows: Selection::default(),
            flash: None,
            overlay: Overlay::None,
            monitor: PageMonitor::new(
                settings.debounce(),
                settings.retry_delay(),
                settings.max_discovery_retries,
            ),
            history: History::new(),
            feedback: settings.feedback(),
            status: None,
            should_quit: false,
        }
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn rows(&self) -> &Selection<RowHandle> {
        &self.rows
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_loading(&self) -> bool {
        self.page.is_none() && self.monitor.is_pending()
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: MessageType, now: Instant) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: now + MESSAGE_TTL,
        });
    }

    /// Go to a new location, recording it in the history.
    pub fn navigate(&mut self, location: Location, now: Instant) {
        log::info!("navigating to {}", location.display());
        self.history.visit(location);
        self.monitor.forget_modified();
        self.page_changed(now);
    }

    /// Schedule rediscovery of a page that changed.
    fn page_changed(&mut self, now: Instant) {
        self.discard_page();
        self.monitor.content_changed(now);
    }

    /// Everything derived from the old page is void: close the overlay and
    /// drop rows and feedback.
    fn discard_page(&mut self) {
        self.overlay = Overlay::None;
        self.page = None;
        self.rows.clear();
        self.flash = None;
    }

    pub fn observe_modified(&mut self, modified: Option<std::time::SystemTime>, now: Instant) {
        if self.monitor.observe_modified(modified, now) {
            self.discard_page();
        }
    }

    /// Expire transient state and report any fetch that is now due.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        if self.flash.as_ref().is_some_and(|flash| flash.expired(now)) {
            self.flash = None;
        }
        if self.status.as_ref().is_some_and(|s| now >= s.expires_at) {
            self.status = None;
        }

        match self.monitor.poll(now) {
            MonitorAction::Rediscover => match self.history.current() {
                Some(location) => vec![Effect::Fetch(location.clone())],
                None => Vec::new(),
            },
            MonitorAction::Idle => Vec::new(),
        }
    }

    /// Result of a fetch requested through `Effect::Fetch`. A failed fetch
    /// counts as a pass that found no rows.
    pub fn page_loaded(&mut self, result: Result<Page>, now: Instant) {
        match result {
            Ok(page) => {
                let rows = locate(&page);
                let count = rows.len();
                self.rows.replace(rows);
                self.page = Some(page);
                self.monitor.discovered(count, now);
            }
            Err(err) => {
                log::warn!("page load failed: {err:#}");
                self.set_status(format!("Could not load page: {err}"), MessageType::Error, now);
                self.monitor.discovered(0, now);
            }
        }
    }

    /// Nearest instant at which `tick` has something to do.
    pub fn deadline(&self) -> Option<Instant> {
        [
            self.flash.as_ref().map(|flash| flash.expires_at),
            self.status.as_ref().map(|status| status.expires_at),
            self.monitor.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn handle_key(&mut self, key: &KeyEvent, store: &dyn ListStore, now: Instant) -> Vec<Effect> {
        match &mut self.overlay {
            Overlay::Prompt(input) => {
                let Some(action) = input_action(key) else {
                    return Vec::new();
                };
                match input.apply(action) {
                    PromptEvent::Editing => {}
                    PromptEvent::Cancelled => self.overlay = Overlay::None,
                    PromptEvent::Submitted(text) => {
                        self.overlay = Overlay::None;
                        match Location::parse(&text) {
                            Ok(location) => self.navigate(location, now),
                            Err(err) => self.set_status(err.to_string(), MessageType::Error, now),
                        }
                    }
                }
                Vec::new()
            }
            Overlay::Help => {
                self.overlay = Overlay::None;
                Vec::new()
            }
            Overlay::Saved(_) => self.handle_saved_key(key, store),
            Overlay::None => match page_action(key) {
                Some(action) => self.handle_page_action(action, store, now),
                None => Vec::new(),
            },
        }
    }

    fn handle_saved_key(&mut self, key: &KeyEvent, store: &dyn ListStore) -> Vec<Effect> {
        let Overlay::Saved(saved) = &mut self.overlay else {
            return Vec::new();
        };
        let Some(action) = list_action(key, saved.is_confirming()) else {
            return Vec::new();
        };

        match action {
            ListAction::Next => saved.next(),
            ListAction::Previous => saved.previous(),
            ListAction::Open => {
                if let Some(entry) = saved.selected() {
                    let url = entry.url.clone();
                    self.overlay = Overlay::None;
                    return vec![Effect::Open(url)];
                }
            }
            ListAction::Delete => {
                if saved.request_delete(store) == DeleteOutcome::Failed {
                    log::warn!("saved entry was not removed");
                }
            }
            ListAction::CancelDelete => saved.cancel_delete(),
            ListAction::Close => self.overlay = Overlay::None,
        }
        Vec::new()
    }

    fn handle_page_action(
        &mut self,
        action: PageAction,
        store: &dyn ListStore,
        now: Instant,
    ) -> Vec<Effect> {
        match action {
            PageAction::Next => self.rows.next(),
            PageAction::Previous => self.rows.previous(),
            PageAction::OpenStory(disposition) => {
                if let Some(story) = self.current_story() {
                    return self.open_url(&story.url, disposition, now);
                }
            }
            PageAction::OpenDiscussion(disposition) => {
                if let Some(story) = self.current_story() {
                    return self.open_url(&story.discussion_link, disposition, now);
                }
            }
            PageAction::Save => self.save_current(store, now),
            PageAction::ShowSaved => self.overlay = Overlay::Saved(SavedEntries::load(store)),
            PageAction::Reload => {
                if self.history.current().is_some() {
                    self.page_changed(now);
                }
            }
            PageAction::Back => {
                if self.history.back().is_some() {
                    self.monitor.forget_modified();
                    self.page_changed(now);
                }
            }
            PageAction::Forward => {
                if self.history.forward().is_some() {
                    self.monitor.forget_modified();
                    self.page_changed(now);
                }
            }
            PageAction::Prompt => {
                let current = self.location().map(Location::display).unwrap_or_default();
                self.overlay = Overlay::Prompt(PromptInput::new(&current));
            }
            PageAction::Help => self.overlay = Overlay::Help,
            PageAction::Quit => {
                self.should_quit = true;
                return vec![Effect::Quit];
            }
        }
        Vec::new()
    }

    fn current_story(&self) -> Option<crate::models::Story> {
        let page = self.page.as_ref()?;
        let row = *self.rows.current()?;
        let story = extract(page, row);
        if story.is_none() {
            log::debug!("selected row has no story link");
        }
        story
    }

    fn save_current(&mut self, store: &dyn ListStore, now: Instant) {
        let Some(row) = self.rows.current().copied() else {
            return;
        };
        let Some(story) = self.current_story() else {
            return;
        };
        let kind = match save_story(store, story) {
            SaveOutcome::Saved => FlashKind::Saved,
            SaveOutcome::AlreadySaved => FlashKind::AlreadySaved,
            SaveOutcome::Failed => return,
        };
        self.flash = Some(Flash {
            row,
            kind,
            expires_at: now + self.feedback,
        });
    }

    /// Current-tab opens of same-site links replace the listing; other hosts
    /// leave the navigator for the browser.
    fn open_url(&mut self, url: &str, disposition: Disposition, now: Instant) -> Vec<Effect> {
        match disposition {
            Disposition::NewTab => vec![Effect::Open(url.to_string())],
            Disposition::CurrentTab => {
                let same_site = Url::parse(url).ok().filter(|parsed| {
                    matches!(parsed.scheme(), "http" | "https")
                        && self.page.as_ref().is_some_and(|page| !page.is_external(parsed))
                });
                match same_site {
                    Some(parsed) => {
                        self.navigate(Location::Remote(parsed), now);
                        Vec::new()
                    }
                    None => {
                        self.should_quit = true;
                        vec![Effect::Open(url.to_string()), Effect::Quit]
                    }
                }
            }
        }
    }
}

pub struct Navigator {
    state: NavigatorState,
    store: State,
    fetcher: Fetcher,
    opener: Box<dyn Opener>,
}

impl Navigator {
    pub fn new(config: &Config, store: State, start: Location) -> Result<Self> {
        let settings = &config.settings;
        let mut state = NavigatorState::new(settings);
        state.navigate(start, Instant::now());
        Ok(Self {
            state,
            store,
            fetcher: Fetcher::new(&settings.site_host)?,
            opener: Box::new(SystemOpener::new(&settings.browser)),
        })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Term) -> Result<()> {
        loop {
            let now = Instant::now();
            let modified = self.state.location().and_then(Location::modified);
            let watching_file = matches!(self.state.location(), Some(Location::File(_)));
            self.state.observe_modified(modified, now);

            let effects = self.state.tick(now);
            self.apply(effects);
            if self.state.should_quit() {
                break;
            }

            let state = &self.state;
            terminal.draw(|f| Self::render(f, state, Instant::now()))?;

            let mut timeout = poll_timeout(self.state.deadline(), Instant::now());
            if watching_file {
                timeout = timeout.min(FILE_WATCH_INTERVAL);
            }
            if !crossterm::event::poll(timeout)? {
                continue;
            }

            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    let effects = self.state.handle_key(&key, &self.store, Instant::now());
                    self.apply(effects);
                }
            }
            if self.state.should_quit() {
                break;
            }
        }
        Ok(())
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch(location) => {
                    let result = self.fetcher.fetch(&location);
                    self.state.page_loaded(result, Instant::now());
                }
                Effect::Open(url) => match self.opener.open(&url) {
                    Ok(()) => {
                        self.state
                            .set_status(format!("Opened {url}"), MessageType::Info, Instant::now());
                    }
                    Err(err) => {
                        log::error!("Error opening {url}: {err:#}");
                        self.state.set_status(
                            format!("Could not open {url}: {err}"),
                            MessageType::Error,
                            Instant::now(),
                        );
                    }
                },
                Effect::Quit => {}
            }
        }
    }

    fn render(frame: &mut Frame, state: &NavigatorState, now: Instant) {
        let area = frame.area();
        let [main, status_bar] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let title = state
            .location()
            .map(|location| format!(" {} ", location.display()))
            .unwrap_or_else(|| String::from(" hnav "));
        Board::new(state.page(), state.rows())
            .with_flash(state.flash())
            .with_title(title)
            .with_loading(state.is_loading())
            .render(frame, main, now);

        Self::render_status_static(frame, status_bar, state);

        match state.overlay() {
            Overlay::None => {}
            Overlay::Saved(saved) => {
                SavedWindow::render(frame, area, saved);
                ConfirmWindow::render(frame, area, saved.delete_state());
            }
            Overlay::Help => HelpWindow::render(frame, area),
            Overlay::Prompt(input) => input.render(frame),
        }
    }

    fn render_status_static(frame: &mut Frame, area: ratatui::layout::Rect, state: &NavigatorState) {
        let line = match state.status() {
            Some(message) => {
                let color = match message.kind {
                    MessageType::Info => Color::Blue,
                    MessageType::Error => Color::Red,
                };
                Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
            }
            None => {
                let position = match state.rows().index() {
                    Some(i) => format!("{}/{}", i + 1, state.rows().len()),
                    None => String::from("-"),
                };
                Line::from(vec![
                    Span::styled(
                        " ? help  Shift+S save  Ctrl+K saved  q quit ",
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(position),
                ])
            }
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
