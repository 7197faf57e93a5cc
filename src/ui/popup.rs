//! Stand-alone saved-entries panel. Works on the store alone; no listing
//! page is involved.

use chrono::{DateTime, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use url::Url;

use crate::config::Config;
use crate::keymap::{ListAction, list_action};
use crate::opener::{Opener, SystemOpener};
use crate::state::{ListStore, State};
use crate::ui::windows::confirm::ConfirmWindow;
use crate::ui::{Term, poll_timeout, restore_terminal, setup_terminal};
use crate::workflow::SavedEntries;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEffect {
    Open(String),
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct PopupState {
    saved: SavedEntries,
    load_failed: bool,
    should_close: bool,
}

impl PopupState {
    pub fn load(store: &dyn ListStore) -> Self {
        match store.get() {
            Ok(entries) => Self {
                saved: SavedEntries::new(entries),
                ..Self::default()
            },
            Err(err) => {
                log::error!("Error loading saved entries: {err:#}");
                Self {
                    load_failed: true,
                    ..Self::default()
                }
            }
        }
    }

    pub fn saved(&self) -> &SavedEntries {
        &self.saved
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn handle_key(&mut self, key: &KeyEvent, store: &dyn ListStore) -> Vec<PopupEffect> {
        let confirming = self.saved.is_confirming();
        let action = match key.code {
            KeyCode::Char('q') if !confirming => Some(ListAction::Close),
            _ => list_action(key, confirming),
        };

        match action {
            Some(ListAction::Next) => self.saved.next(),
            Some(ListAction::Previous) => self.saved.previous(),
            Some(ListAction::Open) => {
                if let Some(entry) = self.saved.selected() {
                    let url = entry.url.clone();
                    self.should_close = true;
                    return vec![PopupEffect::Open(url), PopupEffect::Close];
                }
            }
            Some(ListAction::Delete) => {
                self.saved.request_delete(store);
            }
            Some(ListAction::CancelDelete) => self.saved.cancel_delete(),
            Some(ListAction::Close) => {
                self.should_close = true;
                return vec![PopupEffect::Close];
            }
            None => {}
        }
        Vec::new()
    }
}

/// Host of `url` without a leading `www.`, or "unknown".
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.replacen("www.", "", 1)))
        .unwrap_or_else(|| String::from("unknown"))
}

pub fn format_relative_date(saved_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(saved_at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    if minutes < 1 {
        String::from("just now")
    } else if hours < 1 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

pub struct Popup {
    state: PopupState,
    store: State,
    opener: Box<dyn Opener>,
}

impl Popup {
    pub fn new(config: &Config, store: State) -> Self {
        Self {
            state: PopupState::load(&store),
            store,
            opener: Box::new(SystemOpener::new(&config.settings.browser)),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Term) -> Result<()> {
        while !self.state.should_close() {
            let state = &self.state;
            terminal.draw(|f| Self::render(f, state, Utc::now()))?;

            if !crossterm::event::poll(poll_timeout(None, std::time::Instant::now()))? {
                continue;
            }
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                for effect in self.state.handle_key(&key, &self.store) {
                    if let PopupEffect::Open(url) = effect {
                        if let Err(err) = self.opener.open(&url) {
                            log::error!("Error opening {url}: {err:#}");
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn render(frame: &mut Frame, state: &PopupState, now: DateTime<Utc>) {
        let area = frame.area();
        let count = state.saved().selection().len();
        let block = Block::default()
            .title(format!(" Saved Stories ({count}) "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        if state.load_failed() {
            Self::render_notice(
                frame,
                body,
                "Error loading saved entries",
                "Check the log file for details",
                Color::Red,
            );
        } else if count == 0 {
            Self::render_notice(
                frame,
                body,
                "No saved entries",
                "Press Shift + S on a listing to save stories for later",
                Color::DarkGray,
            );
        } else {
            Self::render_entries(frame, body, state.saved(), now);
        }

        frame.render_widget(
            Paragraph::new(" ↑↓/jk navigate  Enter open  Delete remove  Esc/q close")
                .style(Style::default().fg(Color::DarkGray)),
            footer,
        );

        ConfirmWindow::render(frame, area, state.saved().delete_state());
    }

    fn render_entries(frame: &mut Frame, area: Rect, saved: &SavedEntries, now: DateTime<Utc>) {
        let selection = saved.selection();
        let items: Vec<ListItem> = selection
            .items()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if selection.is_selected(i) {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                ListItem::new(vec![
                    Line::from(Span::styled(
                        entry.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(vec![
                        Span::styled(extract_domain(&entry.url), Style::default().fg(Color::Cyan)),
                        Span::raw("  "),
                        Span::styled(
                            format_relative_date(entry.saved_at, now),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                ])
                .style(style)
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(selection.index());
        frame.render_stateful_widget(List::new(items), area, &mut list_state);
    }

    fn render_notice(frame: &mut Frame, area: Rect, heading: &str, detail: &str, color: Color) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                heading.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                detail.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(color)).centered(),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entry;
    use chrono::{Duration, TimeZone};
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn entry(url: &str, title: &str) -> Entry {
        Entry {
            url: url.to_string(),
            title: title.to_string(),
            discussion_link: url.to_string(),
            saved_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn store_with(entries: &[Entry]) -> (TempDir, State) {
        let dir = TempDir::new().unwrap();
        let state = State::open(&dir.path().join("states.db")).unwrap();
        state.set(entries).unwrap();
        (dir, state)
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.example.com/a/b"), "example.com");
        assert_eq!(extract_domain("http://blog.rust-lang.org/"), "blog.rust-lang.org");
        assert_eq!(extract_domain("not a url"), "unknown");
    }

    #[test]
    fn test_format_relative_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(format_relative_date(now - Duration::seconds(30), now), "just now");
        assert_eq!(format_relative_date(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_relative_date(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(format_relative_date(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_relative_date(now - Duration::hours(47), now), "1d ago");
        assert_eq!(format_relative_date(now - Duration::days(9), now), "9d ago");
        assert_eq!(format_relative_date(now + Duration::minutes(5), now), "just now");
    }

    #[test]
    fn test_popup_open_closes() {
        let (_dir, store) = store_with(&[entry("https://a.example/", "A"), entry("https://b.example/", "B")]);
        let mut popup = PopupState::load(&store);
        popup.handle_key(&key(KeyCode::Down), &store);

        let effects = popup.handle_key(&key(KeyCode::Enter), &store);
        assert_eq!(
            effects,
            vec![PopupEffect::Open("https://b.example/".to_string()), PopupEffect::Close]
        );
        assert!(popup.should_close());
    }

    #[test]
    fn test_popup_delete_flow() {
        let (_dir, store) = store_with(&[entry("https://a.example/", "A"), entry("https://b.example/", "B")]);
        let mut popup = PopupState::load(&store);

        popup.handle_key(&key(KeyCode::Delete), &store);
        assert!(popup.saved().is_confirming());
        // q does not close while a delete is pending.
        assert!(popup.handle_key(&key(KeyCode::Char('q')), &store).is_empty());

        popup.handle_key(&key(KeyCode::Delete), &store);
        assert_eq!(popup.saved().selection().len(), 1);
        assert_eq!(store.get().unwrap()[0].url, "https://b.example/");

        assert_eq!(popup.handle_key(&key(KeyCode::Char('q')), &store), vec![PopupEffect::Close]);
    }

    #[test]
    fn test_popup_escape_cancels_then_closes() {
        let (_dir, store) = store_with(&[entry("https://a.example/", "A")]);
        let mut popup = PopupState::load(&store);
        popup.handle_key(&key(KeyCode::Backspace), &store);
        assert!(popup.handle_key(&key(KeyCode::Esc), &store).is_empty());
        assert!(!popup.saved().is_confirming());
        assert_eq!(store.get().unwrap().len(), 1);
        assert_eq!(popup.handle_key(&key(KeyCode::Esc), &store), vec![PopupEffect::Close]);
    }

    #[test]
    fn test_popup_empty_store() {
        let (_dir, store) = store_with(&[]);
        let mut popup = PopupState::load(&store);
        assert!(!popup.load_failed());
        assert!(popup.handle_key(&key(KeyCode::Enter), &store).is_empty());
        assert!(popup.handle_key(&key(KeyCode::Delete), &store).is_empty());
        assert!(!popup.saved().is_confirming());
    }
}
