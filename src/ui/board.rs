use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Instant;

use crate::locator::{RowHandle, row_text};
use crate::models::{Flash, FlashKind};
use crate::page::Page;
use crate::selection::Selection;

/// One listing row as it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub text: String,
    pub subtext: Option<String>,
    pub selected: bool,
    pub badge: Option<FlashKind>,
}

/// Listing widget: the located rows of the current page with the selection
/// marker and any save feedback badge.
pub struct Board<'a> {
    page: Option<&'a Page>,
    rows: &'a Selection<RowHandle>,
    flash: Option<&'a Flash>,
    title: String,
    loading: bool,
}

impl<'a> Board<'a> {
    pub fn new(page: Option<&'a Page>, rows: &'a Selection<RowHandle>) -> Self {
        Self {
            page,
            rows,
            flash: None,
            title: String::from("hnav"),
            loading: false,
        }
    }

    pub fn with_flash(mut self, flash: Option<&'a Flash>) -> Self {
        self.flash = flash;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Rows in page order. The badge only shows while the flash is live.
    pub fn rows(&self, now: Instant) -> Vec<BoardRow> {
        let Some(page) = self.page else {
            return Vec::new();
        };
        let flash = self.flash.filter(|flash| !flash.expired(now));
        self.rows
            .items()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let (text, subtext) = row_text(page, *row);
                BoardRow {
                    text,
                    subtext,
                    selected: self.rows.is_selected(i),
                    badge: flash.filter(|f| f.row == *row).map(|f| f.kind),
                }
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str());

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let rows = self.rows(now);
        if rows.is_empty() {
            self.render_empty(frame, inner_area);
        } else {
            self.render_rows(frame, inner_area, rows);
        }
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect, rows: Vec<BoardRow>) {
        let items: Vec<ListItem> = rows
            .into_iter()
            .map(|row| {
                let marker = if row.selected { "▶ " } else { "  " };
                let title_style = if row.selected {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };

                let mut title = vec![
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                    Span::styled(row.text, title_style),
                ];
                if let Some(kind) = row.badge {
                    let color = match kind {
                        FlashKind::Saved => Color::Green,
                        FlashKind::AlreadySaved => Color::Yellow,
                    };
                    title.push(Span::raw(" "));
                    title.push(Span::styled(
                        kind.label(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ));
                }

                let mut lines = vec![Line::from(title)];
                if let Some(subtext) = row.subtext {
                    lines.push(Line::from(Span::styled(
                        format!("    {subtext}"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(self.rows.index());
        frame.render_stateful_widget(List::new(items), area, &mut list_state);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let empty_text = if self.loading {
            vec![Line::from("Loading...")]
        } else {
            vec![
                Line::from("No stories found on this page"),
                Line::from("Press r to reload or : to open another page"),
            ]
        };

        let paragraph = Paragraph::new(empty_text)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}
