use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::workflow::SavedEntries;

use super::centered_popup_area;

const FOOTER_TEXT: &[&str] = &[
    " ↑↓ or j k   Navigate        Enter   Open entry",
    " Delete      Remove entry    Esc     Close",
];

/// The saved-entries overlay drawn on top of the listing.
pub struct SavedWindow;

impl SavedWindow {
    pub fn subtitle(count: usize) -> String {
        format!("{count} saved stories")
    }

    pub fn render(frame: &mut Frame, area: Rect, saved: &SavedEntries) {
        let popup_area = centered_popup_area(area, 70, 80);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Saved Entries")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(FOOTER_TEXT.len() as u16),
        ])
        .areas(inner);

        let count = saved.selection().len();
        frame.render_widget(
            Paragraph::new(Self::subtitle(count)).style(Style::default().fg(Color::DarkGray)),
            header,
        );

        if count == 0 {
            Self::render_empty(frame, body);
        } else {
            Self::render_entries(frame, body, saved);
        }

        let footer_lines: Vec<Line> = FOOTER_TEXT.iter().map(|&s| Line::from(s)).collect();
        frame.render_widget(
            Paragraph::new(footer_lines).style(Style::default().fg(Color::DarkGray)),
            footer,
        );
    }

    fn render_entries(frame: &mut Frame, area: Rect, saved: &SavedEntries) {
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
                    Line::from(Span::styled(
                        entry.url.clone(),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .style(style)
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(selection.index());
        frame.render_stateful_widget(List::new(items), area, &mut list_state);
    }

    fn render_empty(frame: &mut Frame, area: Rect) {
        let empty_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No saved entries",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press Shift + S to save stories for later",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];

        let paragraph = Paragraph::new(empty_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(paragraph, area);
    }
}
