use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::percent_of;
use crate::keymap::InputAction;

/// Single-line address input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptInput {
    text: String,
}

/// Result of feeding one key to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Editing,
    Submitted(String),
    Cancelled,
}

impl PromptInput {
    pub fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn apply(&mut self, action: InputAction) -> PromptEvent {
        match action {
            InputAction::Insert(c) => {
                self.text.push(c);
                PromptEvent::Editing
            }
            InputAction::Backspace => {
                self.text.pop();
                PromptEvent::Editing
            }
            InputAction::Submit => PromptEvent::Submitted(std::mem::take(&mut self.text)),
            InputAction::Cancel => PromptEvent::Cancelled,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let frame_area = frame.area();
        let area = Rect::new(
            frame_area.x + frame_area.width / 8,
            frame_area.y + (frame_area.height / 2).saturating_sub(2),
            percent_of(frame_area.width, 75),
            3.min(frame_area.height),
        );

        let input = Paragraph::new(Line::from(self.text.as_str())).block(
            Block::default()
                .title("Open page (URL or file)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(input, area);

        let typed = u16::try_from(self.text.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}
