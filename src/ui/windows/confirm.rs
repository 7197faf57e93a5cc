use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::workflow::DeleteState;

pub struct ConfirmWindow;

impl ConfirmWindow {
    pub fn lines(title: &str) -> Vec<String> {
        vec![
            "Delete saved entry?".to_string(),
            format!("\"{title}\""),
            "Press Delete again to confirm or Esc to cancel".to_string(),
        ]
    }

    /// Box sized to `text` plus borders, centered in `area` and never larger.
    pub fn area(area: Rect, text: &[String]) -> Rect {
        let longest = text.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = u16::try_from(longest)
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.width);
        let height = u16::try_from(text.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        Rect::new(x, y, width, height)
    }

    /// Draws the prompt while a delete is pending; nothing otherwise.
    pub fn render(frame: &mut Frame, area: Rect, state: &DeleteState) {
        let DeleteState::Confirming { title, .. } = state else {
            return;
        };

        let text = Self::lines(title);
        let popup_area = Self::area(area, &text);

        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(Span::styled(
                text[0].clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(text[1].clone()),
            Line::from(Span::styled(
                text[2].clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_quotes_title() {
        let lines = ConfirmWindow::lines("Show HN: hnav");
        assert_eq!(lines[0], "Delete saved entry?");
        assert_eq!(lines[1], "\"Show HN: hnav\"");
        assert_eq!(lines[2], "Press Delete again to confirm or Esc to cancel");
    }

    #[test]
    fn test_area_fits_very_long_title() {
        let area = Rect::new(2, 1, 80, 24);
        let lines = ConfirmWindow::lines(&"x".repeat(70_000));
        assert_eq!(ConfirmWindow::area(area, &lines), Rect::new(2, 10, 80, 5));
    }

    #[test]
    fn test_area_sized_to_text() {
        let area = Rect::new(0, 0, 100, 40);
        let lines = ConfirmWindow::lines("Short");
        // Longest line is the 46-char hint.
        assert_eq!(ConfirmWindow::area(area, &lines), Rect::new(25, 17, 50, 5));
    }
}
