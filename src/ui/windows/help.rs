use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub struct HelpWindow;

const HELP_TEXT: &[&str] = &[
    " Stories:",
    "   j / J / Down      Next Story",
    "   k / K / Up        Previous Story",
    "   Enter / o         Open Story",
    "   Shift+Enter / O   Open Story In Browser",
    "   c                 Open Discussion",
    "   C                 Open Discussion In Browser",
    "   Shift+S           Save Story",
    "",
    " Saved Entries:",
    "   Ctrl+K            Show Saved Entries",
    "   Enter             Open Entry",
    "   Delete            Remove Entry (press twice)",
    "   Esc               Cancel / Close",
    "",
    " Page:",
    "   r                 Reload",
    "   [ / Alt+Left      Back",
    "   ] / Alt+Right     Forward",
    "   :                 Open Page",
    "   q                 Quit",
    "   ?                 Help",
];

impl HelpWindow {
    pub fn render(frame: &mut Frame, area: Rect) {
        let help_content: Vec<Line> = HELP_TEXT.iter().map(|&s| Line::from(s)).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph =
            Paragraph::new(help_content).block(Block::default().title("Help").borders(Borders::ALL));

        frame.render_widget(help_paragraph, popup_area);
    }
}
