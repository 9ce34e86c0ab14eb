use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::Layout;

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Layout::centered(
            area,
            50.min(area.width.saturating_sub(4)),
            30.min(area.height.saturating_sub(2)),
        );

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::section("Pods"),
            Self::key_line("j/↓/→", "Next pod"),
            Self::key_line("k/↑/←", "Previous pod"),
            Self::key_line("g/G", "First / last pod"),
            Self::key_line("Enter", "Pod details"),
            Line::from(""),
            Self::section("Filters"),
            Self::key_line("/", "Search nodes and pods"),
            Self::key_line("l", "Label filters"),
            Self::key_line("Space", "Toggle label value"),
            Self::key_line("c", "Clear label key"),
            Self::key_line("x", "Clear all filters"),
            Line::from(""),
            Self::section("Display"),
            Self::key_line("d", "Compact / detailed"),
            Self::key_line("r/R", "Next / previous interval"),
            Self::key_line("u", "Refresh now"),
            Line::from(""),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Go back"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn section(title: &str) -> Line<'_> {
        Line::from(Span::styled(title, Style::default().fg(Color::Yellow)))
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
