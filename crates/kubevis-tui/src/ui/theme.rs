use ratatui::style::{Color, Modifier, Style};

use kubevis_types::{NodeStatus, PodStatus};

/// Color theme for the dashboard
pub struct Theme;

impl Theme {
    // Base colors
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    // Accent colors
    pub const PRIMARY: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;

    pub const ERROR: Color = Color::Red;

    /// Glyph drawn for one pod in the compact grid
    pub const POD_SWATCH: &'static str = "■";

    // Border styles
    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    // Text styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn text_highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BG)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    // Cluster objects
    pub fn node_status(status: NodeStatus) -> Style {
        Style::default()
            .fg(status.color())
            .add_modifier(Modifier::BOLD)
    }

    pub fn pod_status(status: PodStatus) -> Style {
        Style::default().fg(status.color())
    }

    /// Swatch under the pod cursor
    pub fn pod_selected(status: PodStatus) -> Style {
        Style::default()
            .fg(status.color())
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn label_chip() -> Style {
        Style::default().fg(Color::Magenta)
    }

    // Status bar
    pub fn status_bar() -> Style {
        Style::default().fg(Self::FG_DIM).bg(Color::DarkGray)
    }

    pub fn status_bar_key() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }
}
