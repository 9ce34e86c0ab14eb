use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout helper for consistent screen layouts
pub struct Layout;

/// Areas of the dashboard screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardAreas {
    pub header: Rect,
    pub search: Option<Rect>,
    pub content: Rect,
    pub status: Rect,
}

impl Layout {
    /// Header, content, and status bar, with a search row under the header
    /// when `show_search` is set
    pub fn dashboard(area: Rect, show_search: bool) -> DashboardAreas {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);
        let (header, body, status) = (chunks[0], chunks[1], chunks[2]);

        if !show_search {
            return DashboardAreas {
                header,
                search: None,
                content: body,
                status,
            };
        }

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(body);

        DashboardAreas {
            header,
            search: Some(chunks[0]),
            content: chunks[1],
            status,
        }
    }

    /// Popup area of the given size, centered in `area` and clamped to fit
    pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    /// Popup area sized as a percentage of `area`
    pub fn centered_percent(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
        let width = (u32::from(area.width) * u32::from(width_percent.min(100)) / 100) as u16;
        let height = (u32::from(area.height) * u32::from(height_percent.min(100)) / 100) as u16;
        Self::centered(area, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_without_search() {
        let areas = Layout::dashboard(Rect::new(0, 0, 80, 24), false);
        assert_eq!(areas.header.height, 3);
        assert_eq!(areas.search, None);
        assert_eq!(areas.content.height, 20);
        assert_eq!(areas.status.y, 23);
    }

    #[test]
    fn test_dashboard_with_search() {
        let areas = Layout::dashboard(Rect::new(0, 0, 80, 24), true);
        assert_eq!(areas.search.map(|r| (r.y, r.height)), Some((3, 3)));
        assert_eq!(areas.content.y, 6);
        assert_eq!(areas.content.height, 17);
    }

    #[test]
    fn test_centered_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(Layout::centered(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(Layout::centered(area, 100, 100), area);
    }
}
