use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use kubevis_types::{Density, Node, Pod, PodStatus};
use kubevis_view::VisibleNode;

use crate::app::AppState;
use crate::ui::components::{
    HelpOverlay, LabelFilterOverlay, PodDetailOverlay, StatusBar, dashboard_hints,
    label_filter_hints, search_hints,
};
use crate::ui::{Layout, Theme};

/// Cluster overview: header with counts, optional search bar, node tree, status bar
pub struct DashboardScreen;

/// Rendered node tree plus the line holding the pod cursor
struct TreeLines<'a> {
    lines: Vec<Line<'a>>,
    cursor_line: Option<usize>,
}

impl DashboardScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let show_search = state.ui_state.search_active || !state.view.search().is_empty();
        let areas = Layout::dashboard(frame.area(), show_search);

        Self::render_header(frame, areas.header, state);
        if let Some(search_area) = areas.search {
            Self::render_search_bar(frame, search_area, state);
        }
        Self::render_nodes(frame, areas.content, state);
        Self::render_status_bar(frame, areas.status, state);

        // Overlays, topmost last
        if state.ui_state.label_filter_active {
            LabelFilterOverlay::render(frame, state);
        }
        if state.ui_state.pod_detail_visible {
            if let Some((node, pod)) = state.selected_pod() {
                PodDetailOverlay::render(frame, node, pod);
            }
        }
        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let stats = state.view.stats();
        let sep = || Span::styled("  │  ", Theme::text_dim());

        let mut spans = vec![
            Span::styled(" ", Theme::text()),
            Span::styled(state.source.clone(), Theme::text_highlight()),
            sep(),
            Span::styled("Nodes ", Theme::text_dim()),
            Span::styled(
                Self::ratio(stats.nodes_visible, stats.nodes_total),
                Theme::text(),
            ),
            sep(),
            Span::styled("Pods ", Theme::text_dim()),
            Span::styled(
                Self::ratio(stats.pods_visible, stats.pods_total),
                Theme::text(),
            ),
            sep(),
        ];

        for status in PodStatus::ALL {
            spans.push(Span::styled(Theme::POD_SWATCH, Theme::pod_status(status)));
            spans.push(Span::styled(
                format!(" {} ", stats.count(status)),
                Theme::text(),
            ));
        }

        spans.push(sep());
        spans.push(Span::styled("⟳ ", Theme::text_dim()));
        spans.push(Span::styled(
            state.view.poll_interval().label(),
            Theme::text(),
        ));

        if let Some(updated) = state.view.last_updated() {
            spans.push(sep());
            spans.push(Span::styled("updated ", Theme::text_dim()));
            spans.push(Span::styled(
                updated.format("%H:%M:%S").to_string(),
                Theme::text(),
            ));
        }

        if state.ui_state.refreshing {
            spans.push(Span::styled("  refreshing…", Style::default().fg(Color::Yellow)));
        }

        let filters = state.view.filters();
        if !filters.is_empty() {
            spans.push(sep());
            spans.push(Span::styled(
                format!("{} label filter(s)", filters.active_keys()),
                Theme::label_chip(),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" kubevis ", Theme::title())),
        );

        frame.render_widget(header, area);
    }

    fn render_search_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let active = state.ui_state.search_active;

        let mut spans = vec![if active {
            Span::styled(
                " /",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" Search: ", Theme::text_dim())
        }];

        spans.push(Span::styled(
            state.view.search().to_string(),
            Theme::text_highlight(),
        ));

        if active {
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        } else {
            spans.push(Span::styled("  [/] Edit  [x] Clear", Theme::text_dim()));
        }

        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if active {
                    Style::default().fg(Color::Yellow)
                } else {
                    Theme::border()
                })
                .title(Span::styled(" Search ", Theme::title())),
        );

        frame.render_widget(bar, area);
    }

    fn render_nodes(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(
                format!(" Nodes · {} ", state.view.density().label()),
                Theme::title(),
            ));

        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(3) as usize;

        if state.view.nodes().is_empty() {
            let message = match (&state.ui_state.error_message, state.view.last_updated()) {
                (Some(err), _) => Line::from(Span::styled(format!(" {}", err), Theme::error())),
                (None, None) => Line::from(Span::styled(
                    " Loading cluster data…",
                    Theme::text_dim(),
                )),
                (None, Some(_)) => Line::from(Span::styled(
                    " The cluster reported no nodes",
                    Theme::text_dim(),
                )),
            };
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        }

        let visible = state.view.visible();
        if visible.is_empty() {
            let message = Line::from(Span::styled(
                " No nodes or pods match the current filters  [x] Clear",
                Theme::text_dim(),
            ));
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        }

        let tree = match state.view.density() {
            Density::Compact => compact_lines(&visible, state.ui_state.pod_cursor, inner_width),
            Density::Detailed => detailed_lines(&visible, state.ui_state.pod_cursor),
        };

        // Keep the cursor on screen
        let total = tree.lines.len();
        let max_scroll = total.saturating_sub(inner_height);
        let mut scroll = state.ui_state.scroll;
        if let Some(line) = tree.cursor_line {
            if line < scroll {
                // One line of context so a node's first pod shows its header
                scroll = line.saturating_sub(1);
            } else if line >= scroll + inner_height {
                scroll = line + 1 - inner_height;
            }
        }
        scroll = scroll.min(max_scroll);
        state.ui_state.scroll = scroll;

        let lines: Vec<Line> = tree
            .lines
            .into_iter()
            .skip(scroll)
            .take(inner_height)
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if total > inner_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_scroll)
                .position(scroll);
            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        if let Some(err) = &state.ui_state.error_message {
            let line = Line::from(vec![
                Span::styled(format!(" ⚠ {}", err), Theme::error()),
                Span::styled("  [Esc] Dismiss", Theme::text_dim()),
            ]);
            frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
            return;
        }

        let hints = if state.ui_state.search_active {
            search_hints()
        } else if state.ui_state.label_filter_active {
            label_filter_hints()
        } else {
            dashboard_hints()
        };

        let pods = state.visible_pod_count();
        let mut status_bar = StatusBar::new().hints(hints);
        if pods > 0 {
            status_bar = status_bar.right(format!(
                "pod {}/{}",
                state.ui_state.pod_cursor + 1,
                pods
            ));
        }

        frame.render_widget(status_bar, area);
    }

    fn ratio(visible: usize, total: usize) -> String {
        if visible == total {
            total.to_string()
        } else {
            format!("{}/{}", visible, total)
        }
    }
}

fn node_line<'a>(node: &'a Node, pod_count: usize) -> Line<'a> {
    Line::from(vec![
        Span::styled("▌ ", Theme::node_status(node.status)),
        Span::styled(node.name.as_str(), Theme::text_highlight()),
        Span::styled(format!("  {}  ", node.ip), Theme::text_dim()),
        Span::styled(node.status.as_str(), Theme::node_status(node.status)),
        Span::styled(format!("  {} pods", pod_count), Theme::text_dim()),
    ])
}

/// One swatch per pod, wrapped to `width`
fn compact_lines<'a>(visible: &[VisibleNode<'a>], cursor: usize, width: usize) -> TreeLines<'a> {
    let per_row = (width.saturating_sub(2) / 2).max(1);
    let mut lines = Vec::new();
    let mut cursor_line = None;
    let mut pod_index = 0;

    for (i, entry) in visible.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(node_line(entry.node, entry.pods.len()));

        for row in entry.pods.chunks(per_row) {
            let mut spans = vec![Span::raw("  ")];
            for pod in row {
                let style = if pod_index == cursor {
                    cursor_line = Some(lines.len());
                    Theme::pod_selected(pod.status)
                } else {
                    Theme::pod_status(pod.status)
                };
                spans.push(Span::styled(Theme::POD_SWATCH, style));
                spans.push(Span::raw(" "));
                pod_index += 1;
            }
            lines.push(Line::from(spans));
        }
    }

    TreeLines { lines, cursor_line }
}

/// One line per pod with status, containers and labels
fn detailed_lines<'a>(visible: &[VisibleNode<'a>], cursor: usize) -> TreeLines<'a> {
    let mut lines = Vec::new();
    let mut cursor_line = None;
    let mut pod_index = 0;

    for (i, entry) in visible.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(node_line(entry.node, entry.pods.len()));

        for pod in &entry.pods {
            let selected = pod_index == cursor;
            if selected {
                cursor_line = Some(lines.len());
            }
            lines.push(pod_line(pod, selected));
            pod_index += 1;
        }
    }

    TreeLines { lines, cursor_line }
}

fn pod_line<'a>(pod: &'a Pod, selected: bool) -> Line<'a> {
    let name_style = if selected {
        Theme::list_item_selected()
    } else {
        Theme::text()
    };

    let mut spans = vec![
        Span::raw("  "),
        Span::styled(Theme::POD_SWATCH, Theme::pod_status(pod.status)),
        Span::raw(" "),
        Span::styled(pod.name.as_str(), name_style),
        Span::styled(format!("  {:<11}", pod.status.as_str()), Theme::pod_status(pod.status)),
    ];

    if !pod.containers.is_empty() {
        let names: Vec<&str> = pod.containers.iter().map(|c| c.name.as_str()).collect();
        spans.push(Span::styled(
            format!(" [{}]", names.join(", ")),
            Theme::text_dim(),
        ));
    }

    for (key, value) in &pod.labels {
        spans.push(Span::styled(
            format!("  {}={}", key, value),
            Theme::label_chip(),
        ));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubevis_types::{Container, NodeStatus, PollInterval};
    use ratatui::{Terminal, backend::TestBackend};

    fn sample_nodes() -> Vec<Node> {
        let mut db = Node::new("db-node-1".into(), "10.0.0.1".into(), NodeStatus::Ready);
        let mut postgres =
            Pod::new("postgres-0".into(), PodStatus::Ready).with_label("tier", "db");
        postgres.containers.push(Container::new("postgres".into()));
        db.pods.push(postgres);

        let mut edge = Node::new("edge-1".into(), "10.0.0.2".into(), NodeStatus::NotReady);
        edge.pods
            .push(Pod::new("web-1".into(), PodStatus::Pending).with_label("tier", "web"));
        edge.pods
            .push(Pod::new("web-2".into(), PodStatus::Failed).with_label("tier", "web"));

        vec![db, edge]
    }

    fn loaded_state(density: Density) -> AppState {
        let mut state = AppState::new("test-cluster".into(), density, PollInterval::Off);
        let generation = state.begin_fetch();
        state.finish_fetch(generation, Ok(sample_nodes()));
        state
    }

    fn draw(state: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| DashboardScreen::render(frame, state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_compact_lines_wrap_and_cursor() {
        let nodes = sample_nodes();
        let filters = kubevis_view::LabelFilters::new();
        let visible = kubevis_view::ViewFilter::new("", &filters).apply(&nodes);

        // Room for one swatch per row
        let tree = compact_lines(&visible, 2, 4);
        // node, swatch, blank, node, swatch, swatch
        assert_eq!(tree.lines.len(), 6);
        assert_eq!(tree.cursor_line, Some(5));

        let tree = compact_lines(&visible, 0, 80);
        assert_eq!(tree.lines.len(), 5);
        assert_eq!(tree.cursor_line, Some(1));
    }

    #[test]
    fn test_detailed_lines_one_per_pod() {
        let nodes = sample_nodes();
        let filters = kubevis_view::LabelFilters::new();
        let visible = kubevis_view::ViewFilter::new("", &filters).apply(&nodes);

        let tree = detailed_lines(&visible, 1);
        // node, pod, blank, node, pod, pod
        assert_eq!(tree.lines.len(), 6);
        assert_eq!(tree.cursor_line, Some(4));
    }

    #[test]
    fn test_render_loading() {
        let mut state = AppState::new("ctx".into(), Density::Compact, PollInterval::Off);
        let screen = draw(&mut state, 100, 20);
        assert!(screen.contains("Loading cluster data"));
    }

    #[test]
    fn test_render_detailed_tree() {
        let mut state = loaded_state(Density::Detailed);
        let screen = draw(&mut state, 120, 20);
        assert!(screen.contains("test-cluster"));
        assert!(screen.contains("db-node-1"));
        assert!(screen.contains("postgres-0"));
        assert!(screen.contains("[postgres]"));
        assert!(screen.contains("tier=web"));
    }

    #[test]
    fn test_render_filtered_out() {
        let mut state = loaded_state(Density::Compact);
        state.view.set_search("nothing-matches");
        let screen = draw(&mut state, 100, 20);
        assert!(screen.contains("No nodes or pods match"));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut state = loaded_state(Density::Detailed);
        state.pod_last();
        // Content area has room for 3 lines
        draw(&mut state, 120, 9);
        assert!(state.ui_state.scroll > 0);

        state.pod_first();
        draw(&mut state, 120, 9);
        assert_eq!(state.ui_state.scroll, 0);
    }
}
