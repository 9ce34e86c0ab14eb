use std::collections::BTreeMap;

use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use kubevis_types::{Node, Pod};

use crate::ui::{Layout, Theme};

/// Popup with everything known about one pod
pub struct PodDetailOverlay;

impl PodDetailOverlay {
    pub fn render(frame: &mut Frame, node: &Node, pod: &Pod) {
        let popup_area = Layout::centered_percent(frame.area(), 70, 80);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Pod:    ", Theme::text_dim()),
                Span::styled(pod.name.clone(), Theme::text_highlight()),
            ]),
            Line::from(vec![
                Span::styled("Status: ", Theme::text_dim()),
                Span::styled(pod.status.as_str(), Theme::pod_status(pod.status)),
            ]),
            Line::from(vec![
                Span::styled("Node:   ", Theme::text_dim()),
                Span::styled(node.name.clone(), Theme::text()),
                Span::styled(format!(" ({})", node.ip), Theme::text_dim()),
            ]),
            Line::from(""),
            Line::from(Span::styled("Containers", Theme::title())),
        ];

        if pod.containers.is_empty() {
            lines.push(Line::from(Span::styled("  none", Theme::text_dim())));
        }
        lines.extend(
            pod.containers
                .iter()
                .map(|c| Line::from(Span::styled(format!("  {}", c.name), Theme::text()))),
        );

        lines.push(Line::from(""));
        Self::push_map(&mut lines, "Labels", &pod.labels);
        lines.push(Line::from(""));
        Self::push_map(&mut lines, "Annotations", &pod.annotations);

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(" Pod Details ", Theme::title())),
            );

        frame.render_widget(widget, popup_area);
    }

    fn push_map<'a>(lines: &mut Vec<Line<'a>>, title: &'a str, entries: &'a BTreeMap<String, String>) {
        lines.push(Line::from(Span::styled(title, Theme::title())));
        if entries.is_empty() {
            lines.push(Line::from(Span::styled("  none", Theme::text_dim())));
            return;
        }
        for (key, value) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", key), Theme::label_chip()),
                Span::styled(" = ", Theme::text_dim()),
                Span::styled(value.as_str(), Theme::text()),
            ]));
        }
    }
}
