use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout as RatatuiLayout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::{AppState, LabelFocus};
use crate::ui::{Layout, Theme};

/// Two-column popup: label keys on the left, the selected key's values on the right
pub struct LabelFilterOverlay;

impl LabelFilterOverlay {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let popup_area = Layout::centered_percent(frame.area(), 70, 70);
        frame.render_widget(Clear, popup_area);

        let filters = state.view.filters();
        let title = if filters.is_empty() {
            " Label Filters ".to_string()
        } else {
            format!(" Label Filters ({} active) ", filters.active_keys())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(title, Theme::title()));

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let index = state.view.label_index();
        if index.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No pod labels in the current data",
                Theme::text_dim(),
            )));
            frame.render_widget(empty, inner);
            return;
        }

        let columns = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(inner);

        let focus = state.ui_state.label_focus;

        // Keys column
        let keys: Vec<ListItem> = index
            .keys()
            .map(|key| {
                let count = filters.selected(key).map(|s| s.len()).unwrap_or(0);
                let mut spans = vec![Span::styled(key.to_string(), Theme::text())];
                if count > 0 {
                    spans.push(Span::styled(format!(" ({})", count), Theme::text_highlight()));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let mut key_state = ListState::default();
        key_state.select(Some(state.ui_state.label_key_selection));

        let keys_list = List::new(keys)
            .block(Self::column_block("Keys", focus == LabelFocus::Keys))
            .highlight_style(Self::highlight(focus == LabelFocus::Keys))
            .highlight_symbol("> ");
        frame.render_stateful_widget(keys_list, columns[0], &mut key_state);

        // Values column
        let Some(key) = state.current_label_key() else {
            return;
        };
        let values: Vec<ListItem> = index
            .values(key)
            .iter()
            .map(|value| {
                let checked = filters.is_selected(key, value);
                let (mark, style) = if checked {
                    ("[x] ", Theme::text_highlight())
                } else {
                    ("[ ] ", Theme::text())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, style),
                    Span::styled(value.clone(), style),
                ]))
            })
            .collect();

        let mut value_state = ListState::default();
        if focus == LabelFocus::Values {
            value_state.select(Some(state.ui_state.label_value_selection));
        }

        let values_list = List::new(values)
            .block(Self::column_block(key, focus == LabelFocus::Values))
            .highlight_style(Self::highlight(true))
            .highlight_symbol("> ");
        frame.render_stateful_widget(values_list, columns[1], &mut value_state);
    }

    fn column_block(title: &str, focused: bool) -> Block<'_> {
        let border = if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", title))
    }

    fn highlight(focused: bool) -> ratatui::style::Style {
        if focused {
            Theme::list_item_selected()
        } else {
            Theme::text().add_modifier(Modifier::BOLD)
        }
    }
}
