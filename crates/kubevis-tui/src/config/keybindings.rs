use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    Dashboard,
    SearchInput,
    LabelFilter,
    PodDetail,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyContext::Global, global);

        // Dashboard bindings
        let mut dashboard = HashMap::new();
        dashboard.insert(KeyBinding::new(KeyCode::Char('j')), Action::PodDown);
        dashboard.insert(KeyBinding::new(KeyCode::Down), Action::PodDown);
        dashboard.insert(KeyBinding::new(KeyCode::Right), Action::PodDown);
        dashboard.insert(KeyBinding::new(KeyCode::Char('k')), Action::PodUp);
        dashboard.insert(KeyBinding::new(KeyCode::Up), Action::PodUp);
        dashboard.insert(KeyBinding::new(KeyCode::Left), Action::PodUp);
        dashboard.insert(KeyBinding::new(KeyCode::Char('g')), Action::PodFirst);
        dashboard.insert(KeyBinding::new(KeyCode::Home), Action::PodFirst);
        dashboard.insert(KeyBinding::shift(KeyCode::Char('G')), Action::PodLast);
        dashboard.insert(KeyBinding::new(KeyCode::End), Action::PodLast);
        dashboard.insert(KeyBinding::new(KeyCode::Enter), Action::ShowPodDetail);
        dashboard.insert(KeyBinding::new(KeyCode::Char('/')), Action::OpenSearch);
        dashboard.insert(KeyBinding::new(KeyCode::Char('l')), Action::ToggleLabelFilter);
        dashboard.insert(KeyBinding::new(KeyCode::Char('x')), Action::ClearFilters);
        dashboard.insert(KeyBinding::new(KeyCode::Char('d')), Action::ToggleDensity);
        dashboard.insert(KeyBinding::new(KeyCode::Char('u')), Action::Refresh);
        dashboard.insert(KeyBinding::new(KeyCode::F(5)), Action::Refresh);
        dashboard.insert(KeyBinding::new(KeyCode::Char('r')), Action::CycleInterval);
        dashboard.insert(KeyBinding::shift(KeyCode::Char('R')), Action::CycleIntervalBack);
        bindings.insert(KeyContext::Dashboard, dashboard);

        // Label filter overlay bindings
        let mut labels = HashMap::new();
        labels.insert(KeyBinding::new(KeyCode::Up), Action::LabelUp);
        labels.insert(KeyBinding::new(KeyCode::Char('k')), Action::LabelUp);
        labels.insert(KeyBinding::new(KeyCode::Down), Action::LabelDown);
        labels.insert(KeyBinding::new(KeyCode::Char('j')), Action::LabelDown);
        labels.insert(KeyBinding::new(KeyCode::Tab), Action::LabelSwitchColumn);
        labels.insert(KeyBinding::new(KeyCode::Left), Action::LabelSwitchColumn);
        labels.insert(KeyBinding::new(KeyCode::Right), Action::LabelSwitchColumn);
        labels.insert(KeyBinding::new(KeyCode::Char(' ')), Action::LabelToggleValue);
        labels.insert(KeyBinding::new(KeyCode::Enter), Action::LabelToggleValue);
        labels.insert(KeyBinding::new(KeyCode::Char('c')), Action::LabelClearKey);
        labels.insert(KeyBinding::new(KeyCode::Char('x')), Action::ClearFilters);
        labels.insert(KeyBinding::new(KeyCode::Char('l')), Action::ToggleLabelFilter);
        bindings.insert(KeyContext::LabelFilter, labels);

        // Pod detail popup bindings
        let mut detail = HashMap::new();
        detail.insert(KeyBinding::new(KeyCode::Enter), Action::ShowPodDetail);
        detail.insert(KeyBinding::new(KeyCode::Char('j')), Action::PodDown);
        detail.insert(KeyBinding::new(KeyCode::Down), Action::PodDown);
        detail.insert(KeyBinding::new(KeyCode::Char('k')), Action::PodUp);
        detail.insert(KeyBinding::new(KeyCode::Up), Action::PodUp);
        bindings.insert(KeyContext::PodDetail, detail);

        // Search input bindings (when search bar is active)
        let mut search = HashMap::new();
        search.insert(KeyBinding::new(KeyCode::Enter), Action::CloseSearch);
        search.insert(KeyBinding::new(KeyCode::Esc), Action::CancelSearch);
        search.insert(KeyBinding::new(KeyCode::Backspace), Action::SearchBackspace);
        search.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::SearchClear);
        search.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::CancelSearch);
        bindings.insert(KeyContext::SearchInput, search);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|context_bindings| context_bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    /// Handle key event in search input mode
    /// Returns Some(Action) for special keys and plain characters
    pub fn get_search_input_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        if let Some(action) = self
            .bindings
            .get(&KeyContext::SearchInput)
            .and_then(|search_bindings| search_bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Regular characters are typed into the search term
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                return Some(Action::SearchInput(c));
            }
        }

        None
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_context_binding_wins() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.get_action(KeyContext::Dashboard, &key(KeyCode::Char('l'))),
            Some(Action::ToggleLabelFilter)
        );
        assert_eq!(
            bindings.get_action(KeyContext::LabelFilter, &key(KeyCode::Char('c'))),
            Some(Action::LabelClearKey)
        );
    }

    #[test]
    fn test_global_fallback() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.get_action(KeyContext::LabelFilter, &key(KeyCode::Esc)),
            Some(Action::GoBack)
        );
        assert_eq!(
            bindings.get_action(
                KeyContext::Dashboard,
                &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            Some(Action::Quit)
        );
        assert_eq!(
            bindings.get_action(KeyContext::Dashboard, &key(KeyCode::Char('z'))),
            None
        );
    }

    #[test]
    fn test_search_input_types_characters() {
        let bindings = KeyBindings::new();
        // 'q' must not quit while typing
        assert_eq!(
            bindings.get_search_input_action(&key(KeyCode::Char('q'))),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            bindings.get_search_input_action(&KeyEvent::new(
                KeyCode::Char('D'),
                KeyModifiers::SHIFT
            )),
            Some(Action::SearchInput('D'))
        );
        assert_eq!(
            bindings.get_search_input_action(&key(KeyCode::Esc)),
            Some(Action::CancelSearch)
        );
        assert_eq!(
            bindings.get_search_input_action(&key(KeyCode::Enter)),
            Some(Action::CloseSearch)
        );
    }
}
