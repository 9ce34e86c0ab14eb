use kubevis_types::{Density, Node, Pod, PollInterval};
use kubevis_view::{ClusterView, FetchOutcome, Generation};

/// Which column of the label filter overlay has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LabelFocus {
    #[default]
    Keys,
    Values,
}

/// UI-specific transient state
#[derive(Debug, Default)]
pub struct UiState {
    /// Is the search bar accepting input?
    pub search_active: bool,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// Index into the flattened list of visible pods
    pub pod_cursor: usize,

    /// First grid row / card line shown (adjusted while rendering)
    pub scroll: usize,

    /// Is the pod detail popup open?
    pub pod_detail_visible: bool,

    // Label filter overlay
    pub label_filter_active: bool,
    pub label_focus: LabelFocus,
    /// Selected key (index into the label index)
    pub label_key_selection: usize,
    /// Selected value of the current key
    pub label_value_selection: usize,

    /// A fetch for the latest generation is still running
    pub refreshing: bool,
}

/// Global application state
pub struct AppState {
    /// Node tree, filters and refresh settings
    pub view: ClusterView,

    /// Where the data comes from (endpoint URL or kube context)
    pub source: String,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,
}

impl AppState {
    pub fn new(source: String, density: Density, poll_interval: PollInterval) -> Self {
        Self {
            view: ClusterView::new(density, poll_interval),
            source,
            ui_state: UiState::default(),
            should_quit: false,
        }
    }

    // ------------------------------------------------------------------
    // Fetch lifecycle
    // ------------------------------------------------------------------

    /// Stamp a new fetch; the caller runs it and reports back
    pub fn begin_fetch(&mut self) -> Generation {
        self.ui_state.refreshing = true;
        self.view.begin_fetch()
    }

    /// Hand a finished fetch to the store. `refreshing` follows the newest fetch started.
    pub fn finish_fetch(&mut self, generation: Generation, result: Result<Vec<Node>, String>) {
        let latest = self.view.is_latest(generation);
        match result {
            Ok(nodes) => {
                if self.view.apply_fetch(generation, nodes) == FetchOutcome::Applied {
                    self.ui_state.error_message = None;
                    self.clamp_cursor();
                }
            }
            Err(e) => {
                self.view.fetch_failed(generation, &e);
                // Nothing has been loaded yet, so there is no tree to keep showing
                if latest && self.view.last_updated().is_none() {
                    self.show_error(format!("Failed to fetch cluster data: {}", e));
                }
            }
        }

        if latest {
            self.ui_state.refreshing = false;
        }
    }

    // ------------------------------------------------------------------
    // Pod cursor
    // ------------------------------------------------------------------

    pub fn visible_pod_count(&self) -> usize {
        self.view.visible().iter().map(|v| v.pods.len()).sum()
    }

    /// Pod under the cursor together with its node
    pub fn selected_pod(&self) -> Option<(&Node, &Pod)> {
        self.view
            .visible()
            .into_iter()
            .flat_map(|v| v.pods.into_iter().map(move |pod| (v.node, pod)))
            .nth(self.ui_state.pod_cursor)
    }

    pub fn pod_up(&mut self) {
        self.ui_state.pod_cursor = self.ui_state.pod_cursor.saturating_sub(1);
    }

    pub fn pod_down(&mut self) {
        let count = self.visible_pod_count();
        if self.ui_state.pod_cursor + 1 < count {
            self.ui_state.pod_cursor += 1;
        }
    }

    pub fn pod_first(&mut self) {
        self.ui_state.pod_cursor = 0;
    }

    pub fn pod_last(&mut self) {
        self.ui_state.pod_cursor = self.visible_pod_count().saturating_sub(1);
    }

    /// Keep the cursor inside the visible set after it changed
    pub fn clamp_cursor(&mut self) {
        let count = self.visible_pod_count();
        if self.ui_state.pod_cursor >= count {
            self.ui_state.pod_cursor = count.saturating_sub(1);
        }
        if count == 0 {
            self.ui_state.pod_detail_visible = false;
        }
    }

    pub fn toggle_pod_detail(&mut self) {
        if self.ui_state.pod_detail_visible {
            self.ui_state.pod_detail_visible = false;
        } else if self.selected_pod().is_some() {
            self.ui_state.pod_detail_visible = true;
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Start editing the search term (the current term is kept)
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
    }

    /// Stop editing but keep the term applied
    pub fn close_search(&mut self) {
        self.ui_state.search_active = false;
    }

    /// Stop editing and drop the term
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.set_search(String::new());
    }

    pub fn search_input_char(&mut self, c: char) {
        let mut term = self.view.search().to_string();
        term.push(c);
        self.set_search(term);
    }

    pub fn search_input_backspace(&mut self) {
        let mut term = self.view.search().to_string();
        term.pop();
        self.set_search(term);
    }

    pub fn search_clear(&mut self) {
        self.set_search(String::new());
    }

    fn set_search(&mut self, term: String) {
        self.view.set_search(term);
        self.clamp_cursor();
    }

    // ------------------------------------------------------------------
    // Label filters
    // ------------------------------------------------------------------

    pub fn toggle_label_filter(&mut self) {
        self.ui_state.label_filter_active = !self.ui_state.label_filter_active;
        if self.ui_state.label_filter_active {
            self.ui_state.label_focus = LabelFocus::Keys;
            self.clamp_label_selection();
        }
    }

    /// Key currently selected in the overlay
    pub fn current_label_key(&self) -> Option<&str> {
        self.view
            .label_index()
            .key_at(self.ui_state.label_key_selection)
    }

    fn current_label_values_len(&self) -> usize {
        self.current_label_key()
            .map(|key| self.view.label_index().values(key).len())
            .unwrap_or(0)
    }

    fn clamp_label_selection(&mut self) {
        let keys = self.view.label_index().len();
        if self.ui_state.label_key_selection >= keys {
            self.ui_state.label_key_selection = keys.saturating_sub(1);
        }
        let values = self.current_label_values_len();
        if self.ui_state.label_value_selection >= values {
            self.ui_state.label_value_selection = values.saturating_sub(1);
        }
    }

    pub fn label_up(&mut self) {
        match self.ui_state.label_focus {
            LabelFocus::Keys => {
                if self.ui_state.label_key_selection > 0 {
                    self.ui_state.label_key_selection -= 1;
                    self.ui_state.label_value_selection = 0;
                }
            }
            LabelFocus::Values => {
                self.ui_state.label_value_selection =
                    self.ui_state.label_value_selection.saturating_sub(1);
            }
        }
    }

    pub fn label_down(&mut self) {
        match self.ui_state.label_focus {
            LabelFocus::Keys => {
                if self.ui_state.label_key_selection + 1 < self.view.label_index().len() {
                    self.ui_state.label_key_selection += 1;
                    self.ui_state.label_value_selection = 0;
                }
            }
            LabelFocus::Values => {
                if self.ui_state.label_value_selection + 1 < self.current_label_values_len() {
                    self.ui_state.label_value_selection += 1;
                }
            }
        }
    }

    pub fn label_switch_column(&mut self) {
        self.ui_state.label_focus = match self.ui_state.label_focus {
            LabelFocus::Keys => LabelFocus::Values,
            LabelFocus::Values => LabelFocus::Keys,
        };
    }

    /// Toggle the highlighted value, or move into the values column
    pub fn label_toggle_value(&mut self) {
        if self.ui_state.label_focus == LabelFocus::Keys {
            self.ui_state.label_focus = LabelFocus::Values;
            return;
        }

        let Some(key) = self.current_label_key().map(str::to_string) else {
            return;
        };
        let Some(value) = self
            .view
            .label_index()
            .values(&key)
            .get(self.ui_state.label_value_selection)
            .cloned()
        else {
            return;
        };

        self.view.toggle_label_value(&key, &value);
        self.clamp_cursor();
    }

    /// Remove the constraint for the highlighted key
    pub fn label_clear_key(&mut self) {
        if let Some(key) = self.current_label_key().map(str::to_string) {
            self.view.clear_label_filter(&key);
            self.clamp_cursor();
        }
    }

    /// Reset search term and label filters
    pub fn clear_filters(&mut self) {
        self.view.clear_filters();
        self.ui_state.search_active = false;
        self.clamp_cursor();
    }

    // ------------------------------------------------------------------
    // Display settings
    // ------------------------------------------------------------------

    pub fn toggle_density(&mut self) {
        self.view.toggle_density();
        self.ui_state.scroll = 0;
    }

    /// Move to the next (or previous) poll interval and return it
    pub fn cycle_interval(&mut self, forward: bool) -> PollInterval {
        let current = self.view.poll_interval();
        let next = if forward {
            current.next()
        } else {
            current.prev()
        };
        self.view.set_poll_interval(next);
        next
    }

    /// Close the topmost overlay. Returns false when nothing was open.
    pub fn go_back(&mut self) -> bool {
        if self.ui_state.help_visible {
            self.ui_state.help_visible = false;
        } else if self.ui_state.pod_detail_visible {
            self.ui_state.pod_detail_visible = false;
        } else if self.ui_state.label_filter_active {
            self.ui_state.label_filter_active = false;
        } else if self.ui_state.search_active {
            self.ui_state.search_active = false;
        } else if self.ui_state.error_message.is_some() {
            self.ui_state.error_message = None;
        } else {
            return false;
        }
        true
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.error_message = Some(msg);
    }
}
