use std::fmt::Display;

use chrono::{DateTime, Local};

use crate::filter::{LabelFilters, ViewFilter, VisibleNode};
use crate::labels::LabelIndex;
use kubevis_types::{Density, Node, PodStatus, PollInterval};

/// Sequence number stamped on each issued fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Result of handing a completed fetch to the store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The tree was replaced
    Applied,
    /// A newer result was already applied; this one was dropped
    Stale,
}

/// Counts shown in the dashboard header
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewStats {
    pub nodes_total: usize,
    pub nodes_visible: usize,
    pub pods_total: usize,
    pub pods_visible: usize,
    /// Visible pods per status, in `PodStatus::ALL` order
    pub by_status: [usize; 4],
}

impl ViewStats {
    pub fn count(&self, status: PodStatus) -> usize {
        PodStatus::ALL
            .iter()
            .position(|s| *s == status)
            .map(|idx| self.by_status[idx])
            .unwrap_or(0)
    }
}

/// Dashboard state: the current node tree plus everything that survives a
/// refresh (search term, label filters, density, poll interval).
///
/// Owned by a single event loop. Fetches are sequenced by generation: a
/// result replaces the tree unless a newer one has already been applied.
#[derive(Debug)]
pub struct ClusterView {
    nodes: Vec<Node>,
    label_index: LabelIndex,
    search: String,
    filters: LabelFilters,
    density: Density,
    poll_interval: PollInterval,
    issued: u64,
    applied: u64,
    last_updated: Option<DateTime<Local>>,
}

impl ClusterView {
    pub fn new(density: Density, poll_interval: PollInterval) -> Self {
        Self {
            nodes: Vec::new(),
            label_index: LabelIndex::default(),
            search: String::new(),
            filters: LabelFilters::new(),
            density,
            poll_interval,
            issued: 0,
            applied: 0,
            last_updated: None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn label_index(&self) -> &LabelIndex {
        &self.label_index
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &LabelFilters {
        &self.filters
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn poll_interval(&self) -> PollInterval {
        self.poll_interval
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Replace the whole tree and rebuild the label index
    pub fn replace_nodes(&mut self, nodes: Vec<Node>) {
        self.label_index = LabelIndex::build(&nodes);
        self.nodes = nodes;
        self.last_updated = Some(Local::now());
    }

    /// Stamp a new fetch. Any fetch issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Whether `generation` is the most recently issued fetch
    pub fn is_latest(&self, generation: Generation) -> bool {
        generation.0 == self.issued
    }

    /// Apply a completed fetch unless a newer result is already showing.
    ///
    /// Results may arrive out of order and while later fetches are still
    /// running; only ones older than the applied generation are dropped.
    pub fn apply_fetch(&mut self, generation: Generation, nodes: Vec<Node>) -> FetchOutcome {
        if generation.0 <= self.applied {
            tracing::debug!(
                generation = generation.0,
                applied = self.applied,
                "discarding stale fetch result"
            );
            return FetchOutcome::Stale;
        }

        tracing::debug!(generation = generation.0, nodes = nodes.len(), "applying fetch result");
        self.applied = generation.0;
        self.replace_nodes(nodes);
        FetchOutcome::Applied
    }

    /// Record a failed fetch. The current tree stays as it is.
    pub fn fetch_failed(&self, generation: Generation, error: &dyn Display) {
        tracing::warn!(generation = generation.0, "failed to refresh cluster data: {:#}", error);
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Replace the selected values for one label key
    pub fn set_label_filter<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set(key, values);
    }

    pub fn toggle_label_value(&mut self, key: &str, value: &str) -> bool {
        self.filters.toggle(key, value)
    }

    pub fn clear_label_filter(&mut self, key: &str) {
        self.filters.clear_key(key);
    }

    /// Reset the search term and every label filter
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.filters.clear();
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.filters.is_empty()
    }

    pub fn toggle_density(&mut self) {
        self.density = self.density.toggle();
    }

    pub fn set_poll_interval(&mut self, interval: PollInterval) {
        self.poll_interval = interval;
    }

    /// Nodes and pods passing the current search term and label filters
    pub fn visible(&self) -> Vec<VisibleNode<'_>> {
        ViewFilter::new(&self.search, &self.filters).apply(&self.nodes)
    }

    pub fn stats(&self) -> ViewStats {
        let visible = self.visible();
        let mut stats = ViewStats {
            nodes_total: self.nodes.len(),
            nodes_visible: visible.len(),
            pods_total: self.nodes.iter().map(|n| n.pods.len()).sum(),
            ..Default::default()
        };

        for pod in visible.iter().flat_map(|v| v.pods.iter()) {
            stats.pods_visible += 1;
            if let Some(idx) = PodStatus::ALL.iter().position(|s| *s == pod.status) {
                stats.by_status[idx] += 1;
            }
        }

        stats
    }
}

impl Default for ClusterView {
    fn default() -> Self {
        Self::new(Density::default(), PollInterval::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubevis_types::{NodeStatus, Pod};

    fn tree(prefix: &str) -> Vec<Node> {
        let mut n1 = Node::new(format!("{prefix}-n1"), "10.0.0.1".to_string(), NodeStatus::Ready);
        n1.pods = vec![
            Pod::new(format!("{prefix}-a"), PodStatus::Ready).with_label("env", "prod"),
            Pod::new(format!("{prefix}-b"), PodStatus::Failed).with_label("env", "dev"),
        ];
        let mut n2 = Node::new(format!("{prefix}-n2"), "Unknown".to_string(), NodeStatus::NotReady);
        n2.pods = vec![Pod::new(format!("{prefix}-c"), PodStatus::Pending).with_label("app", "web")];
        vec![n1, n2]
    }

    fn visible_pods(view: &ClusterView) -> Vec<String> {
        view.visible()
            .iter()
            .flat_map(|v| v.pods.iter().map(|p| p.name.clone()))
            .collect()
    }

    #[test]
    fn test_latest_fetch_wins() {
        let mut view = ClusterView::default();
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        assert_eq!(view.apply_fetch(second, tree("new")), FetchOutcome::Applied);
        assert_eq!(view.apply_fetch(first, tree("old")), FetchOutcome::Stale);
        assert_eq!(view.nodes()[0].name, "new-n1");
    }

    #[test]
    fn test_result_applied_while_newer_fetch_in_flight() {
        let mut view = ClusterView::default();
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        assert_eq!(view.apply_fetch(first, tree("old")), FetchOutcome::Applied);
        assert_eq!(view.nodes()[0].name, "old-n1");
        assert!(!view.is_latest(first));

        assert_eq!(view.apply_fetch(second, tree("new")), FetchOutcome::Applied);
        assert_eq!(view.nodes()[0].name, "new-n1");
    }

    #[test]
    fn test_slow_fetches_still_refresh() {
        // Each poll tick starts a fetch before the previous one answers
        let mut view = ClusterView::default();
        let mut previous = view.begin_fetch();
        for round in 0..20 {
            let next = view.begin_fetch();
            let outcome = view.apply_fetch(previous, tree(&format!("r{round}")));
            assert_eq!(outcome, FetchOutcome::Applied);
            assert_eq!(view.nodes()[0].name, format!("r{round}-n1"));
            previous = next;
        }
        assert!(view.last_updated().is_some());
    }

    #[test]
    fn test_failed_fetch_keeps_tree() {
        let mut view = ClusterView::default();
        let generation = view.begin_fetch();
        view.apply_fetch(generation, tree("x"));
        let index_before = view.label_index().clone();

        let generation = view.begin_fetch();
        view.fetch_failed(generation, &"connection refused");

        assert_eq!(view.nodes().len(), 2);
        assert_eq!(view.label_index(), &index_before);
    }

    #[test]
    fn test_label_index_rebuilt_on_replace() {
        let mut view = ClusterView::default();
        view.replace_nodes(tree("x"));
        assert_eq!(view.label_index().values("env"), ["prod", "dev"]);

        view.replace_nodes(Vec::new());
        assert!(view.label_index().is_empty());
    }

    #[test]
    fn test_filters_survive_refresh() {
        let mut view = ClusterView::default();
        view.replace_nodes(tree("x"));
        view.set_search("x-");
        view.set_label_filter("env", ["prod"]);
        assert_eq!(visible_pods(&view), vec!["x-a"]);

        let generation = view.begin_fetch();
        view.apply_fetch(generation, tree("y"));
        assert_eq!(view.search(), "x-");
        assert!(view.filters().is_selected("env", "prod"));
        assert!(visible_pods(&view).is_empty());
    }

    #[test]
    fn test_clear_filters_restores_full_tree() {
        let mut view = ClusterView::default();
        view.replace_nodes(tree("x"));
        view.set_search("nothing-matches");
        view.toggle_label_value("env", "dev");
        view.set_label_filter("app", ["web"]);
        assert!(view.is_filtered());
        assert!(view.visible().is_empty());

        view.clear_filters();
        assert!(!view.is_filtered());
        assert_eq!(visible_pods(&view), vec!["x-a", "x-b", "x-c"]);
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn test_stats() {
        let mut view = ClusterView::default();
        view.replace_nodes(tree("x"));
        view.set_label_filter("env", ["prod", "dev"]);

        let stats = view.stats();
        assert_eq!(stats.nodes_total, 2);
        assert_eq!(stats.nodes_visible, 1);
        assert_eq!(stats.pods_total, 3);
        assert_eq!(stats.pods_visible, 2);
        assert_eq!(stats.count(PodStatus::Ready), 1);
        assert_eq!(stats.count(PodStatus::Failed), 1);
        assert_eq!(stats.count(PodStatus::Pending), 0);
    }

    #[test]
    fn test_density_and_interval() {
        let mut view = ClusterView::new(Density::Compact, PollInterval::Off);
        view.toggle_density();
        assert_eq!(view.density(), Density::Detailed);

        view.set_poll_interval(view.poll_interval().next());
        assert_eq!(view.poll_interval(), PollInterval::Every5s);
    }
}
