use std::collections::{BTreeMap, BTreeSet};

use kubevis_types::{Node, Pod};

/// Selected label values per label key.
///
/// Values within one key are OR-ed, keys are AND-ed. A key with no selected
/// values does not constrain anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelFilters {
    selected: BTreeMap<String, BTreeSet<String>>,
}

impl LabelFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected values for one key
    pub fn set<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.selected.remove(key);
        } else {
            self.selected.insert(key.to_string(), values);
        }
    }

    /// Select or deselect a single value, returns whether it is now selected
    pub fn toggle(&mut self, key: &str, value: &str) -> bool {
        let values = self.selected.entry(key.to_string()).or_default();
        let selected = if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        };

        if values.is_empty() {
            self.selected.remove(key);
        }
        selected
    }

    /// Drop the constraint for one key
    pub fn clear_key(&mut self, key: &str) {
        self.selected.remove(key);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.selected.get(key)
    }

    pub fn is_selected(&self, key: &str, value: &str) -> bool {
        self.selected
            .get(key)
            .is_some_and(|values| values.contains(value))
    }

    /// True when no key constrains the visible set
    pub fn is_empty(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    /// Number of keys with at least one selected value
    pub fn active_keys(&self) -> usize {
        self.selected.values().filter(|v| !v.is_empty()).count()
    }

    /// Check a pod against every label dimension
    pub fn matches(&self, pod: &Pod) -> bool {
        self.selected.iter().all(|(key, values)| {
            values.is_empty()
                || pod
                    .labels
                    .get(key)
                    .is_some_and(|value| values.contains(value))
        })
    }
}

/// A node together with the pods that survived filtering
#[derive(Clone, Debug)]
pub struct VisibleNode<'a> {
    pub node: &'a Node,
    pub pods: Vec<&'a Pod>,
}

/// Search term and label filters compiled for one pass over the tree
#[derive(Clone, Debug)]
pub struct ViewFilter<'f> {
    /// Lowercased search term
    needle: String,
    labels: &'f LabelFilters,
}

impl<'f> ViewFilter<'f> {
    pub fn new(search: &str, labels: &'f LabelFilters) -> Self {
        Self {
            needle: search.to_lowercase(),
            labels,
        }
    }

    /// Check if filter is empty (matches everything)
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty() && self.labels.is_empty()
    }

    fn contains(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.needle)
    }

    /// Search predicate at node level
    pub fn matches_node(&self, node: &Node) -> bool {
        self.contains(&node.name)
    }

    /// Search predicate at pod level: pod name or any label value
    pub fn matches_pod_text(&self, pod: &Pod) -> bool {
        self.contains(&pod.name) || pod.labels.values().any(|v| self.contains(v))
    }

    /// Full predicate for a pod. A node-name match satisfies the search part
    /// but the label filters still apply.
    pub fn matches(&self, node_matched: bool, pod: &Pod) -> bool {
        (node_matched || self.matches_pod_text(pod)) && self.labels.matches(pod)
    }

    /// Compute the visible subset. Nodes without visible pods are omitted.
    pub fn apply<'a>(&self, nodes: &'a [Node]) -> Vec<VisibleNode<'a>> {
        nodes
            .iter()
            .filter_map(|node| {
                let node_matched = self.matches_node(node);
                let pods: Vec<&Pod> = node
                    .pods
                    .iter()
                    .filter(|pod| self.matches(node_matched, pod))
                    .collect();

                if pods.is_empty() {
                    None
                } else {
                    Some(VisibleNode { node, pods })
                }
            })
            .collect()
    }
}
