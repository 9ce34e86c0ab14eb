use std::collections::HashMap;

use kubevis_types::Node;

/// Distinct label values per label key across every pod in the tree.
///
/// Keys and values keep first-seen order. The index is always rebuilt from
/// scratch when the tree changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelIndex {
    entries: Vec<(String, Vec<String>)>,
}

impl LabelIndex {
    /// Scan every pod's labels and collect distinct values per key
    pub fn build(nodes: &[Node]) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for pod in nodes.iter().flat_map(|n| n.pods.iter()) {
            for (key, value) in &pod.labels {
                let idx = *positions.entry(key.as_str()).or_insert_with(|| {
                    entries.push((key.clone(), Vec::new()));
                    entries.len() - 1
                });

                let values = &mut entries[idx].1;
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }

        Self { entries }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Key at a position (for list-style selection)
    pub fn key_at(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(|(key, _)| key.as_str())
    }

    /// Values observed for a key, empty if the key is unknown
    pub fn values(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubevis_types::{NodeStatus, Pod, PodStatus};

    fn node(name: &str, pods: Vec<Pod>) -> Node {
        let mut node = Node::new(name.to_string(), "Unknown".to_string(), NodeStatus::Ready);
        node.pods = pods;
        node
    }

    fn pod(name: &str) -> Pod {
        Pod::new(name.to_string(), PodStatus::Ready)
    }

    #[test]
    fn test_values_first_seen_order() {
        let nodes = vec![
            node(
                "n1",
                vec![
                    pod("a").with_label("env", "prod"),
                    pod("b").with_label("env", "dev"),
                ],
            ),
            node(
                "n2",
                vec![
                    pod("c").with_label("env", "prod"),
                    pod("d").with_label("env", "canary"),
                ],
            ),
        ];

        let index = LabelIndex::build(&nodes);
        assert_eq!(index.values("env"), ["prod", "dev", "canary"]);
    }

    #[test]
    fn test_keys_first_seen_order() {
        let nodes = vec![node(
            "n1",
            vec![
                pod("a").with_label("tier", "web"),
                pod("b").with_label("app", "api").with_label("tier", "backend"),
            ],
        )];

        let index = LabelIndex::build(&nodes);
        let keys: Vec<_> = index.keys().collect();
        assert_eq!(keys, vec!["tier", "app"]);
        assert_eq!(index.key_at(1), Some("app"));
        assert_eq!(index.values("tier"), ["web", "backend"]);
    }

    #[test]
    fn test_unknown_key_and_empty_tree() {
        let index = LabelIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.values("missing").is_empty());
        assert_eq!(index.key_at(0), None);
    }
}
