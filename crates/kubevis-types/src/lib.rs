//! Shared types for kubevis
//!
//! This crate contains the node/pod view model served by the aggregation
//! endpoint and consumed by the dashboard, plus small UI enums shared by
//! several crates.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// ============================================================================
// Cluster View Model
// ============================================================================

/// A cluster node with the pods scheduled on it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// InternalIP address, or "Unknown"
    pub ip: String,
    pub status: NodeStatus,
    /// Pods in the order they were discovered in the pod list
    #[serde(default)]
    pub pods: Vec<Pod>,
}

impl Node {
    pub fn new(name: String, ip: String, status: NodeStatus) -> Self {
        Self {
            name,
            ip,
            status,
            pods: Vec::new(),
        }
    }
}

/// A pod as shown on the dashboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub status: PodStatus,
}

impl Pod {
    pub fn new(name: String, status: PodStatus) -> Self {
        Self {
            name,
            containers: Vec::new(),
            annotations: BTreeMap::new(),
            labels: BTreeMap::new(),
            status,
        }
    }

    /// Builder-style helper to attach a label
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
}

impl Container {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

/// Node readiness, derived from the "Ready" condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    Ready,
    NotReady,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::NotReady => "NotReady",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Ready => Color::Green,
            Self::NotReady => Color::Red,
        }
    }
}

/// Simplified pod status shown on the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodStatus {
    Ready,
    Pending,
    Terminating,
    Failed,
}

impl PodStatus {
    pub const ALL: [PodStatus; 4] = [
        PodStatus::Ready,
        PodStatus::Pending,
        PodStatus::Terminating,
        PodStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Pending => "Pending",
            Self::Terminating => "Terminating",
            Self::Failed => "Failed",
        }
    }

    /// Swatch color for this status
    pub fn color(&self) -> Color {
        match self {
            Self::Ready => Color::Green,
            Self::Pending => Color::Yellow,
            Self::Terminating => Color::LightRed,
            Self::Failed => Color::Red,
        }
    }
}

// ============================================================================
// Dashboard Settings
// ============================================================================

/// Dashboard refresh interval
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum PollInterval {
    /// No automatic refresh
    #[default]
    Off,
    Every5s,
    Every10s,
    Every30s,
    Every60s,
}

impl PollInterval {
    /// Build from a number of seconds; only 0, 5, 10, 30 and 60 are supported
    pub fn from_secs(secs: u64) -> Option<Self> {
        match secs {
            0 => Some(Self::Off),
            5 => Some(Self::Every5s),
            10 => Some(Self::Every10s),
            30 => Some(Self::Every30s),
            60 => Some(Self::Every60s),
            _ => None,
        }
    }

    pub fn as_secs(&self) -> u64 {
        match self {
            Self::Off => 0,
            Self::Every5s => 5,
            Self::Every10s => 10,
            Self::Every30s => 30,
            Self::Every60s => 60,
        }
    }

    /// Tick period, `None` when polling is disabled
    pub fn period(&self) -> Option<Duration> {
        match self {
            Self::Off => None,
            other => Some(Duration::from_secs(other.as_secs())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Off => "No refresh",
            Self::Every5s => "5s",
            Self::Every10s => "10s",
            Self::Every30s => "30s",
            Self::Every60s => "1m",
        }
    }

    /// Cycle to the next interval
    pub fn next(&self) -> Self {
        match self {
            Self::Off => Self::Every5s,
            Self::Every5s => Self::Every10s,
            Self::Every10s => Self::Every30s,
            Self::Every30s => Self::Every60s,
            Self::Every60s => Self::Off,
        }
    }

    /// Cycle to the previous interval
    pub fn prev(&self) -> Self {
        match self {
            Self::Off => Self::Every60s,
            Self::Every5s => Self::Off,
            Self::Every10s => Self::Every5s,
            Self::Every30s => Self::Every10s,
            Self::Every60s => Self::Every30s,
        }
    }
}

impl TryFrom<u64> for PollInterval {
    type Error = String;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::from_secs(secs).ok_or_else(|| {
            format!(
                "unsupported poll interval {}s (expected 0, 5, 10, 30 or 60)",
                secs
            )
        })
    }
}

impl From<PollInterval> for u64 {
    fn from(interval: PollInterval) -> Self {
        interval.as_secs()
    }
}

/// How much detail the dashboard renders per node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// Grid of status swatches
    #[default]
    Compact,
    /// Cards with pod names, containers and metadata
    Detailed,
}

impl Density {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Compact => Self::Detailed,
            Self::Detailed => Self::Compact,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Detailed => "detailed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_json_shape() {
        let mut node = Node::new(
            "n1".to_string(),
            "10.0.0.1".to_string(),
            NodeStatus::Ready,
        );
        let mut pod = Pod::new("p1".to_string(), PodStatus::Terminating).with_label("env", "prod");
        pod.containers.push(Container::new("app".to_string()));
        node.pods.push(pod);

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "n1",
                "ip": "10.0.0.1",
                "status": "Ready",
                "pods": [{
                    "name": "p1",
                    "containers": [{ "name": "app" }],
                    "annotations": {},
                    "labels": { "env": "prod" },
                    "status": "Terminating"
                }]
            })
        );
    }

    #[test]
    fn test_pod_missing_maps_default_to_empty() {
        let pod: Pod = serde_json::from_str(r#"{"name":"p","status":"Pending"}"#).unwrap();
        assert!(pod.labels.is_empty());
        assert!(pod.annotations.is_empty());
        assert!(pod.containers.is_empty());
    }

    #[test]
    fn test_poll_interval_cycle() {
        let mut interval = PollInterval::Off;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(interval.as_secs());
            interval = interval.next();
        }
        assert_eq!(seen, vec![0, 5, 10, 30, 60]);
        assert_eq!(interval, PollInterval::Off);
        assert_eq!(PollInterval::Off.prev(), PollInterval::Every60s);
    }

    #[test]
    fn test_poll_interval_from_secs() {
        assert_eq!(PollInterval::from_secs(30), Some(PollInterval::Every30s));
        assert_eq!(PollInterval::from_secs(7), None);
        assert!(PollInterval::try_from(15).is_err());
        assert_eq!(PollInterval::Off.period(), None);
        assert_eq!(
            PollInterval::Every5s.period(),
            Some(Duration::from_secs(5))
        );
    }
}
