//! Kubernetes client for kubevis
//!
//! This crate lists nodes and pods from the cluster and maps them into the
//! simplified node/pod view model.

mod client;
mod error;
mod mapper;

pub use client::{ClusterReader, ClusterSnapshot, ClusterSource, aggregate};
pub use error::ClusterError;
pub use mapper::{map_nodes, node_ip, node_status, pod_status};

// Re-export types that are used in our public API
pub use kubevis_types::{Container, Node, NodeStatus, Pod, PodStatus};
