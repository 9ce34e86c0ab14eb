use k8s_openapi::api::core::v1::{Node as KubeNode, Pod as KubePod};

use kubevis_types::{Container, Node, NodeStatus, Pod, PodStatus};

const UNKNOWN_IP: &str = "Unknown";

/// Map raw nodes and pods into the node view model.
///
/// Nodes keep the order of the node list and each node's pods keep the order
/// of the pod list. Pods whose `spec.nodeName` matches no node are dropped.
pub fn map_nodes(nodes: &[KubeNode], pods: &[KubePod]) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| {
            let name = node.metadata.name.clone().unwrap_or_default();
            let mut view = Node::new(name, node_ip(node), node_status(node));

            view.pods = pods
                .iter()
                .filter(|pod| scheduled_on(pod, &view.name))
                .map(map_pod)
                .collect();

            view
        })
        .collect()
}

fn scheduled_on(pod: &KubePod, node_name: &str) -> bool {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.node_name.as_deref())
        == Some(node_name)
}

fn map_pod(pod: &KubePod) -> Pod {
    let name = pod.metadata.name.clone().unwrap_or_default();
    let mut view = Pod::new(name, pod_status(pod));

    if let Some(spec) = &pod.spec {
        view.containers = spec
            .containers
            .iter()
            .map(|c| Container::new(c.name.clone()))
            .collect();
    }

    if let Some(annotations) = &pod.metadata.annotations {
        view.annotations = annotations.clone();
    }

    if let Some(labels) = &pod.metadata.labels {
        view.labels = labels.clone();
    }

    view
}

/// First "InternalIP" address reported by the node, or "Unknown"
pub fn node_ip(node: &KubeNode) -> String {
    node.status
        .as_ref()
        .and_then(|s| s.addresses.as_ref())
        .and_then(|addresses| addresses.iter().find(|a| a.type_ == "InternalIP"))
        .map(|a| a.address.clone())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

/// Ready only when the "Ready" condition has status "True"
pub fn node_status(node: &KubeNode) -> NodeStatus {
    let ready = node
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|c| c.type_ == "Ready"))
        .is_some_and(|c| c.status == "True");

    if ready {
        NodeStatus::Ready
    } else {
        NodeStatus::NotReady
    }
}

/// Derive the dashboard status of a pod.
///
/// A deletion timestamp wins over everything else. Otherwise the phase
/// decides, and a Running pod only counts as Ready once its "Ready" condition
/// is "True". Unknown or missing phases fall back to Pending.
pub fn pod_status(pod: &KubePod) -> PodStatus {
    if pod.metadata.deletion_timestamp.is_some() {
        return PodStatus::Terminating;
    }

    let status = pod.status.as_ref();
    match status.and_then(|s| s.phase.as_deref()) {
        Some("Pending") => PodStatus::Pending,
        Some("Failed") => PodStatus::Failed,
        Some("Running") => {
            let ready = status
                .and_then(|s| s.conditions.as_ref())
                .is_some_and(|conditions| {
                    conditions
                        .iter()
                        .any(|c| c.type_ == "Ready" && c.status == "True")
                });
            if ready {
                PodStatus::Ready
            } else {
                PodStatus::Pending
            }
        }
        _ => PodStatus::Pending,
    }
}
