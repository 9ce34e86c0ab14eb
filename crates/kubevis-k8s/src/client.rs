use std::future::Future;

use k8s_openapi::api::core::v1::{Node as KubeNode, Pod as KubePod};
use kube::Api;
use kube::api::ListParams;
use kube::config::KubeConfigOptions;

use crate::error::ClusterError;
use crate::mapper::map_nodes;
use kubevis_types::Node;

/// Raw node and pod lists taken in one refresh
#[derive(Clone, Debug, Default)]
pub struct ClusterSnapshot {
    pub nodes: Vec<KubeNode>,
    pub pods: Vec<KubePod>,
}

/// Anything that can produce a full cluster snapshot
pub trait ClusterSource: Send + Sync {
    fn snapshot(&self) -> impl Future<Output = Result<ClusterSnapshot, ClusterError>> + Send;
}

/// Read-only cluster client listing nodes and pods
#[derive(Clone)]
pub struct ClusterReader {
    client: kube::Client,
}

impl ClusterReader {
    /// Create a reader from the default kubeconfig context (or in-cluster config)
    pub async fn try_default() -> Result<Self, ClusterError> {
        let config = kube::Config::infer().await?;
        Self::from_config(config)
    }

    /// Create a reader for a named kubeconfig context
    pub async fn for_context(context: &str) -> Result<Self, ClusterError> {
        let config = kube::Config::from_kubeconfig(&KubeConfigOptions {
            context: Some(context.to_string()),
            ..Default::default()
        })
        .await?;
        Self::from_config(config)
    }

    fn from_config(config: kube::Config) -> Result<Self, ClusterError> {
        let client = kube::Client::try_from(config).map_err(ClusterError::Client)?;
        Ok(Self { client })
    }

    /// List every node in the cluster
    pub async fn list_nodes(&self) -> Result<Vec<KubeNode>, ClusterError> {
        let nodes: Api<KubeNode> = Api::all(self.client.clone());
        let list = nodes
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::unavailable("nodes", e))?;
        Ok(list.items)
    }

    /// List every pod across all namespaces
    pub async fn list_pods(&self) -> Result<Vec<KubePod>, ClusterError> {
        let pods: Api<KubePod> = Api::all(self.client.clone());
        let list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::unavailable("pods", e))?;
        Ok(list.items)
    }
}

impl ClusterSource for ClusterReader {
    // Nodes first, then pods. The two lists are not taken atomically.
    async fn snapshot(&self) -> Result<ClusterSnapshot, ClusterError> {
        let nodes = self.list_nodes().await?;
        let pods = self.list_pods().await?;
        tracing::debug!(nodes = nodes.len(), pods = pods.len(), "cluster snapshot taken");
        Ok(ClusterSnapshot { nodes, pods })
    }
}

/// Take a snapshot from `source` and map it into the node view model.
///
/// Either the whole aggregation succeeds or it fails; no partial data is
/// returned.
pub async fn aggregate<S: ClusterSource>(source: &S) -> Result<Vec<Node>, ClusterError> {
    let snapshot = source.snapshot().await?;
    Ok(map_nodes(&snapshot.nodes, &snapshot.pods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use k8s_openapi::api::core::v1::PodSpec;

    struct FixedSource(ClusterSnapshot);

    impl ClusterSource for FixedSource {
        async fn snapshot(&self) -> Result<ClusterSnapshot, ClusterError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl ClusterSource for BrokenSource {
        async fn snapshot(&self) -> Result<ClusterSnapshot, ClusterError> {
            Err(ClusterError::unavailable(
                "pods",
                kube::Error::Api(kube::error::ErrorResponse {
                    status: "Failure".to_string(),
                    message: "pods is forbidden".to_string(),
                    reason: "Forbidden".to_string(),
                    code: 403,
                }),
            ))
        }
    }

    fn node(name: &str) -> KubeNode {
        KubeNode {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn pod(name: &str, node_name: &str) -> KubePod {
        KubePod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: Some(node_name.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_aggregate_maps_snapshot() {
        let source = FixedSource(ClusterSnapshot {
            nodes: vec![node("n1"), node("n2")],
            pods: vec![pod("a", "n2"), pod("b", "n1"), pod("c", "n2")],
        });

        let nodes = aggregate(&source).await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].pods.len(), 1);
        let n2: Vec<_> = nodes[1].pods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(n2, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_aggregate_propagates_failure() {
        let err = aggregate(&BrokenSource).await.unwrap_err();
        assert!(matches!(
            err,
            ClusterError::ClusterUnavailable {
                resource: "pods",
                ..
            }
        ));
        assert_eq!(err.to_string(), "cluster unavailable: failed to list pods");
    }
}
