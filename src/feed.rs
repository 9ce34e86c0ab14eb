use anyhow::{Context, Result};

use kubevis_api::EndpointClient;
use kubevis_k8s::{ClusterReader, aggregate};
use kubevis_types::Node;

/// Where the dashboard gets its node tree from
#[derive(Clone)]
pub enum Feed {
    /// Query the cluster in-process
    Cluster {
        reader: ClusterReader,
        context: Option<String>,
    },
    /// Poll a running `kubevis serve`
    Endpoint(EndpointClient),
}

impl Feed {
    /// Use `endpoint` when given, otherwise read the cluster directly
    pub async fn connect(endpoint: Option<&str>, context: Option<&str>) -> Result<Self> {
        match endpoint {
            Some(base) => {
                let client = EndpointClient::new(base)
                    .with_context(|| format!("failed to create HTTP client for {}", base))?;
                tracing::info!(url = client.url(), "dashboard reading from endpoint");
                Ok(Self::Endpoint(client))
            }
            None => {
                let reader = connect_cluster(context).await?;
                Ok(Self::Cluster {
                    reader,
                    context: context.map(str::to_string),
                })
            }
        }
    }

    /// Short label for the header
    pub fn describe(&self) -> String {
        match self {
            Self::Cluster {
                context: Some(name),
                ..
            } => format!("context {}", name),
            Self::Cluster { context: None, .. } => "current context".to_string(),
            Self::Endpoint(client) => client.url().to_string(),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Node>> {
        match self {
            Self::Cluster { reader, .. } => Ok(aggregate(reader).await?),
            Self::Endpoint(client) => Ok(client.fetch().await?),
        }
    }
}

/// Build a cluster reader for `context`, or the kubeconfig's current context
pub async fn connect_cluster(context: Option<&str>) -> Result<ClusterReader> {
    let reader = match context {
        Some(name) => ClusterReader::for_context(name)
            .await
            .with_context(|| format!("failed to load kubeconfig context '{}'", name))?,
        None => ClusterReader::try_default()
            .await
            .context("failed to load Kubernetes configuration")?,
    };
    tracing::info!(context = context.unwrap_or("<current>"), "connected to cluster");
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_endpoint_feed_describes_url() {
        let feed = Feed::connect(Some("http://127.0.0.1:3000"), None)
            .await
            .unwrap();
        assert_eq!(feed.describe(), "http://127.0.0.1:3000/api/kubernetes");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails() {
        // Port 9 (discard) is closed on test hosts
        let feed = Feed::connect(Some("http://127.0.0.1:9"), None).await.unwrap();
        assert!(feed.fetch().await.is_err());
    }
}
