use thiserror::Error;

/// Errors raised while talking to the control plane
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The kubeconfig could not be read or the requested context is missing
    #[error("failed to load kubeconfig")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// Neither a kubeconfig nor an in-cluster environment was found
    #[error("failed to infer cluster configuration")]
    InferConfig(#[from] kube::config::InferConfigError),

    #[error("failed to create cluster client")]
    Client(#[source] kube::Error),

    /// A list query failed (network, auth or API error)
    #[error("cluster unavailable: failed to list {resource}")]
    ClusterUnavailable {
        resource: &'static str,
        #[source]
        source: kube::Error,
    },
}

impl ClusterError {
    pub(crate) fn unavailable(resource: &'static str, source: kube::Error) -> Self {
        Self::ClusterUnavailable { resource, source }
    }
}
