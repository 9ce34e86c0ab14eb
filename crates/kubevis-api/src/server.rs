use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;

use kubevis_k8s::{ClusterSource, aggregate};
use kubevis_types::Node;

/// Path of the aggregation endpoint
pub const API_PATH: &str = "/api/kubernetes";

/// Generic failure returned to callers. The cause is only logged.
#[derive(Debug, Error)]
#[error("Failed to fetch Kubernetes data")]
pub struct AggregationFailed;

/// JSON body of a failed request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AggregationFailed {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Build the router serving the aggregated node tree
pub fn router<S>(source: S) -> Router
where
    S: ClusterSource + 'static,
{
    Router::new()
        .route(API_PATH, get(get_kubernetes::<S>))
        .with_state(Arc::new(source))
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve<S>(addr: SocketAddr, source: S) -> std::io::Result<()>
where
    S: ClusterSource + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "aggregation endpoint listening");

    axum::serve(listener, router(source))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

/// Query the cluster and map the result. Every request re-queries; nothing is cached.
async fn get_kubernetes<S>(
    State(source): State<Arc<S>>,
) -> Result<Json<Vec<Node>>, AggregationFailed>
where
    S: ClusterSource + 'static,
{
    match aggregate(source.as_ref()).await {
        Ok(nodes) => {
            let pods: usize = nodes.iter().map(|n| n.pods.len()).sum();
            tracing::info!(nodes = nodes.len(), pods, "served cluster view");
            Ok(Json(nodes))
        }
        Err(e) => {
            tracing::error!(
                error = &e as &(dyn std::error::Error + 'static),
                "error fetching Kubernetes data"
            );
            Err(AggregationFailed)
        }
    }
}
