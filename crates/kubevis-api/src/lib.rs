//! HTTP surface for kubevis
//!
//! The server half exposes the aggregated node tree at `GET /api/kubernetes`.
//! The client half fetches that tree for a dashboard running elsewhere.

mod client;
mod server;

pub use client::{EndpointClient, FetchError};
pub use server::{API_PATH, AggregationFailed, ErrorBody, router, serve};

// Re-export types used in our public API
pub use kubevis_types::Node;
