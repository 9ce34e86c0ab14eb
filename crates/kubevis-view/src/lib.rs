//! Presentation engine for kubevis
//!
//! This crate holds the last fetched node tree, derives the label index and
//! computes the visible subset for the current search term and label filters.

mod filter;
mod labels;
mod store;

pub use filter::{LabelFilters, ViewFilter, VisibleNode};
pub use labels::LabelIndex;
pub use store::{ClusterView, FetchOutcome, Generation, ViewStats};

// Re-export types used in our public API
pub use kubevis_types::{Density, Node, Pod, PodStatus, PollInterval};
