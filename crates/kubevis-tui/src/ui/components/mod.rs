mod help_overlay;
mod label_filter;
mod pod_detail;
mod status_bar;

pub use help_overlay::HelpOverlay;
pub use label_filter::LabelFilterOverlay;
pub use pod_detail::PodDetailOverlay;
pub use status_bar::{StatusBar, dashboard_hints, label_filter_hints, search_hints};
