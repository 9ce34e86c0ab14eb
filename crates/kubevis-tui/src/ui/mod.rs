pub mod components;
mod layout;
pub mod screens;
mod theme;

pub use layout::{DashboardAreas, Layout};
pub use theme::Theme;
