//! TUI components for kubevis
//!
//! This crate provides the terminal dashboard for kubevis, including state
//! management, keybindings, event handling, and UI components.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, LabelFocus, UiState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{HelpOverlay, LabelFilterOverlay, PodDetailOverlay, StatusBar};
pub use ui::screens::DashboardScreen;
pub use ui::{Layout, Theme};
