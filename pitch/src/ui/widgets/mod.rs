//! TUI widgets for the Sales AI Agent

pub mod input;
pub mod panel;

pub use input::InputWidget;
pub use panel::{CollapsedPanelWidget, TextPanelWidget};
