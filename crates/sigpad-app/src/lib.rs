//! SigPad Application
//!
//! The application shell: windowing, page layout, pointer and keyboard
//! input, and export of the signature.

mod app;
mod event_handler;
mod layout;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use event_handler::EventHandler;
pub use layout::PageLayout;
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
