//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens:
//! - Measurement entry with instructions
//! - Prediction result with the importance chart

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::ClinicTheme;
