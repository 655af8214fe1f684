mod app;
mod effects;
pub mod logging;
mod settings;
mod ui;

pub use app::{run_app, Outcome};
pub use settings::{load_file_settings, Args, Settings};
