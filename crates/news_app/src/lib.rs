//! Command-line front end: settings resolution and a terminal observer.
mod cli;
mod observer;
mod run;
mod settings;

pub use cli::Cli;
pub use observer::TerminalObserver;
pub use run::{connectivity_probe, run};
pub use settings::{load_settings, DEFAULT_SETTINGS_FILE};
