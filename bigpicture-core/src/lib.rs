pub mod config;
pub mod dupes;
pub mod output;

pub use config::{Destination, Settings, SettingsOverrides};
pub use dupes::DupeAnalysis;
pub use output::{emit, view, write_dot, OutputError, Processor};
