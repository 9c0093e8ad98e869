//! Engine configuration.
//!
//! All timing defaults that were historically scattered magic numbers
//! (the 4-second thinking window, 15/10 fade frames, the 59-second
//! short-form ceiling) live here as named, documented settings, loaded
//! from a TOML file and passed into composition construction.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, EngineSettings, FadeSettings, FormatSettings, LoggingSettings, PathSettings,
    QuizSettings, TimingSettings,
};
