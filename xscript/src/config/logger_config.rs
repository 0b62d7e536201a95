use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Log levels for the engine crates (`app_level_filter`) and for everything
/// else (`level_filter`). `RUST_LOG` overrides both.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub app_level_filter: LevelFilter,
    pub level_filter: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { app_level_filter: LevelFilter::Info, level_filter: LevelFilter::Warn }
    }
}

impl LoggerConfig {
    pub fn directives(&self) -> String {
        let app = self.app_level_filter.as_str().to_ascii_lowercase();
        let rest = self.level_filter.as_str().to_ascii_lowercase();
        format!("{rest},xscript={app},xscript_core={app},xscript_ext={app}")
    }
}
