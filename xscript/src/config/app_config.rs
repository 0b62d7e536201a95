use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use xscript_core::VmConfig;

use crate::config::logger_config::LoggerConfig;

/// Main configuration of the command-line tool.
/// Please use [`AppConfigBuilder`] if you want to build it from code.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the application, shown in the startup log line.
    pub(crate) app_name: String,
    /// Logger configuration to use.
    pub(crate) logger_config: Option<LoggerConfig>,
    /// Interpreter configuration to use.
    pub(crate) vm_config: Option<VmConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "xscript".to_string(),
            logger_config: Some(Default::default()),
            vm_config: Some(Default::default()),
        }
    }
}

/// `AppConfigBuilder` is a convenience builder to create an `AppConfig` from code.
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfigBuilder {
    /// Creates a builder holding the default configuration
    pub fn new() -> Self {
        Self { config: Default::default() }
    }

    /// Creates a builder starting from a configuration read from disk
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Sets the logger configuration for the application
    pub fn with_logger_config(mut self, logger_config: LoggerConfig) -> Self {
        self.config.logger_config = Some(logger_config);
        self
    }

    /// Sets the interpreter configuration for the application
    pub fn with_vm_config(mut self, vm_config: VmConfig) -> Self {
        self.config.vm_config = Some(vm_config);
        self
    }

    /// Retrieves the configuration built
    pub fn get(self) -> AppConfig {
        self.config
    }
}

pub(crate) struct AppConfigReader;

impl AppConfigReader {
    pub(crate) fn read_app_json(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            bail!("configuration file {} not found", path.display());
        }
        AppConfigReader::read_app_config(path)
    }

    fn read_app_config(path: &Path) -> Result<AppConfig> {
        let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let config = serde_json::from_slice(bytes.as_slice())
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let json = r#"{ "app_name": "smoke", "vm_config": { "step_limit": 10 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config,
            AppConfig {
                app_name: "smoke".to_string(),
                logger_config: Some(LoggerConfig::default()),
                vm_config: Some(VmConfig { step_limit: 10 }),
            }
        );
    }

    #[test]
    fn logger_levels_are_read() {
        let json = r#"{ "logger_config": { "app_level_filter": "DEBUG", "level_filter": "ERROR" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        let logger = config.logger_config.unwrap();
        assert_eq!(logger.app_level_filter, LevelFilter::Debug);
        assert_eq!(
            logger.directives(),
            "error,xscript=debug,xscript_core=debug,xscript_ext=debug"
        );
    }

    #[test]
    fn builder_overrides_file_values() {
        let json = r#"{ "vm_config": { "step_limit": 10 } }"#;
        let config = AppConfigBuilder::from_config(serde_json::from_str(json).unwrap())
            .with_vm_config(VmConfig { step_limit: 0 })
            .get();
        assert_eq!(config.vm_config, Some(VmConfig { step_limit: 0 }));
        assert_eq!(config.app_name, "xscript");
    }

    #[test]
    fn default_builder_yields_default_config() {
        assert_eq!(AppConfigBuilder::default().get(), AppConfig::default());
    }

    #[test]
    fn reading_a_missing_file_fails() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/does-not-exist.json"));
        assert!(AppConfigReader::read_app_json(path).is_err());
    }
}
