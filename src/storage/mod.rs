//! Configuration storage.

pub mod config;

pub use config::{
    get_config_path, load_config, read_config, save_config, AppConfig, CatalogSettings,
    ConfigError, OracleSettings, ToolSettings, TranslateSettings,
};
