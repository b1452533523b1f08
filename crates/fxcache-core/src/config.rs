use crate::artifact::KindFilter;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_CACHE_ROOT: &str = "C:/Houdini_Caches";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub cache_root: String,
    pub default_filter: KindFilter,
    pub ignore_patterns: Vec<String>,
    pub create_missing_root: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_root: DEFAULT_CACHE_ROOT.to_string(),
            default_filter: KindFilter::All,
            ignore_patterns: Vec::new(),
            create_missing_root: true,
        }
    }
}

/// `Config.toml` if present, overridden by `FXCACHE_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("cache_root", DEFAULT_CACHE_ROOT)?
        .set_default("default_filter", "All")?
        .set_default("ignore_patterns", Vec::<String>::new())?
        .set_default("create_missing_root", true)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("FXCACHE")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
