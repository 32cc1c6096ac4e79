//! 配置基础设施
//!
//! 配置来源依次为: `CATALOG_CONFIG` 指定的文件、`catalog.toml`、`config/catalog.toml`、默认值，
//! 然后应用 `CATALOG_*` 环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";
const CONFIG_PATHS: [&str; 2] = ["catalog.toml", "./config/catalog.toml"];
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 服务配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_address: String,
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 商品目录配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 允许的分类，启动后不可修改
    pub categories: Vec<String>,
    /// 启动时是否写入示例商品
    pub seed_sample_data: bool,
    /// 未知的 sort_by 是否直接报错
    pub strict_sort: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            categories: ["Electronics", "Accessories", "Software", "Books", "Gaming"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            seed_sample_data: true,
            strict_sort: false,
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid value for {name}: {value}")]
    Env { name: &'static str, value: String },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("{}: {}", path.as_ref().display(), e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 用 `CATALOG_*` 环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_address) = lookup("CATALOG_BIND_ADDRESS") {
            self.http.bind_address = bind_address;
        }
        if let Some(port) = lookup("CATALOG_PORT") {
            self.http.port = port.trim().parse().map_err(|_| ConfigError::Env {
                name: "CATALOG_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(level) = lookup("CATALOG_LOG_LEVEL") {
            self.logging.level = level.trim().to_lowercase();
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("http.port must be greater than 0".into()));
        }
        if self.http.bind_address.trim().is_empty() {
            return Err(ConfigError::Validation("http.bind_address cannot be empty".into()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "http.timeout_seconds must be greater than 0".into(),
            ));
        }

        if self.catalog.categories.is_empty() {
            return Err(ConfigError::Validation(
                "catalog.categories needs at least one category".into(),
            ));
        }
        for (i, category) in self.catalog.categories.iter().enumerate() {
            if category.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "catalog.categories contains an empty name".into(),
                ));
            }
            if self.catalog.categories[..i].contains(category) {
                return Err(ConfigError::Validation(format!(
                    "catalog.categories lists {} more than once",
                    category
                )));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid logging.level: {}, expected one of {:?}",
                self.logging.level, VALID_LOG_LEVELS
            )));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}

/// 从文件或默认值加载配置，应用环境变量覆盖并校验
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => Config::load_from_file(path)?,
        Err(_) => match CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(path) => Config::load_from_file(path)?,
            None => Config::default(),
        },
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
