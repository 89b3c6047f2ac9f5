use crate::utils::errors::{ButtonAppError, Result};
use serde::Deserialize;
use std::{fmt, path::PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_LOG_FILTER: &str = "button_app=debug,mentra_sdk=debug,tower_http=debug";

#[derive(Clone)]
pub struct AppConfig {
    pub package_name: String,
    pub api_key: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// 配置文件内容，所有字段可选，环境变量优先
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    package_name: Option<String>,
    api_key: Option<String>,
    port: Option<u16>,
    public_dir: Option<PathBuf>,
    logging: Option<LoggingConfig>,
}

impl AppConfig {
    /// Load from `CONFIG_PATH` (optional TOML) and the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 首先尝试从配置文件加载
        let file = match lookup("CONFIG_PATH") {
            Some(path) => Self::read_file(&path)?,
            None => FileConfig::default(),
        };

        // 环境变量覆盖配置文件设置
        let package_name = lookup("PACKAGE_NAME")
            .or(file.package_name)
            .ok_or_else(|| {
                ButtonAppError::Configuration("PACKAGE_NAME is not set".to_string())
            })?;
        let api_key = lookup("MENTRAOS_API_KEY")
            .or(file.api_key)
            .ok_or_else(|| {
                ButtonAppError::Configuration("MENTRAOS_API_KEY is not set".to_string())
            })?;

        // 端口无法解析时回退到默认值
        let port = lookup("PORT")
            .and_then(|port| port.trim().parse::<u16>().ok())
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let public_dir = lookup("PUBLIC_DIR")
            .map(PathBuf::from)
            .or(file.public_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));

        let logging = file.logging.unwrap_or_default();

        Ok(Self {
            package_name,
            api_key,
            port,
            public_dir,
            logging,
        })
    }

    fn read_file(path: &str) -> Result<FileConfig> {
        config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml))
            .build()
            .and_then(|settings| settings.try_deserialize::<FileConfig>())
            .map_err(|e| {
                ButtonAppError::Configuration(format!(
                    "Failed to load config file {}: {}",
                    path, e
                ))
            })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("package_name", &self.package_name)
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .field("public_dir", &self.public_dir)
            .field("logging", &self.logging)
            .finish()
    }
}
