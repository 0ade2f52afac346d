//! 配置管理基础设施层
//!
//! 三个配置段：
//! - search: 扫描批大小、摘要数量、上下文半径、查询长度上限
//! - corpus: 条目目录与扩展名
//! - logging: 日志级别与输出格式

use eyre::{Context, Result as EyreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{eyre_to_config_error, LexiconError, Result};
use crate::search_engine::ScannerConfig;
use crate::storage::FileCorpus;

/// 全局配置根结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub search: SearchSettings,

    #[validate(nested)]
    pub corpus: CorpusSettings,

    #[validate(nested)]
    pub logging: LoggingSettings,
}

/// 搜索配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchSettings {
    #[validate(range(min = 1, max = 1000))]
    pub batch_size: usize,

    #[validate(range(min = 1, max = 100))]
    pub max_excerpts: usize,

    #[validate(range(min = 1, max = 1000))]
    pub context_radius: usize,

    #[validate(range(min = 1, max = 10000))]
    pub max_query_length: usize,
}

/// 语料库配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CorpusSettings {
    #[validate(length(min = 1, max = 500))]
    pub data_dir: String,

    #[validate(length(min = 1, max = 16))]
    pub extension: String,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    #[validate(length(min = 1, max = 100))]
    pub level: String,

    pub json: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let scanner = ScannerConfig::default();
        Self {
            batch_size: scanner.batch_size,
            max_excerpts: scanner.max_excerpts,
            context_radius: scanner.context_radius,
            max_query_length: scanner.max_query_length,
        }
    }
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            data_dir: "./data/entries".to_string(),
            extension: "json".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// 从 TOML 文件加载配置
    ///
    /// # Errors
    /// 如果文件不存在或格式错误，返回错误
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_toml(path.as_ref()).map_err(eyre_to_config_error)
    }

    /// 从 JSON 文件加载配置
    ///
    /// # Errors
    /// 如果文件不存在或格式错误，返回错误
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_json(path.as_ref()).map_err(eyre_to_config_error)
    }

    /// 加载并验证配置
    ///
    /// 未指定路径时使用默认配置；`.json` 按 JSON 解析，其余按 TOML 解析。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            None => {
                tracing::debug!("No config file given, using defaults");
                Self::default()
            }
            Some(path) if is_json(path) => Self::from_json_file(path)?,
            Some(path) => Self::from_toml_file(path)?,
        };
        config.validate_all()?;
        Ok(config)
    }

    /// 验证所有配置段
    pub fn validate_all(&self) -> Result<()> {
        self.validate()
            .map_err(|e| LexiconError::Config(format!("Validation failed: {}", e)))
    }

    /// 扫描器配置
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            batch_size: self.search.batch_size,
            max_excerpts: self.search.max_excerpts,
            context_radius: self.search.context_radius,
            max_query_length: self.search.max_query_length,
        }
    }

    /// 按配置打开文件语料库
    pub fn file_corpus(&self) -> FileCorpus {
        FileCorpus::new(PathBuf::from(&self.corpus.data_dir), self.corpus.extension.clone())
    }

    fn read_toml(path: &Path) -> EyreResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

        tracing::info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn read_json(path: &Path) -> EyreResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?;

        tracing::info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
