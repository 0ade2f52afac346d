use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/**
 * 引擎错误类型 - 使用 miette 提供用户友好的错误诊断
 *
 * 模式编译失败不在此列：编译失败会静默降级为子串匹配。
 */
#[derive(Error, Debug, Diagnostic)]
pub enum LexiconError {
    #[error("Invalid request: {0}")]
    #[diagnostic(
        code(lexicon::invalid_request),
        help("Provide a non-empty query text")
    )]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(lexicon::io_error))]
    Io(#[from] std::io::Error),

    #[error("Failed to parse entry '{key}': {message}")]
    #[diagnostic(
        code(lexicon::entry_parse_error),
        help("The entry document does not match the expected entry shape")
    )]
    EntryParse { key: String, message: String },

    #[error("Corpus error: {message}")]
    #[diagnostic(
        code(lexicon::corpus_error),
        help("Ensure the corpus location exists and is readable")
    )]
    Corpus {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(lexicon::config_error))]
    Config(String),
}

impl LexiconError {
    /**
     * 创建无效请求错误
     */
    pub fn invalid_request(message: impl Into<String>) -> Self {
        LexiconError::InvalidRequest(message.into())
    }

    /**
     * 创建条目解析错误
     */
    pub fn entry_parse(key: impl Into<String>, message: impl Into<String>) -> Self {
        LexiconError::EntryParse {
            key: key.into(),
            message: message.into(),
        }
    }

    /**
     * 创建语料库错误
     */
    pub fn corpus(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        LexiconError::Corpus {
            message: message.into(),
            path,
        }
    }

    /**
     * 为错误添加上下文信息
     */
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let context = context.into();
        match self {
            LexiconError::Corpus { message, path } => LexiconError::Corpus {
                message: format!("{}: {}", context, message),
                path,
            },
            LexiconError::Config(message) => {
                LexiconError::Config(format!("{}: {}", context, message))
            }
            other => other,
        }
    }
}

/**
 * 统一结果类型
 */
pub type Result<T> = std::result::Result<T, LexiconError>;

/**
 * 将 eyre::Error 转换为配置错误（配置加载内部使用 eyre 传播上下文）
 */
pub fn eyre_to_config_error(error: eyre::Error) -> LexiconError {
    LexiconError::Config(format!("{:#}", error))
}
