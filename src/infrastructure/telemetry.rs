//! 日志初始化
//!
//! `RUST_LOG` 存在时优先于配置中的级别。

use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::LoggingSettings;

/**
 * 安装全局 tracing 订阅者
 *
 * # 参数
 * * `level` - 默认过滤指令（如 `info`、`lexicon_search=debug`）
 * * `json` - 是否输出 JSON 行
 *
 * # 返回
 * 是否由本次调用完成安装；已有订阅者时返回 false
 */
pub fn init_tracing(level: &str, json: bool) -> bool {
    let filter = build_filter(level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %level, json, "Tracing initialized");
    }
    installed
}

/**
 * 按日志配置初始化
 */
pub fn init_from_settings(settings: &LoggingSettings) -> bool {
    init_tracing(&settings.level, settings.json)
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
