//! 词典搜索 - 命令行入口
//!
//! 负责：
//! - 加载配置并初始化日志
//! - 打开文件语料库
//! - 执行搜索并以 JSON 输出结果

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use lexicon_search::infrastructure::telemetry::init_from_settings;
use lexicon_search::{AppConfig, CorpusScanner, LexiconError, SearchMode, SearchQuery};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lexicon-search")]
#[command(about = "Search a verb dictionary corpus and print matching roots with excerpts")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, or JSON by extension)
    #[arg(short, long, env = "LEXICON_CONFIG")]
    config: Option<PathBuf>,

    /// Corpus directory, overrides the configured one
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Treat the query as a pattern (\v vowel, \c consonant shortcuts)
    #[arg(short, long)]
    pattern: bool,

    /// Match case exactly
    #[arg(long)]
    case_sensitive: bool,

    /// Only match root identifiers
    #[arg(long)]
    roots_only: bool,

    /// Excerpts per matching root, overrides the configured limit
    #[arg(long)]
    max_excerpts: Option<usize>,

    /// Query text
    query: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), LexiconError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.corpus {
        config.corpus.data_dir = dir.display().to_string();
    }
    if let Some(max_excerpts) = cli.max_excerpts {
        config.search.max_excerpts = max_excerpts;
    }
    config.validate_all()?;

    init_from_settings(&config.logging);
    info!("Lexicon search v{}", env!("CARGO_PKG_VERSION"));

    let scanner = CorpusScanner::new(Arc::new(config.file_corpus()), config.scanner_config());

    let mode = if cli.roots_only {
        SearchMode::IdentifiersOnly
    } else {
        SearchMode::AllFields
    };
    let query = SearchQuery::new(cli.query)
        .with_pattern(cli.pattern)
        .with_case_sensitive(cli.case_sensitive)
        .with_mode(mode);

    let response = scanner.search(&query).await?;

    let json = serde_json::to_string_pretty(&response).map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}
