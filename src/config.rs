//! 命令行与环境变量配置

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::model::error::CheckError;
use crate::model::store::{LocaleStore, DEFAULT_FILE_NAME};

#[derive(Debug, Parser)]
#[command(name = "fanyi_jiaoyan", version, about = "翻译文件校对工具：补全、裁剪、校验与规范排序")]
pub struct Cli {
    /// 输出更多日志（-v 为 debug）
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// 只输出警告和错误日志
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// 报告格式
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 以基准语言为模板补全并裁剪其他语言文件，然后规范化写回
    Check {
        #[command(flatten)]
        locales: LocaleArgs,
        /// 用当前基准文本刷新已有的占位翻译（默认保留旧占位，不做刷新）
        #[arg(long)]
        refresh_placeholders: bool,
        /// 任一语言失败后不再处理剩余语言
        #[arg(long)]
        fail_fast: bool,
        /// 并行处理的语言数
        #[arg(short, long, env = "FANYI_JOBS", default_value_t = 1)]
        jobs: usize,
        /// 只报告，不写文件
        #[arg(long)]
        dry_run: bool,
    },
    /// 只读校验：基准文件已排序，且所有语言与基准结构一致、无占位翻译
    Validate {
        #[command(flatten)]
        locales: LocaleArgs,
    },
    /// 将 JSON 文件改写为规范排序形式（内容不变则不写）
    Sort {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// 只检查是否已排序，不写文件
        #[arg(long)]
        check: bool,
        /// 接受任意 JSON，而不仅是翻译树
        #[arg(long)]
        any_json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct LocaleArgs {
    /// 语言文件根目录
    #[arg(env = "FANYI_LOCALES_ROOT", default_value = "src/locales")]
    pub root: PathBuf,
    /// 基准语言
    #[arg(env = "FANYI_BASE_LANGUAGE", default_value = "en")]
    pub base_language: String,
    /// 每个语言目录下的文件名
    #[arg(long, env = "FANYI_FILE_NAME", default_value = DEFAULT_FILE_NAME)]
    pub file_name: String,
}

impl LocaleArgs {
    pub fn open_store(&self) -> Result<LocaleStore, CheckError> {
        LocaleStore::new(&self.root, &self.file_name)
    }
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::WARN,
            (false, 0) => tracing::Level::INFO,
            (false, 1) => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_defaults() {
        let cli = Cli::try_parse_from(["fanyi_jiaoyan", "validate"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::INFO);
        let Command::Validate { locales } = cli.command else {
            panic!("应该解析为 validate");
        };
        assert_eq!(locales.root, PathBuf::from("src/locales"));
        assert_eq!(locales.base_language, "en");
        assert_eq!(locales.file_name, DEFAULT_FILE_NAME);
    }

    #[test]
    fn test_check_arguments() {
        let cli = Cli::try_parse_from([
            "fanyi_jiaoyan",
            "-v",
            "check",
            "./locale",
            "nl",
            "--jobs",
            "4",
            "--fail-fast",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Check { locales, jobs, fail_fast, refresh_placeholders, dry_run } => {
                assert_eq!(locales.root, PathBuf::from("./locale"));
                assert_eq!(locales.base_language, "nl");
                assert_eq!(jobs, 4);
                assert!(fail_fast);
                assert!(!refresh_placeholders);
                assert!(!dry_run);
            }
            other => panic!("意外的子命令: {other:?}"),
        }
    }

    #[test]
    fn test_sort_requires_files() {
        assert!(Cli::try_parse_from(["fanyi_jiaoyan", "sort"]).is_err());
    }
}
