//! 程序入口：初始化日志、解析命令行并分派到检查 / 校验 / 排序任务

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use fanyi_jiaoyan::config::{Cli, Command, OutputFormat};
use fanyi_jiaoyan::model::reconcile::ReconcileOptions;
use fanyi_jiaoyan::tasks::{self, CheckOptions, ErrorPolicy, SortOptions};

fn print_report(format: OutputFormat, text: String, json: serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{text}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let format = cli.format;
    let code = match cli.command {
        Command::Check { locales, refresh_placeholders, fail_fast, jobs, dry_run } => {
            let options = CheckOptions {
                reconcile: ReconcileOptions { refresh_placeholders },
                policy: if fail_fast { ErrorPolicy::AbortOnError } else { ErrorPolicy::ContinueOnError },
                jobs,
                dry_run,
            };
            let summary = tasks::run_check(&locales, &options)?;
            print_report(format, summary.render_text(), summary.to_json())?;
            summary.exit_code()
        }
        Command::Validate { locales } => {
            let summary = tasks::run_validate(&locales)?;
            print_report(format, summary.render_text(), summary.to_json())?;
            summary.exit_code()
        }
        Command::Sort { files, check, any_json } => {
            let summary = tasks::run_sort(&files, &SortOptions { check_only: check, any_json });
            print_report(format, summary.render_text(), summary.to_json())?;
            summary.exit_code()
        }
    };
    Ok(code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 日志写到 stderr，stdout 只留给报告
    let _ = SubscriberBuilder::default()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .try_init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("[!!] 错误: {e:#}");
            ExitCode::FAILURE
        }
    }
}
