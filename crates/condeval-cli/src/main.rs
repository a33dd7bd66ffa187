//! CLI entry point for condeval.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `condeval-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use condeval_app::{
    CheckInput, ExplainOutput, parse_report_json, render_markdown, run_check, run_explain,
    runtime_error_report, verdict_exit_code, write_report, write_text,
};
use condeval_settings::Overrides;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "condeval",
    version,
    about = "Condition evaluation and scenario checks for CloudFormation-style templates"
)]
struct Cli {
    /// Path to the suite config TOML (missing file means defaults, no scenarios).
    #[arg(long, default_value = "condeval.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn).
    #[arg(long)]
    profile: Option<String>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every scenario against a template and write artifacts.
    Check {
        /// Template to evaluate (YAML or JSON).
        #[arg(long)]
        template: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/condeval/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/condeval/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/condeval/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "scenario.feature") or code (e.g., "feature_mismatch") to explain.
        identifier: String,
    },

    /// Print the JSON Schema of the report.
    Schema,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref template,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, template, report_out, write_markdown, markdown_out),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::Schema => cmd_schema(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_check(
    cli: &Cli,
    template: &Utf8Path,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let template_text = std::fs::read_to_string(template)
            .with_context(|| format!("read template: {template}"))?;

        // Load config if present; missing file is allowed (defaults apply).
        let config_text = if cli.config.exists() {
            std::fs::read_to_string(&cli.config)
                .with_context(|| format!("read config: {}", cli.config))?
        } else {
            tracing::info!(config = %cli.config, "no config file; using defaults");
            String::new()
        };

        let input = CheckInput {
            template_path: template.as_str(),
            template_text: &template_text,
            config_text: &config_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
            },
        };

        let output = run_check(input)?;

        write_report(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&output.report);
            write_text(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Err(write_err) = write_report(report_out, &report) {
                tracing::warn!(error = %write_err, "could not write runtime error report");
            }
            eprintln!("condeval error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", condeval_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                condeval_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_schema() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(condeval_types::CondevalReport);
    let text = serde_json::to_string_pretty(&schema).context("serialize schema")?;
    println!("{text}");
    Ok(())
}
