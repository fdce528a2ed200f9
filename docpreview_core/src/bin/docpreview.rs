use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use docpreview_backends::CompilerCli;
use docpreview_core::{
    api::{DocsSnapshot, PackageName},
    baseline::{default_registry, BaselineService},
    compute_content_diff,
    logging::{self, Profile},
    parse_diff_output,
    preview::Previewer,
    project::Project,
};

#[derive(Parser)]
#[command(name = "docpreview")]
#[command(about = "Preview package documentation and diff it against the latest release")]
#[command(version)]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, env = "DOCPREVIEW_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Development,
            LogFormat::Json => Self::Production,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Build docs for a local package and diff them against the latest release.
    Preview {
        /// Directory inside the package.
        #[arg(long, default_value = ".")]
        dir: Utf8PathBuf,
    },
    /// Parse a compiler `diff` report (stdin when FILE is omitted).
    ApiDiff {
        file: Option<Utf8PathBuf>,
    },
    /// Compare two docs.json files and, optionally, two READMEs.
    ContentDiff {
        #[arg(long)]
        published: Utf8PathBuf,
        #[arg(long)]
        current: Utf8PathBuf,
        #[arg(long)]
        published_readme: Option<Utf8PathBuf>,
        #[arg(long)]
        current_readme: Option<Utf8PathBuf>,
    },
    /// Print the latest published version of a package.
    Latest {
        /// Package name, `author/project`.
        package: PackageName,
    },
    /// List configured package sources in lookup order.
    Sources,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format.into());

    match cli.command {
        Command::Preview { dir } => {
            let project = Project::open(&dir)
                .with_context(|| format!("failed to open project at {dir}"))?;
            let previewer = Previewer::new(
                project,
                Arc::new(CompilerCli::new()),
                BaselineService::new(default_registry()),
            );
            print_json(&previewer.build()?)
        }
        Command::ApiDiff { file } => {
            let raw = match file {
                Some(path) => read_text(&path)?,
                None => {
                    let mut raw = String::new();
                    std::io::stdin()
                        .read_to_string(&mut raw)
                        .context("failed to read diff report from stdin")?;
                    raw
                }
            };
            print_json(&parse_diff_output(&raw))
        }
        Command::ContentDiff {
            published,
            current,
            published_readme,
            current_readme,
        } => {
            let published = read_docs(&published)?;
            let current = read_docs(&current)?;
            let published_readme = published_readme.as_ref().map(read_text).transpose()?;
            let current_readme = current_readme.as_ref().map(read_text).transpose()?;
            print_json(&compute_content_diff(
                Some(published.as_slice()),
                Some(current.as_slice()),
                published_readme.as_deref(),
                current_readme.as_deref(),
            ))
        }
        Command::Latest { package } => {
            let service = BaselineService::new(default_registry());
            print_json(&service.latest_version(&package))
        }
        Command::Sources => {
            let service = BaselineService::new(default_registry());
            print_json(&service.summaries())
        }
    }
}

fn read_text(path: &Utf8PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

fn read_docs(path: &Utf8PathBuf) -> Result<DocsSnapshot> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).with_context(|| format!("failed to decode docs from {path}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{rendered}");
    Ok(())
}
