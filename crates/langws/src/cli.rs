use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use langws_conf::Settings;

use crate::args::Args;
use crate::commands::Command;
use crate::commands::LangwsCommand;
use crate::logging;

/// The main CLI structure that defines the command-line interface
#[derive(Parser)]
#[command(name = "langws")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: LangwsCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments and execute the chosen command
pub async fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    let project_root = std::env::current_dir().context("Failed to read current directory")?;
    let project_root = Utf8PathBuf::from_path_buf(project_root)
        .map_err(|path| anyhow::anyhow!("Current directory {} is not UTF-8", path.display()))?;
    let settings = Settings::new(&project_root).context("Failed to load settings")?;

    let _guard = logging::init_tracing(&cli.args.global, settings.debug);
    tracing::debug!("Project root: {project_root}");

    cli.command.execute(&cli.args, &project_root, &settings).await
}
