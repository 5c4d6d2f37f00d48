mod index;

use std::process::ExitCode;

use anyhow::Result;
use camino::Utf8Path;
use clap::Subcommand;
use langws_conf::Settings;

use crate::args::Args;

pub trait Command {
    async fn execute(
        &self,
        args: &Args,
        project_root: &Utf8Path,
        settings: &Settings,
    ) -> Result<ExitCode>;
}

#[derive(Debug, Subcommand)]
pub enum LangwsCommand {
    /// Discover, load and build every document in the given workspace folders
    Index(self::index::Index),
}

impl Command for LangwsCommand {
    async fn execute(
        &self,
        args: &Args,
        project_root: &Utf8Path,
        settings: &Settings,
    ) -> Result<ExitCode> {
        match self {
            LangwsCommand::Index(index) => index.execute(args, project_root, settings).await,
        }
    }
}
