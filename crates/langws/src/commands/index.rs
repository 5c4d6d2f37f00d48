use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use langws_conf::Settings;
use langws_workspace::Document;
use langws_workspace::DocumentBuilder;
use langws_workspace::FileSystem;
use langws_workspace::Language;
use langws_workspace::LanguageRegistry;
use langws_workspace::OsFileSystem;
use langws_workspace::TextDocumentStore;
use langws_workspace::WorkspaceFolder;
use langws_workspace::WorkspaceHooks;
use langws_workspace::WorkspaceInitializer;

use crate::args::Args;
use crate::commands::Command;

#[derive(Debug, Parser)]
pub struct Index {
    /// Workspace folders to index. Defaults to the current directory.
    paths: Vec<Utf8PathBuf>,

    /// Recognize files with these suffixes (e.g. .lang,.langx), in addition to
    /// the languages declared in settings.
    #[arg(long = "extension", short = 'e', value_delimiter = ',')]
    extensions: Vec<String>,

    /// Skip directories with these names, in addition to the built-in ones.
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,
}

impl Index {
    fn folders(&self, project_root: &Utf8Path) -> Result<Vec<WorkspaceFolder>> {
        if self.paths.is_empty() {
            return Ok(vec![WorkspaceFolder::from_path(project_root)?]);
        }

        self.paths
            .iter()
            .map(|path| {
                let path = if path.is_relative() {
                    project_root.join(path)
                } else {
                    path.clone()
                };
                WorkspaceFolder::from_path(&path)
                    .with_context(|| format!("Invalid workspace folder {path}"))
            })
            .collect()
    }

    fn languages(&self, settings: &Settings) -> LanguageRegistry {
        let mut languages: LanguageRegistry = settings
            .languages
            .iter()
            .map(|language| Language::new(language.id.as_str(), &language.extensions))
            .collect();

        if !self.extensions.is_empty() {
            languages.register(Language::new("command-line", &self.extensions));
        }

        languages
    }
}

impl Command for Index {
    async fn execute(
        &self,
        args: &Args,
        project_root: &Utf8Path,
        settings: &Settings,
    ) -> Result<ExitCode> {
        let folders = self.folders(project_root)?;
        let languages = self.languages(settings);
        if languages.file_extensions().is_empty() {
            anyhow::bail!(
                "No file extensions configured; pass --extension or declare [[languages]] in langws.toml"
            );
        }

        let hooks = WorkspaceHooks::default().with_excluded_dirs(
            settings
                .exclude_dirs
                .iter()
                .chain(&self.exclude)
                .cloned(),
        );

        let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem);
        let store = Arc::new(TextDocumentStore::new(fs.clone()));
        let report = Arc::new(ReportBuilder {
            quiet: args.global.quiet,
        });

        WorkspaceInitializer::new(fs, languages, store, report)
            .with_hooks(hooks)
            .initialize_workspace(&folders)
            .await
            .context("Failed to initialize workspace")?;

        Ok(ExitCode::SUCCESS)
    }
}

/// Build step that prints every document it receives.
struct ReportBuilder {
    quiet: bool,
}

#[async_trait]
impl DocumentBuilder for ReportBuilder {
    async fn build(&self, documents: Vec<Document>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        let mut lines = 0;
        for document in &documents {
            lines += document.line_count();
            writeln!(stdout, "{}\t{}", document.location(), document.line_count())?;
        }

        let noun = if documents.len() == 1 {
            "document"
        } else {
            "documents"
        };
        writeln!(stdout, "Indexed {} {noun} ({lines} lines).", documents.len())?;
        Ok(())
    }
}
