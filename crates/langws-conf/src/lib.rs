use camino::Utf8Path;
use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
}

/// A language declared in configuration, in addition to any the host registers.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    pub id: String,
    /// File-name suffixes, with or without the leading `.`.
    pub extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    /// Directory names skipped during traversal, on top of the built-in ones.
    pub exclude_dirs: Vec<String>,
    pub languages: Vec<LanguageConfig>,
}

impl Settings {
    pub fn new(project_root: &Utf8Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("com.github", "langws", "langws")
            .map(|proj_dirs| proj_dirs.config_dir().join("langws.toml"));

        let user_config_file = user_config_file
            .as_deref()
            .and_then(|path| Utf8Path::from_path(path));

        Self::load_from_paths(project_root, user_config_file)
    }

    fn load_from_paths(
        project_root: &Utf8Path,
        user_config_path: Option<&Utf8Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            tracing::debug!("Checking user config at {path}");
            builder = builder.add_source(
                File::from(path.as_std_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        for name in [".langws.toml", "langws.toml"] {
            builder = builder.add_source(
                File::from(project_root.join(name).as_std_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let config = builder.build()?;
        let settings: Self = config.try_deserialize()?;
        tracing::debug!(
            languages = settings.languages.len(),
            exclude_dirs = ?settings.exclude_dirs,
            "Loaded settings for {project_root}"
        );
        Ok(settings)
    }
}
