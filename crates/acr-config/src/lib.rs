use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "ACR";
pub const CONFIG_HOME_ENV: &str = "ACR_CONFIG_HOME";
pub const CONFIG_FILE_NAME: &str = "acr.kdl";

#[derive(thiserror::Error, Debug)]
pub enum EnvError {
    #[error("env error: {0}")]
    EnvError(#[source] anyhow::Error),
}

/// Looks up a variable by its full name, e.g. `ACR_ENDPOINT`.
pub type EnvSource<'a> = &'a dyn Fn(&str) -> Option<String>;

pub trait Env {
    fn set_from_env_source(&mut self, source: EnvSource<'_>) -> Result<(), EnvError>;

    fn set_from_env(&mut self) -> Result<(), EnvError> {
        self.set_from_env_source(&process_env)
    }
}

/// The process environment as an [`EnvSource`].
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigFileError {
    #[error("config file error: {0}")]
    ConfigFileError(#[source] anyhow::Error),
}

pub trait ConfigFile {
    fn set_from_config_file(&mut self, config_file: &Path) -> Result<(), ConfigFileError>;
}

/// Name of the environment variable overriding `field`, e.g. `ACR_ENDPOINT`.
pub fn env_key(shouty_field: &str) -> String {
    format!("{ENV_PREFIX}_{shouty_field}")
}

/// `$ACR_CONFIG_HOME`, falling back to the platform config directory.
pub fn config_home() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var(CONFIG_HOME_ENV) {
        return Ok(PathBuf::from(home));
    }

    let project = directories::ProjectDirs::from("io", "acr", "acr")
        .ok_or(anyhow::anyhow!("failed to find a home directory for config"))?;

    Ok(project.config_dir().to_path_buf())
}

pub fn default_config_file() -> anyhow::Result<PathBuf> {
    Ok(config_home()?.join(CONFIG_FILE_NAME))
}
