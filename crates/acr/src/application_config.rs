use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use acr_config_derive::AppConfig;
use acr_review_client::{http::DEFAULT_ENDPOINT, models::DEFAULT_LANGUAGE};
use anyhow::Context;

pub const CONFIG_TEMPLATE: &str = r#"// acr configuration
//
// Credentials are better kept out of this file:
//   export ACR_GITHUB_TOKEN=...
//   export ACR_LLM_API_KEY=...
config {
    endpoint "https://automated-code-review-woa.onrender.com/review"
    language "JavaScript"
}
"#;

#[derive(AppConfig, Clone)]
pub struct InnerApplicationConfig {
    /// Review service endpoint
    pub endpoint: Option<String>,
    /// Language label sent along with each review request
    pub language: Option<String>,
    /// GitHub token handed to the review service
    pub github_token: Option<String>,
    /// API key for the language model used by the review service
    pub llm_api_key: Option<String>,
}

#[derive(Clone)]
pub struct ApplicationConfig {
    config: InnerApplicationConfig,
    config_file: Option<PathBuf>,
}

impl ApplicationConfig {
    pub fn new(layers: inner_application_config::InnerApplicationConfig) -> anyhow::Result<Self> {
        let config_file = layers.config_file().map(Path::to_path_buf);
        let config = InnerApplicationConfig::resolve(layers)?;

        Ok(Self {
            config,
            config_file,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn language(&self) -> &str {
        self.config.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}

impl Deref for ApplicationConfig {
    type Target = InnerApplicationConfig;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

/// Writes [`CONFIG_TEMPLATE`] to `path` unless a file is already there.
/// Returns whether anything was written.
pub async fn write_template(path: &Path) -> anyhow::Result<bool> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    tokio::fs::write(path, CONFIG_TEMPLATE)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(true)
}

#[cfg(test)]
mod test {
    use clap::Args;

    use super::*;

    /// Parses `args` with `env` standing in for the process environment.
    fn load_with_env(args: &[&str], env: &[(&str, &str)]) -> anyhow::Result<ApplicationConfig> {
        let mut matches =
            inner_application_config::InnerApplicationConfig::augment_args(clap::Command::new("acr"))
                .try_get_matches_from(std::iter::once("acr").chain(args.iter().copied()))?;

        let source = |key: &str| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        };
        let layers = inner_application_config::InnerApplicationConfig::from_matches_with_env(
            &mut matches,
            &source,
        );

        ApplicationConfig::new(layers)
    }

    fn load(args: &[&str]) -> anyhow::Result<ApplicationConfig> {
        load_with_env(args, &[])
    }

    #[test]
    fn test_reads_kdl_config_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("acr.kdl");
        std::fs::write(
            &path,
            r#"
            config {
                endpoint "http://localhost:8080/review"
                github_token "ghp_from_file"
            }
            "#,
        )?;

        let config = load(&["--config-file", path.to_str().unwrap()])?;

        assert_eq!("http://localhost:8080/review", config.endpoint());
        assert_eq!(Some("ghp_from_file"), config.github_token.as_deref());
        assert_eq!(Some(path.as_path()), config.config_file());

        Ok(())
    }

    #[test]
    fn test_flags_override_config_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("acr.kdl");
        std::fs::write(&path, r#"config { endpoint "http://from-file/review"; }"#)?;

        let config = load(&[
            "--config-file",
            path.to_str().unwrap(),
            "--endpoint",
            "http://from-flag/review",
        ])?;

        assert_eq!("http://from-flag/review", config.endpoint());

        Ok(())
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("does-not-exist.kdl");

        let config = load(&["--config-file", path.to_str().unwrap()])?;

        assert_eq!(None, config.github_token);
        assert!(!config.endpoint().is_empty());

        Ok(())
    }

    #[test]
    fn test_env_overrides_config_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("acr.kdl");
        std::fs::write(&path, r#"config { llm_api_key "sk-from-file"; }"#)?;

        let config = load_with_env(
            &["--config-file", path.to_str().unwrap()],
            &[("ACR_LLM_API_KEY", "sk-from-env")],
        )?;

        assert_eq!(Some("sk-from-env"), config.llm_api_key.as_deref());

        Ok(())
    }

    #[test]
    fn test_flags_override_env() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("acr.kdl");

        let config = load_with_env(
            &[
                "--config-file",
                path.to_str().unwrap(),
                "--github-token",
                "ghp_flag",
            ],
            &[("ACR_GITHUB_TOKEN", "ghp_env"), ("ACR_LANGUAGE", "Rust")],
        )?;

        assert_eq!(Some("ghp_flag"), config.github_token.as_deref());
        assert_eq!("Rust", config.language());

        Ok(())
    }

    #[tokio::test]
    async fn test_template_is_valid_config() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("acr.kdl");

        assert!(write_template(&path).await?);
        assert!(!write_template(&path).await?);

        let config = load(&["--config-file", path.to_str().unwrap()])?;

        assert_eq!(DEFAULT_ENDPOINT, config.endpoint());

        Ok(())
    }
}
