use std::path::PathBuf;

use anyhow::Context;
use directories::ProjectDirs;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    filter::EnvFilter, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, Layer,
};

pub const LOG_LEVEL_ENV: &str = "ACR_LOG_LEVEL";

fn default_filter() -> String {
    ["acr", "acr_review_client", "acr_suggestions"]
        .map(|target| format!("{target}=info"))
        .join(",")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_LEVEL_ENV))
        .unwrap_or_else(|_| EnvFilter::new(default_filter()))
}

/// Logs go to a file: stdout is owned by the terminal ui.
pub fn initialize_logging() -> anyhow::Result<PathBuf> {
    let project = match ProjectDirs::from("io", "acr", env!("CARGO_PKG_NAME")) {
        Some(p) => p.data_local_dir().to_path_buf(),
        None => PathBuf::from(".").join(".data"),
    };

    std::fs::create_dir_all(&project)
        .with_context(|| format!("failed to create log dir {}", project.display()))?;
    let log_path = project.join("acr.log");

    eprintln!("logging to: {}", log_path.display());

    let log_file = std::fs::File::create(&log_path).context("failed to create log file")?;
    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter());
    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(log_path)
}

pub fn initialize_panic_handler() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(r) = crate::tui::restore_terminal() {
            tracing::error!("Unable to exit Terminal: {:?}", r);
        }

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, print_msg, Metadata};
            let meta = Metadata {
                version: env!("CARGO_PKG_VERSION").into(),
                name: env!("CARGO_PKG_NAME").into(),
                authors: env!("CARGO_PKG_AUTHORS").replace(':', ", ").into(),
                homepage: env!("CARGO_PKG_HOMEPAGE").into(),
            };

            let file_path = handle_dump(&meta, panic_info);
            if let Err(e) = print_msg(file_path, &meta) {
                eprintln!("failed to print panic report: {e}");
            }
        }

        tracing::error!("Error: {}", panic_info);
    }));

    Ok(())
}
