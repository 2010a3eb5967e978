mod action;
mod app;
mod application_config;
mod cli;
mod components;
mod config;
mod form;
mod logging;
mod page;
mod report;
mod submission;
mod tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::initialize_logging()?;
    logging::initialize_panic_handler()?;

    tracing::debug!("starting app");

    cli::run().await?;

    Ok(())
}
