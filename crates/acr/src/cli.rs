use acr_review_client::{
    http::HttpReviewGatewayOptions, models::SubmissionRequest, ReviewClient,
};
use clap::{Args, Parser, Subcommand};

use crate::{
    app::App,
    application_config::{inner_application_config, write_template, ApplicationConfig},
    form::ReviewForm,
    report::{write_report, OutputFormat},
    submission::ReviewSubmitter,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Command {
    #[command(flatten)]
    config: inner_application_config::InnerApplicationConfig,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter configuration file
    Init,
    /// Open the interactive review form (default)
    Review,
    /// Submit a single review request and print the result
    Submit(SubmitArgs),
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Repository owner, e.g. krishnaag23
    #[arg(long, default_value = "")]
    owner: String,
    /// Repository name
    #[arg(long, default_value = "")]
    repo: String,
    #[arg(long, default_value = "")]
    repo_id: String,
    #[arg(long, default_value = "")]
    pr_id: String,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

impl SubmitArgs {
    fn request(&self, config: &ApplicationConfig) -> SubmissionRequest {
        SubmissionRequest {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            repo_id: self.repo_id.clone(),
            pr_id: self.pr_id.clone(),
            language: config.language().to_string(),
            github_token: config.github_token.clone().unwrap_or_default(),
            llm_api_key: config.llm_api_key.clone().unwrap_or_default(),
        }
    }
}

fn review_client(config: &ApplicationConfig) -> anyhow::Result<ReviewClient> {
    tracing::debug!(endpoint = config.endpoint(), "using review endpoint");

    ReviewClient::http(HttpReviewGatewayOptions::default().uri(config.endpoint()))
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Command::parse();
    let config = ApplicationConfig::new(cli.config)?;

    match cli.command.unwrap_or(Commands::Review) {
        Commands::Init => {
            let path = match config.config_file() {
                Some(path) => path.to_path_buf(),
                None => acr_config::default_config_file()?,
            };

            if write_template(&path).await? {
                println!("wrote config template to {}", path.display());
            } else {
                println!("config already exists at {}", path.display());
            }
        }
        Commands::Review => {
            tracing::info!("starting tui");
            let submitter = ReviewSubmitter::new(review_client(&config)?);
            let form = ReviewForm::from_config(&config);

            match App::default().register_pages(submitter, form).await {
                Ok(a) => {
                    if let Err(e) = a.run().await {
                        tracing::error!("{}", e);
                        return Err(e);
                    }
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    return Err(e);
                }
            }
            tracing::info!("stopping tui");
        }
        Commands::Submit(args) => {
            let request = args.request(&config);
            if let Err(errors) = request.validate() {
                for error in errors.iter() {
                    eprintln!("{}: {}", error.field, error.message);
                }
                anyhow::bail!(errors);
            }

            let client = review_client(&config)?;
            let result = match client.submit(&request).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("{}", e);
                    anyhow::bail!(e.user_message());
                }
            };

            write_report(&mut std::io::stdout().lock(), &result, args.format)?;
        }
    }

    Ok(())
}
