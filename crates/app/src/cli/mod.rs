use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pixelphraser::{moderation::ModerationAction, queue::ModerationQueue, staging::ProductId};
use pixelphraser_app::{
    config::{CommercetoolsArgs, LoggingConfig},
    context::{AppContext, AppInitError},
    observability,
};

mod create;
mod list;
mod moderate;
mod review;
mod show;

#[derive(Debug, Parser)]
#[command(name = "pixelphraser", about = "Moderate generated product descriptions", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    commercetools: CommercetoolsArgs,

    /// Seed an in-memory platform from this YAML fixture instead of using commercetools
    #[arg(long, env = "PIXELPHRASER_FIXTURE", global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List descriptions awaiting moderation
    List,
    /// Show every locale of one pending description
    Show(show::ShowArgs),
    /// Publish a pending description to its product
    Accept(moderate::ModerateArgs),
    /// Discard a pending description
    Reject(moderate::ModerateArgs),
    /// Stage a new description for a product
    Create(create::CreateArgs),
    /// Step through the queue interactively
    Review,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_logging(&self.logging).map_err(|error| error.to_string())?;

        let context = self
            .context()
            .await
            .map_err(|error| format!("failed to initialise: {error}"))?;

        match self.command {
            Commands::List => list::run(&context).await,
            Commands::Show(args) => show::run(args, &context).await,
            Commands::Accept(args) => moderate::run(ModerationAction::Accept, args, &context).await,
            Commands::Reject(args) => moderate::run(ModerationAction::Reject, args, &context).await,
            Commands::Create(args) => create::run(args, &context).await,
            Commands::Review => review::run(&context).await,
        }
    }

    async fn context(&self) -> Result<AppContext, AppInitError> {
        if let Some(path) = &self.fixture {
            return AppContext::from_fixture(path).await;
        }

        let config = self
            .commercetools
            .clone()
            .into_config()
            .map_err(AppInitError::MissingSetting)?;

        AppContext::from_commercetools(config)
    }
}

/// Load the queue, failing with the load error message.
async fn loaded_queue(context: &AppContext) -> Result<ModerationQueue, String> {
    let queue = context.queue();

    queue
        .load()
        .await
        .map_err(|error| error.to_string())?;

    Ok(queue)
}

fn product_id(raw: &str) -> ProductId {
    ProductId::from(raw.trim())
}
