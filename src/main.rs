mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use seven_seas::config::{self, Config};
use seven_seas::handlers::{Collaborators, HandlerRegistry};
use seven_seas::messaging::MemoryProducer;
use seven_seas::observability;
use seven_seas::runtime::{self, AnyError};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    let config = Config::load()?;
    observability::init_tracing(&config.telemetry)?;
    info!(path = %config::config_path().display(), "Configuration loaded");

    match cli.command.unwrap_or_default() {
        Commands::Serve(args) => {
            let name = runtime::resolve_handler_name(args.handler)?;
            let collaborators = Collaborators::connect(&config).await?;
            let registry = HandlerRegistry::with_collaborators(&config, collaborators);

            runtime::serve(&registry, &name).await?;
        }
        Commands::Invoke(args) => {
            let memory = Arc::new(MemoryProducer::new());
            let collaborators = if args.dry_run {
                Collaborators::with_producer(&config, memory.clone())?
            } else {
                Collaborators::connect(&config).await?
            };
            let registry = HandlerRegistry::with_collaborators(&config, collaborators);

            let event = runtime::read_event(&args.event).await?;
            let result = runtime::invoke(&registry, &args.handler, event).await?;

            for message in memory.published() {
                info!(destination = %message.destination, body = %message.body, "Dry-run publish");
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
