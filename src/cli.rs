use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "seven-seas")]
#[command(about = "Storage, queue and HTTP relay functions", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` so the binary can be used directly as a function bootstrap
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a handler inside the function runtime loop
    Serve(ServeArgs),
    /// Run a handler once against an event document and print the result
    Invoke(InvokeArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve(ServeArgs::default())
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// Handler to run (`village` or `tower`); falls back to `$_HANDLER`
    pub handler: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct InvokeArgs {
    /// Handler to run (`village` or `tower`)
    pub handler: String,

    /// Path to the event JSON, `-` for stdin
    #[arg(long, short, default_value = "-")]
    pub event: String,

    /// Capture queue publishes in memory instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}
