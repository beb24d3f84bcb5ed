//! ukiyo CLI binary.
//!
//! This binary provides command-line access to ukiyo's functionality:
//! - Generate stories with provider fallback and dialogue
//! - Show and list stored stories
//! - Illustrate stories panel by panel

use clap::Parser;
use ukiyo::{ObservabilityConfig, UkiyoConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, generate, illustrate, list, migrate, show};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Pick up API keys and DATABASE_URL from .env
    let _ = dotenvy::dotenv();

    let mut observability = ObservabilityConfig::default().with_json_logs(cli.json_logs);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability(observability)?;

    let config = UkiyoConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            prompt,
            illustrate: illustrate_dir,
            format,
            memory,
        } => {
            generate(&config, &prompt, memory, illustrate_dir.as_deref(), format).await?;
        }

        Commands::Show { id, format } => {
            show(&config, id, format).await?;
        }

        Commands::List { limit, format } => {
            list(&config, limit, format).await?;
        }

        Commands::Illustrate { id, out } => {
            illustrate(&config, id, &out).await?;
        }

        Commands::Migrate => {
            migrate(&config).await?;
        }
    }

    Ok(())
}
