use clap::Parser;
use pairwatch::cli::{Cli, Commands};
use pairwatch::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        eprintln!(
            "Warning: {} not found, using default configuration",
            cli.config.display()
        );
        Config::default()
    };

    // Initialize telemetry
    pairwatch::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting live collection");
            args.execute(&config).await?;
        }
        Commands::Simulate(args) => {
            tracing::info!("Starting synthetic collection");
            args.execute(&config).await?;
        }
        Commands::Generate(args) => args.execute(&config).await?,
        Commands::Analyze(args) => args.execute(&config).await?,
        Commands::Stats(args) => args.execute(&config).await?,
        Commands::Export(args) => args.execute(&config).await?,
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
