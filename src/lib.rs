pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod graph;
pub mod loader;
pub mod models;
pub mod node;
pub mod xml;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
pub use error::NormalizeError;
pub use models::AnimeRecord;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Show { path } => cli::cmd_show(&path).await,
        Commands::Export {
            path,
            format,
            output,
        } => cli::cmd_export(&config, &path, format, output).await,
        Commands::Graph { paths, output } => cli::cmd_graph(&paths, output).await,
        Commands::Init => cli::cmd_init(),
    }
}
