use clap::Parser;
use cloudenv::args::Cli;
use cloudenv::commands::{self, CommandContext, OutputFormat};
use cloudenv::config::{self, AppConfig};
use cloudenv::error::AppError;
use cloudenv::logger;
use engine::common::errors::EnvironmentError;
use engine::discovery::MetadataClient;
use engine::resolver::EnvironmentResolver;
use engine::store::JsonFileStore;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = config::load_config(cli.config.as_deref())?;
    logger::setup_logger(config.logging())?;

    let store = open_store(&cli, &config)?;
    log::debug!("Using profile {}", store.path().display());

    let client = MetadataClient::from_config(config.discovery()).map_err(EnvironmentError::from)?;
    let resolver = EnvironmentResolver::new(client);

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling");
            ctrl_c_token.cancel();
        }
    });

    let context = CommandContext {
        store: &store,
        resolver: &resolver,
        format: OutputFormat::from_json_flag(cli.json),
        cancellation,
    };

    let mut stdout = std::io::stdout();
    commands::run_command(&cli.command, &context, &mut stdout).await
}

/// `--profile` wins over the configured path, which wins over the default location.
fn open_store(cli: &Cli, config: &AppConfig) -> Result<JsonFileStore, AppError> {
    match cli.profile.as_deref().or(config.profile_path()) {
        Some(path) => Ok(JsonFileStore::new(path)),
        None => Ok(JsonFileStore::at_default_location()?),
    }
}
