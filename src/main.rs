use anyhow::Result;
use bookshelf::application::{ServerConfig, serve};
use bookshelf::infrastructure::client::BookshelfClient;
use bookshelf::presentation::cli::{Cli, Commands, ServeCommand, accounts, books};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Register(cmd) => {
            let client = BookshelfClient::from_base_url(&cli.api_url)?;
            accounts::register(&client, cmd).await
        }
        Commands::Login(cmd) => {
            let client = BookshelfClient::from_base_url(&cli.api_url)?;
            accounts::login(&client, cmd).await
        }
        Commands::Book { command } => {
            let client = BookshelfClient::from_base_url(&cli.api_url)?;
            books::run(&client, command).await
        }
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let config = ServerConfig {
        bind_address: command.bind_address(),
        cloudinary: command.cloudinary(),
        database_url: command.database_url,
        jwt_secret: command.jwt_secret,
    };

    serve(config).await
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
