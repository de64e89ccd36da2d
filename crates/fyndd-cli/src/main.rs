use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use fyndd_application::FynddApp;
use fyndd_core::FynddError;
use fyndd_infrastructure::ConfigService;

mod commands;

use commands::{
    AuthAction, CartAction, FriendsAction, Output, ProductsAction, SearchAction,
};

#[derive(Parser)]
#[command(name = "fyndd")]
#[command(about = "Fyndd CLI - search products, manage your cart and shop with friends", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/fyndd/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and FYNDD_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products by text or image
    Search {
        #[command(subcommand)]
        action: SearchAction,
    },
    /// Browse the product catalogue
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Sign up, log in and manage your account
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Manage your cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Friends and friend requests
    Friends {
        #[command(subcommand)]
        action: FriendsAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        let message = match err.downcast_ref::<FynddError>() {
            Some(fyndd_err) => fyndd_err.user_message(),
            None => format!("{:#}", err),
        };
        eprintln!("{}", message.red());
        if matches!(err.downcast_ref::<FynddError>(), Some(FynddError::NotAuthenticated)) {
            eprintln!("{}", "Run `fyndd auth login` to sign in.".dimmed());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let mut config = config_service.get_config().await?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app = FynddApp::build(config).await?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Search { action } => commands::search::run(&app, &out, action).await,
        Commands::Products { action } => commands::products::run(&app, &out, action).await,
        Commands::Auth { action } => commands::auth::run(&app, &out, action).await,
        Commands::Cart { action } => commands::cart::run(&app, &out, action).await,
        Commands::Friends { action } => commands::friends::run(&app, &out, action).await,
    }
}
