use clap::Parser;
use recipe_finder::{
    cli::{commands, Cli, Commands},
    config::{CredentialProvider, Settings},
    generator::{GeminiClient, InstructionSource},
    mealdb::{MealDbClient, RecipeSource},
    web::{create_router, AppState},
    Error, Result,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_finder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Suggest { query } => {
            commands::suggest(&settings, &query).await?;
        }
        Commands::Search { ingredient } => {
            commands::search(&settings, &ingredient).await?;
        }
        Commands::Show { id, proxy } => {
            commands::show(&settings, &id, proxy.as_deref()).await?;
        }
        Commands::Browse { proxy } => {
            commands::browse(&settings, proxy.as_deref()).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Recipe Finder server");
    info!("Recipe database: {}", settings.mealdb.base_url);
    info!("Generator model: {}", settings.generator.model);

    let credentials = settings.generator.credentials();
    if let Err(e) = credentials.api_key() {
        warn!(
            "{}; instruction generation will fall back to the database text",
            e.log_safe()
        );
    }

    let recipes: Arc<dyn RecipeSource> = Arc::new(MealDbClient::new(&settings.mealdb)?);
    let generator: Arc<dyn InstructionSource> =
        Arc::new(GeminiClient::new(&settings.generator, Arc::new(credentials))?);

    let state = AppState::new(settings.clone(), recipes, generator);
    let app = create_router(state)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Recipe Finder");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  GET  /api/suggestions?q=");
    println!("  GET  /api/search?i=");
    println!("  GET  /api/recipes/:id");
    println!("  POST /api/instructions");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
