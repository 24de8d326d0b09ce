use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use club_events_server::auth::HeaderIdentityProvider;
use club_events_server::config::Config;
use club_events_server::repository::PgEventRepository;
use club_events_server::routes::create_routes;
use club_events_server::services::EventService;
use club_events_server::state::AppState;
use club_events_server::storage::LocalBlobStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_db_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Successfully connected to database");

    sqlx::migrate!().run(&pool).await?;

    tracing::info!("Migrations run successfully");

    let blobs = LocalBlobStore::open(&config.upload_dir).await?;
    let events = EventService::new(Arc::new(PgEventRepository::new(pool)), Arc::new(blobs));
    let state = AppState::new(events, Arc::new(HeaderIdentityProvider));

    let app = create_routes(state, &config);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
