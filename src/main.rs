use anyhow::Result;
use smart_hospital::{app_state::AppState, bootstrap, config, db};

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_env();
    bootstrap::init_tracing();

    let config = config::load()?;

    tracing::info!("Running migrations...");
    let migrations_count = db::run_migrations_blocking(db::MIGRATIONS, &config.database.url).await?;
    tracing::info!("Run {} new migrations successfully", migrations_count);

    let state = AppState::new(db::create_pool(&config.database));
    let app = smart_hospital::app(state);

    tracing::info!("Bootstrapping...");
    bootstrap::serve("SmartHospital", app, &config.server).await
}
