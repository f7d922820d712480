use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planner::api::router;
use planner::config::AppConfig;
use planner::db;
use planner::notify::LogNotifier;
use planner::services::ReminderScheduler;
use planner::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "planner=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let clock = config.clock();

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("database ready at {}", config.database_url);

    if config.reminder_interval_secs > 0 {
        let scheduler = ReminderScheduler::new(
            pool.clone(),
            Arc::new(LogNotifier),
            clock,
            config.reminder_interval_secs,
            config.reminder_lead_minutes,
        );
        tokio::spawn(scheduler.start());
    } else {
        info!("reminder scheduler disabled");
    }

    let state = AppState::new(pool, clock);
    let app = router(state);

    info!("listening on http://{}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
