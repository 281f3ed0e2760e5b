use std::net::SocketAddr;

use todo_api::application::task_service::TaskServiceImpl;
use todo_api::config::Config;
use todo_api::domain::repository::TaskRepository;
use todo_api::http::routes::todos;
use todo_api::http::routing;
use todo_api::infrastructure::sqlite_repo::SqliteTaskRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    config.prepare_database()?;
    let repo = SqliteTaskRepository::connect(&config.database_url).await?;
    repo.init().await?;
    let service = TaskServiceImpl::new(repo);
    let router = routing::app(todos::router(todos::AppState { service }));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown");
}
