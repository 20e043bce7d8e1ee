use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use sqlx::sqlite::SqlitePool;
use tokio_util::sync::CancellationToken;

use todolist_server::handlers::{self, AppState};
use todolist_server::store::{self, SqliteTaskStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todo.db?mode=rwc".to_string());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let pool = SqlitePool::connect(&database_url).await?;
    store::migrate(&pool).await?;

    let shutdown = CancellationToken::new();
    let state = web::Data::new(AppState {
        store: Arc::new(SqliteTaskStore::new(pool)),
        shutdown: shutdown.clone(),
    });

    log::info!("listening on {bind_addr}");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    // Signal any straggling operations once the listener has stopped.
    shutdown.cancel();
    Ok(())
}
