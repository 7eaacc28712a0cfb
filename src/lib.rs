mod authentication;
pub mod config;
pub mod counters;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;
mod ownership;
#[cfg(test)]
mod test_utils;

use std::{net::TcpListener, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub use authentication::TokenService;
use crate::config::{AppConfig, DatabaseConfig};
use counters::CounterPolicy;
pub use data_formats::*;
use handlers::*;

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Everything a handler needs, shared behind an `Arc` extension.
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: TokenService,
    pub counters: CounterPolicy,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        Self {
            pool,
            tokens: TokenService::new(&config.auth),
            counters: CounterPolicy::from_config(&config.counters),
        }
    }
}

pub async fn run_app(app: Router, listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let app = app
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http());
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

pub async fn init_db(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database url {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool_options = if is_in_memory(&config.url) {
        // every connection to an in-memory url opens its own empty database
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };
    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database {}", config.url))?;

    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> Result<TcpListener> {
    TcpListener::bind("127.0.0.1:0").context("Could not get a free port")
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .route("/users", get(list_users))
        .route("/users/me", get(get_current_user))
        .route("/users/me/deactivate", post(deactivate_current_user))
        .route("/users/me/blogs", get(my_blogs))
        .route("/users/me/likes", get(my_likes))
        .route("/users/me/comments", get(my_comments))
        .route("/users/me/favourites", get(my_favourites))
        .route("/users/me/history", get(my_history))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/blogs", get(search_blogs).post(create_blog))
        .route(
            "/blogs/:id",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
        .route(
            "/blogs/:id/comments",
            get(get_blog_comments).post(add_comment),
        )
        .route("/blogs/:id/likes", get(get_blog_likes))
        .route("/blogs/:id/like", post(like_blog).delete(unlike_blog))
        .route(
            "/blogs/:id/favourite",
            post(favourite_blog).delete(unfavourite_blog),
        )
        .route(
            "/blogs/:id/counters/reconcile",
            post(reconcile_blog_counters),
        )
        .route(
            "/comments/:id",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route("/comments/:id/blog", get(get_comment_blog))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", delete(delete_category))
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/:name", delete(delete_tag))
        .fallback(not_found)
}
