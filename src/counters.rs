//! Cached aggregate counters on `blogs`.
//!
//! Every insert or removal of a like, comment or favourite applies a `±1`
//! delta to the owning blog inside the same transaction. Removals may also
//! trigger a reconciliation pass, with a configurable probability, that
//! recomputes the authoritative count and overwrites the cached one when the
//! two disagree. The cached value never flows back into the source tables.

use chrono::Utc;
use rand::Rng;
use sqlx::SqliteConnection;

use crate::config::{CounterConfig, ReconcileScope};
use crate::errors::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Comments,
    Favourites,
    Views,
}

impl Counter {
    /// Counters backed by a relationship table.
    pub const RECONCILABLE: [Counter; 3] = [Counter::Likes, Counter::Comments, Counter::Favourites];

    pub fn column(self) -> &'static str {
        match self {
            Counter::Likes => "likes_count",
            Counter::Comments => "comments_count",
            Counter::Favourites => "favourite_count",
            Counter::Views => "view_count",
        }
    }

    /// Views have no per-view rows (history keeps only the last view per
    /// user), so there is nothing to reconcile them against.
    fn source_table(self) -> Option<&'static str> {
        match self {
            Counter::Likes => Some("likes"),
            Counter::Comments => Some("comments"),
            Counter::Favourites => Some("favourites"),
            Counter::Views => None,
        }
    }
}

/// A cached counter that disagreed with its source rows and was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub blog_id: i64,
    pub counter: Counter,
    pub cached: i64,
    pub actual: i64,
}

pub async fn apply_delta(
    conn: &mut SqliteConnection,
    blog_id: i64,
    counter: Counter,
    delta: i64,
) -> Result<(), RequestError> {
    let query = format!(
        "UPDATE blogs SET {column} = {column} + ? WHERE id = ?",
        column = counter.column()
    );
    let result = sqlx::query(&query)
        .bind(delta)
        .bind(blog_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Blog not found"));
    }
    Ok(())
}

/// Recomputes one counter from its source table. Returns `None` when the
/// counter already matched, is not reconcilable, or the blog is gone.
pub async fn reconcile(
    conn: &mut SqliteConnection,
    blog_id: i64,
    counter: Counter,
) -> Result<Option<Correction>, RequestError> {
    let table = match counter.source_table() {
        Some(table) => table,
        None => return Ok(None),
    };
    let column = counter.column();

    let cached: Option<i64> =
        sqlx::query_scalar(&format!("SELECT {} FROM blogs WHERE id = ?", column))
            .bind(blog_id)
            .fetch_optional(&mut *conn)
            .await?;
    let cached = match cached {
        Some(cached) => cached,
        None => return Ok(None),
    };

    let actual: i64 =
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE blog_id = ?", table))
            .bind(blog_id)
            .fetch_one(&mut *conn)
            .await?;

    if cached == actual {
        tracing::debug!(blog_id, counter = column, value = actual, "counter in sync");
        return Ok(None);
    }

    sqlx::query(&format!("UPDATE blogs SET {} = ? WHERE id = ?", column))
        .bind(actual)
        .bind(blog_id)
        .execute(&mut *conn)
        .await?;
    tracing::warn!(blog_id, counter = column, cached, actual, "corrected drifted counter");

    Ok(Some(Correction {
        blog_id,
        counter,
        cached,
        actual,
    }))
}

pub async fn reconcile_blog(
    conn: &mut SqliteConnection,
    blog_id: i64,
) -> Result<Vec<Correction>, RequestError> {
    let mut corrections = vec![];
    for counter in Counter::RECONCILABLE {
        if let Some(correction) = reconcile(&mut *conn, blog_id, counter).await? {
            corrections.push(correction);
        }
    }
    Ok(corrections)
}

/// Counts a view of `blog_id` and records it as `user_id`'s latest view.
pub async fn record_view(
    conn: &mut SqliteConnection,
    user_id: i64,
    blog_id: i64,
) -> Result<(), RequestError> {
    apply_delta(&mut *conn, blog_id, Counter::Views, 1).await?;
    sqlx::query(
        r#"
        INSERT INTO history (user_id, blog_id, viewed_at)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, blog_id) DO UPDATE SET viewed_at = excluded.viewed_at
        "#,
    )
    .bind(user_id)
    .bind(blog_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// When and how widely removals reconcile.
#[derive(Debug, Clone)]
pub struct CounterPolicy {
    probability: f64,
    scope: ReconcileScope,
}

impl CounterPolicy {
    pub fn new(probability: f64, scope: ReconcileScope) -> Self {
        Self { probability, scope }
    }

    pub fn from_config(config: &CounterConfig) -> Self {
        Self::new(config.reconcile_probability, config.reconcile_scope)
    }

    pub fn should_reconcile(&self) -> bool {
        if !(self.probability > 0.0) {
            false
        } else if self.probability >= 1.0 {
            true
        } else {
            rand::thread_rng().gen_bool(self.probability)
        }
    }

    /// Runs after a removal has applied its `-1`, in the same transaction.
    pub async fn after_removal(
        &self,
        conn: &mut SqliteConnection,
        blog_id: i64,
        counter: Counter,
    ) -> Result<Vec<Correction>, RequestError> {
        if !self.should_reconcile() {
            return Ok(vec![]);
        }
        match self.scope {
            ReconcileScope::Touched => {
                Ok(reconcile(conn, blog_id, counter).await?.into_iter().collect())
            }
            ReconcileScope::All => reconcile_blog(conn, blog_id).await,
        }
    }
}
