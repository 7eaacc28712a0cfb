use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::{errors::RequestError, models::User};

mod blog_helpers;
mod category_helpers;
mod comment_helpers;
mod favourite_helpers;
mod history_helpers;
mod like_helpers;
mod tag_helpers;
mod user_helpers;

pub use blog_helpers::*;
pub use category_helpers::*;
pub use comment_helpers::*;
pub use favourite_helpers::*;
pub use history_helpers::*;
pub use like_helpers::*;
pub use tag_helpers::*;
pub use user_helpers::*;

/// Joins optional `?`-placeholder clauses, skipping the ones whose value is absent.
struct QueryBuilder {
    prefix: &'static str,
    clauses: Vec<String>,
    params: Vec<String>,
    separator: &'static str,
}

impl QueryBuilder {
    fn new(prefix: &'static str, separator: &'static str) -> Self {
        Self {
            prefix,
            clauses: vec![],
            params: vec![],
            separator,
        }
    }

    /// `clause` holds one `?` per copy of `param` to bind.
    fn add_param(mut self, clause: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            let placeholders = clause.matches('?').count();
            self.clauses.push(clause.to_owned());
            for _ in 0..placeholders {
                self.params.push(value.clone());
            }
        }
        self
    }

    fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns an empty fragment when nothing was added.
    pub fn build(self) -> (String, Vec<String>) {
        if self.clauses.is_empty() {
            return (String::new(), self.params);
        }
        (
            format!("{}{}", self.prefix, self.clauses.join(self.separator)),
            self.params,
        )
    }

    /// Like [`QueryBuilder::build`], with placeholders rewritten to `?N` starting at `first`.
    ///
    /// Needed whenever the fragment is appended to SQL that already uses numbered
    /// placeholders, since sqlx numbers anonymous `?` independently of them.
    pub fn build_numbered(self, first: usize) -> (String, Vec<String>) {
        let (fragment, params) = self.build();
        let mut numbered = String::with_capacity(fragment.len() + params.len() * 2);
        let mut next = first;
        for c in fragment.chars() {
            if c == '?' {
                numbered.push_str(&format!("?{}", next));
                next += 1;
            } else {
                numbered.push(c);
            }
        }
        (numbered, params)
    }
}

// ----------------- Helper Functions -----------------

/// Starts a transaction that already holds the database write lock.
///
/// A deferred transaction that reads before it writes fails with
/// `SQLITE_BUSY` instead of waiting when another connection committed in
/// between. Any write statement takes the lock up front, even one that
/// matches no rows, and waits on the busy timeout like a plain write.
async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE users SET id = id WHERE 0")
        .execute(&mut tx)
        .await?;
    Ok(tx)
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let result = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let mut conn = pool.acquire().await?;
    fetch_user(&mut conn, id).await
}

async fn fetch_user(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>, RequestError> {
    let result = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(result)
}

async fn blog_exists(conn: &mut SqliteConnection, blog_id: i64) -> Result<bool, RequestError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM blogs WHERE id = ?")
        .bind(blog_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn require_blog_exists(
    conn: &mut SqliteConnection,
    blog_id: i64,
) -> Result<(), RequestError> {
    if blog_exists(conn, blog_id).await? {
        Ok(())
    } else {
        Err(RequestError::NotFound("Blog not found"))
    }
}
