use crate::db::guard::ensure_single_statement;
use crate::db::models::UserAccount;
use crate::db::schema::{SEED_USERS, SQLITE_INIT};
use crate::error::PitfallError;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Access to the `users` table.
///
/// There is no pool: every operation opens its own connection and closes it
/// before returning, whatever the outcome.
#[derive(Debug, Clone)]
pub struct UserStore {
    options: SqliteConnectOptions,
}

impl UserStore {
    pub fn new(database_url: &str) -> Result<Self, PitfallError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        Ok(Self { options })
    }

    /// Open a dedicated connection. Dropping it also closes the handle.
    pub async fn connect(&self) -> Result<SqliteConnection, PitfallError> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }

    /// Create the table if absent, then replace its contents with the seed rows.
    pub async fn reset(&self) -> Result<(), PitfallError> {
        let mut conn = self.connect().await?;
        let outcome = Self::reset_on(&mut conn).await;
        release(conn).await;
        outcome?;

        info!(rows = SEED_USERS.len(), "user store reset to seed rows");
        Ok(())
    }

    async fn reset_on(conn: &mut SqliteConnection) -> Result<(), PitfallError> {
        sqlx::query(SQLITE_INIT).execute(&mut *conn).await?;

        let mut tx = conn.begin().await?;
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
        for seed in SEED_USERS.iter() {
            sqlx::query(
                "INSERT INTO users (id, username, password, email, role) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(seed.id)
            .bind(seed.username)
            .bind(seed.password)
            .bind(seed.email)
            .bind(seed.role)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Look up a user by an id fragment spliced verbatim into the WHERE clause.
    ///
    /// `raw_id` is not bound as a parameter: `"1 OR 1=1"` widens the match and
    /// anything unparsable surfaces as a driver error. A second statement is
    /// refused before the query runs.
    pub async fn find_by_raw_id(&self, raw_id: &str) -> Result<Option<UserAccount>, PitfallError> {
        let query = format!("SELECT * FROM users WHERE id = {raw_id}");
        self.fetch_optional(&query).await
    }

    pub async fn list_all(&self) -> Result<Vec<UserAccount>, PitfallError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as::<_, UserAccount>("SELECT * FROM users")
            .fetch_all(&mut conn)
            .await;
        release(conn).await;
        Ok(rows?)
    }

    /// Match both credentials by splicing them into single-quoted literals.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, PitfallError> {
        let query = format!(
            "SELECT * FROM users WHERE username = '{username}' AND password = '{password}'"
        );
        self.fetch_optional(&query).await
    }

    async fn fetch_optional(&self, query: &str) -> Result<Option<UserAccount>, PitfallError> {
        debug!(%query, "executing literal query");
        ensure_single_statement(query)?;
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, UserAccount>(query)
            .fetch_optional(&mut conn)
            .await;
        release(conn).await;
        Ok(row?)
    }
}

async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "failed to close store connection");
    }
}
