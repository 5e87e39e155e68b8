//! Table reset between tests, without destroying the instance.
//!
//! Both operations run on one pooled connection with foreign-key checks
//! suspended for the truncation batch. Neither locks internally; overlapping
//! a reset with inserts into the same tables is the caller's problem.

use sqlx::mysql::MySqlConnection;

use crate::error::{Result, SandboxError};
use crate::handle::SandboxHandle;

impl SandboxHandle {
    /// Truncate every table in the sandbox database except the ones excluded
    /// in the config.
    ///
    /// Fail-fast: enumeration failure and the first truncation failure both
    /// abort the call. A half-reset dataset is worse than a clearly failed
    /// reset.
    pub async fn reset_all_tables(&self) -> Result<()> {
        let inner = self.inner()?;
        let mut conn = inner.pool.acquire().await.map_err(as_enumeration_error)?;

        let tables = list_tables(&mut conn, &inner.database).await?;
        let targets: Vec<&String> = tables
            .iter()
            .filter(|t| !inner.skip_reset_tables.contains(t))
            .collect();

        suspend_fk_checks(&mut conn).await?;
        let mut outcome = Ok(());
        for table in targets {
            if let Err(source) = truncate(&mut conn, table).await {
                outcome = Err(SandboxError::Truncate {
                    table: table.clone(),
                    source,
                });
                break;
            }
        }
        restore_fk_checks(&mut conn).await;

        outcome
    }

    /// Truncate exactly the named tables, skipping names that do not exist
    /// in the sandbox database.
    ///
    /// Best-effort by design: a failure truncating one named table is logged
    /// and the remaining names still run, since callers commonly pass a fixed
    /// convenience list that over-specifies the schema at hand. Enumeration
    /// failure is still fatal.
    pub async fn reset_tables(&self, names: &[&str]) -> Result<()> {
        let inner = self.inner()?;
        let mut conn = inner.pool.acquire().await.map_err(as_enumeration_error)?;

        let existing = list_tables(&mut conn, &inner.database).await?;

        suspend_fk_checks(&mut conn).await?;
        for name in names {
            if !existing.iter().any(|t| t == name) {
                continue;
            }
            if let Err(e) = truncate(&mut conn, name).await {
                tracing::warn!(table = name, "truncate failed: {}", e);
                inner
                    .log
                    .record(format!("{}: truncate `{name}` failed: {e}", inner.name));
            }
        }
        restore_fk_checks(&mut conn).await;

        Ok(())
    }
}

/// Enumerate tables, scoped to the sandbox's own database.
async fn list_tables(conn: &mut MySqlConnection, database: &str) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = ?",
    )
    .bind(database)
    .fetch_all(conn)
    .await
    .map_err(|source| SandboxError::TableEnumeration { source })
}

async fn truncate(conn: &mut MySqlConnection, table: &str) -> sqlx::Result<()> {
    sqlx::query(&format!("TRUNCATE TABLE {}", quote_ident(table)))
        .execute(conn)
        .await?;
    Ok(())
}

async fn suspend_fk_checks(conn: &mut MySqlConnection) -> Result<()> {
    sqlx::query("SET FOREIGN_KEY_CHECKS = 0")
        .execute(conn)
        .await
        .map_err(|source| SandboxError::TableEnumeration { source })?;
    Ok(())
}

/// Session-scoped, but restore anyway before the connection returns to the
/// pool.
async fn restore_fk_checks(conn: &mut MySqlConnection) {
    if let Err(e) = sqlx::query("SET FOREIGN_KEY_CHECKS = 1").execute(conn).await {
        tracing::warn!("failed to restore FOREIGN_KEY_CHECKS: {}", e);
    }
}

fn as_enumeration_error(source: sqlx::Error) -> SandboxError {
    SandboxError::TableEnumeration { source }
}

/// Backtick-quote an identifier that came from catalog metadata or caller
/// input.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
