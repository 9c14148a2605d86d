use crate::{DbError, Result as DbErrorResult};

use av_core::CommandLog;

use std::panic::Location;

use chrono::DateTime;
use error_location::ErrorLocation;
use sqlx::{Acquire, QueryBuilder, Row, Sqlite, sqlite::SqliteRow};
use uuid::Uuid;

const TABLE: &str = "command_logs";

/// SQLite's bound-parameter limit (`SQLITE_MAX_VARIABLE_NUMBER`)
const MAX_BIND_PARAMS: usize = 32_766;
const BINDS_PER_ROW: usize = 11;
const ROWS_PER_STATEMENT: usize = MAX_BIND_PARAMS / BINDS_PER_ROW;

pub struct CommandLogRepository;

impl CommandLogRepository {
    /// Insert a whole batch in one transaction, split into multi-row
    /// statements that stay under the bound-parameter limit. Either every
    /// row is written or none is. Returns the number of rows written.
    pub async fn insert_batch<'a, A>(conn: A, logs: &[CommandLog]) -> DbErrorResult<u64>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        if logs.is_empty() {
            return Ok(0);
        }

        let mut tx = conn.begin().await?;
        let mut written = 0;

        for chunk in logs.chunks(ROWS_PER_STATEMENT) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                r#"
                  INSERT INTO command_logs (
                      id, user_id, username, command_type, command_payload,
                      executed_at, success, error_message, execution_time_ms,
                      is_remote_access, client_ip
                  )
                  "#,
            );

            builder.push_values(chunk, |mut row, log| {
                row.push_bind(log.id.to_string())
                    .push_bind(log.user_id.clone())
                    .push_bind(log.username.clone())
                    .push_bind(log.command_type.clone())
                    .push_bind(log.command_payload.clone())
                    .push_bind(log.executed_at.timestamp_millis())
                    .push_bind(log.success)
                    .push_bind(log.error_message.clone())
                    .push_bind(log.execution_time_ms)
                    .push_bind(log.is_remote_access)
                    .push_bind(log.client_ip.clone());
            });

            written += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;

        Ok(written)
    }

    /// Most recent commands first
    pub async fn recent<'e, E>(executor: E, limit: i64) -> DbErrorResult<Vec<CommandLog>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query(
            r#"
              SELECT id, user_id, username, command_type, command_payload,
                     executed_at, success, error_message, execution_time_ms,
                     is_remote_access, client_ip
              FROM command_logs
              ORDER BY executed_at DESC
              LIMIT ?
              "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    pub async fn count<'e, E>(executor: E) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM command_logs")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    #[track_caller]
    fn from_row(row: &SqliteRow) -> DbErrorResult<CommandLog> {
        let id: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id).map_err(|e| DbError::CorruptRow {
            table: TABLE,
            message: format!("invalid id {id}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let executed_at_ms: i64 = row.try_get("executed_at")?;
        let executed_at =
            DateTime::from_timestamp_millis(executed_at_ms).ok_or_else(|| DbError::CorruptRow {
                table: TABLE,
                message: format!("executed_at out of range: {executed_at_ms}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(CommandLog {
            id,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            command_type: row.try_get("command_type")?,
            command_payload: row.try_get("command_payload")?,
            executed_at,
            success: row.try_get("success")?,
            error_message: row.try_get("error_message")?,
            execution_time_ms: row.try_get("execution_time_ms")?,
            is_remote_access: row.try_get("is_remote_access")?,
            client_ip: row.try_get("client_ip")?,
        })
    }
}
