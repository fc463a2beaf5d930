use std::{convert::TryFrom, str::FromStr as _, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Done as _;

use super::{Collection, Inserted, StoreError};
use crate::activity::{ActionKind, Activity};

/// Activities table in a SQLite database.
///
/// Each insert is a single statement, so a document is either fully stored or
/// absent. The `id` primary key only orders ties and is never selected.
#[derive(Debug, Clone)]
pub struct SqliteCollection {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    action: String,
    author: Option<String>,
    from_branch: Option<String>,
    to_branch: String,
    timestamp: String,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = StoreError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let action: ActionKind = row
            .action
            .parse()
            .map_err(|err| StoreError::CorruptRow(format!("{}", err)))?;
        let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|err| {
                StoreError::CorruptRow(format!("bad timestamp `{}`: {}", row.timestamp, err))
            })?
            .with_timezone(&Utc);

        let activity = match (action, row.from_branch) {
            (ActionKind::Push, None) => Activity::push(row.author, row.to_branch, timestamp),
            (ActionKind::PullRequest, Some(from)) => {
                Activity::pull_request(row.author, from, row.to_branch, timestamp)
            }
            (ActionKind::Merge, Some(from)) => {
                Activity::merge(row.author, from, row.to_branch, timestamp)
            }
            (action, from) => {
                return Err(StoreError::CorruptRow(format!(
                    "{} with from_branch {:?}",
                    action.as_str(),
                    from
                )))
            }
        };
        Ok(activity)
    }
}

/// Fixed-width so that text order in the database is time order.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl SqliteCollection {
    /// Connects to `url` (e.g. `sqlite://github_webhooks.db`), creating the
    /// database file and schema when missing.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_timeout(acquire_timeout)
            .connect_with(options)
            .await?;

        sqlx::query(include_str!("../../migrations/001_create_activities.sql"))
            .execute(&pool)
            .await?;
        tracing::info!("Connected to {}", url);

        Ok(Self { pool })
    }

    #[cfg(test)]
    async fn internal_ids(&self) -> Vec<i64> {
        sqlx::query_as::<_, (i64,)>("SELECT id FROM activities ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .unwrap()
            .into_iter()
            .map(|(id,)| id)
            .collect()
    }
}

#[async_trait]
impl Collection for SqliteCollection {
    async fn insert(
        &self,
        activity: &Activity,
        delivery: Option<&str>,
    ) -> Result<Inserted, StoreError> {
        let done = sqlx::query(
            r#"
            INSERT INTO activities (delivery_id, action, author, from_branch, to_branch, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (delivery_id) DO NOTHING
            "#,
        )
        .bind(delivery)
        .bind(activity.action.as_str())
        .bind(activity.author.as_deref())
        .bind(activity.from_branch.as_deref())
        .bind(activity.to_branch.as_str())
        .bind(encode_timestamp(&activity.timestamp))
        .execute(&self.pool)
        .await?;

        if done.rows_affected() == 0 {
            Ok(Inserted::Duplicate)
        } else {
            Ok(Inserted::Stored)
        }
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Activity>, StoreError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT action, author, from_branch, to_branch, timestamp
            FROM activities
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Activity::try_from).collect()
    }
}
