mod memory;
mod sqlite;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

pub use self::{memory::MemoryCollection, sqlite::SqliteCollection};
use crate::activity::Activity;

/// Number of records served by the read API.
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt row: {0}")]
    CorruptRow(String),
    #[error("collection lock is poisoned")]
    Poisoned,
    #[error("store operation did not finish within {0:?}, its outcome is unknown")]
    Timeout(Duration),
}

/// Result of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Stored,
    /// A document with the same delivery id is already stored.
    Duplicate,
}

/// Ordered document collection holding [`Activity`] records.
///
/// Each stored document carries an internal id which is never returned.
/// Inserts are keyed by the optional webhook delivery id, so redelivering an
/// event whose first insert outcome was unknown stores it at most once.
#[async_trait]
pub trait Collection: Send + Sync + 'static {
    async fn insert(
        &self,
        activity: &Activity,
        delivery: Option<&str>,
    ) -> Result<Inserted, StoreError>;

    /// Up to `limit` documents, newest `timestamp` first. Documents with equal
    /// timestamps are returned in reverse insertion order.
    async fn latest(&self, limit: usize) -> Result<Vec<Activity>, StoreError>;
}

/// Shared handle used by the request handlers.
#[derive(Clone)]
pub struct Store {
    collection: Arc<dyn Collection>,
    timeout: Duration,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Store {
    pub fn new<C: Collection>(collection: C, timeout: Duration) -> Self {
        Self {
            collection: Arc::new(collection),
            timeout,
        }
    }

    pub async fn insert(
        &self,
        activity: &Activity,
        delivery: Option<&str>,
    ) -> Result<Inserted, StoreError> {
        tokio::time::timeout(self.timeout, self.collection.insert(activity, delivery))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    pub async fn latest(&self) -> Result<Vec<Activity>, StoreError> {
        tokio::time::timeout(self.timeout, self.collection.latest(PAGE_SIZE))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;

    use super::*;

    /// Lands the write, then stalls before acknowledging it the first time.
    struct LateAck {
        inner: MemoryCollection,
        stall: AtomicBool,
    }

    #[async_trait]
    impl Collection for LateAck {
        async fn insert(
            &self,
            activity: &Activity,
            delivery: Option<&str>,
        ) -> Result<Inserted, StoreError> {
            let inserted = self.inner.insert(activity, delivery).await?;
            if self.stall.swap(false, Ordering::SeqCst) {
                tokio::time::delay_for(Duration::from_millis(200)).await;
            }
            Ok(inserted)
        }

        async fn latest(&self, limit: usize) -> Result<Vec<Activity>, StoreError> {
            self.inner.latest(limit).await
        }
    }

    #[actix_rt::test]
    async fn redelivery_after_timeout_is_stored_once() {
        let store = Store::new(
            LateAck {
                inner: MemoryCollection::new(),
                stall: AtomicBool::new(true),
            },
            Duration::from_millis(10),
        );
        let activity = Activity::push(Some("octocat".into()), "main".into(), Utc::now());

        let first = store.insert(&activity, Some("delivery-1")).await;
        assert!(matches!(first, Err(StoreError::Timeout(_))));

        let retry = store.insert(&activity, Some("delivery-1")).await.unwrap();
        assert_eq!(retry, Inserted::Duplicate);
        assert_eq!(store.latest().await.unwrap(), vec![activity]);
    }

    struct Broken;

    #[async_trait]
    impl Collection for Broken {
        async fn insert(&self, _: &Activity, _: Option<&str>) -> Result<Inserted, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn latest(&self, _: usize) -> Result<Vec<Activity>, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[actix_rt::test]
    async fn collection_errors_pass_through() {
        let store = Store::new(Broken, Duration::from_secs(1));
        assert!(matches!(store.latest().await, Err(StoreError::Poisoned)));
    }
}
