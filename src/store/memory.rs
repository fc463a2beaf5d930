use std::{collections::HashSet, sync::RwLock};

use async_trait::async_trait;

use super::{Collection, Inserted, StoreError};
use crate::activity::Activity;

#[derive(Debug, Default)]
struct Documents {
    docs: Vec<Activity>,
    deliveries: HashSet<String>,
}

/// In-process collection. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    inner: RwLock<Documents>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn insert(
        &self,
        activity: &Activity,
        delivery: Option<&str>,
    ) -> Result<Inserted, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(delivery) = delivery {
            if !inner.deliveries.insert(delivery.to_owned()) {
                return Ok(Inserted::Duplicate);
            }
        }
        inner.docs.push(activity.clone());
        Ok(Inserted::Stored)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Activity>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        // Position in `docs` is the insertion order.
        let mut docs: Vec<_> = inner.docs.iter().enumerate().collect();
        docs.sort_by(|(a_seq, a), (b_seq, b)| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b_seq.cmp(a_seq))
        });
        Ok(docs
            .into_iter()
            .take(limit)
            .map(|(_, activity)| activity.clone())
            .collect())
    }
}
