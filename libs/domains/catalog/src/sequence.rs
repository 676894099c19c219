//! Post-delete id renumbering.
//!
//! After a product or brand is deleted the remaining rows of that table are
//! given ids 1..N, keeping the order of their previous ids. The pass runs in
//! one transaction and resets the identity sequence to N+1. It is not
//! serialized against concurrent deletes.

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumString};

use crate::error::{CatalogError, CatalogResult};

/// Tables whose ids are kept contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SequencedEntity {
    Product,
    Brand,
}

impl SequencedEntity {
    /// Parses the literal tag (`"product"` or `"brand"`, exact match).
    pub fn from_tag(tag: &str) -> CatalogResult<Self> {
        Self::from_str(tag).map_err(|_| CatalogError::UnknownEntity(tag.to_string()))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Renumbers every row of `entity` to 1..N atomically.
    ///
    /// Returns how many rows changed id. Product rows referencing a moved
    /// brand follow it.
    async fn renumber(&self, entity: SequencedEntity) -> CatalogResult<u64>;
}

pub struct SequenceService<S: SequenceRepository> {
    repository: Arc<S>,
}

impl<S: SequenceRepository> Clone for SequenceService<S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<S: SequenceRepository> SequenceService<S> {
    pub fn new(repository: S) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Renumbers the table named by `tag`.
    ///
    /// Any tag other than `product` or `brand` is rejected with
    /// [`CatalogError::UnknownEntity`] before anything is touched.
    pub async fn reassign_ids_after_deletion(&self, tag: &str) -> CatalogResult<()> {
        let entity = SequencedEntity::from_tag(tag)?;
        self.reassign(entity).await
    }

    pub async fn reassign(&self, entity: SequencedEntity) -> CatalogResult<()> {
        let renumbered = self.repository.renumber(entity).await?;
        tracing::info!(entity = %entity, renumbered, "Reassigned ids after deletion");
        Ok(())
    }
}
