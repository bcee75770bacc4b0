//! Promote
//!
//! Applying an accepted draft's text to the live product.

use std::{
    error::Error as StdError,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::info;

use crate::{locales::LiveDescriptions, staging::ProductId};

/// Promote Errors
#[derive(Debug, Error)]
pub enum PromoteError {
    /// The live product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Transport, authentication or other failure of the promote call.
    #[error("promote call failed: {0}")]
    External(#[source] Box<dyn StdError + Send + Sync>),
}

/// Writes description text onto live products.
#[automock]
#[async_trait]
pub trait ProductPromoter: Send + Sync {
    /// Replace the live description of `product` with `descriptions`.
    async fn promote(
        &self,
        product: &ProductId,
        descriptions: &LiveDescriptions,
    ) -> Result<(), PromoteError>;
}

/// Promoter that keeps live descriptions in memory.
#[derive(Debug, Default)]
pub struct InMemoryPromoter {
    live: Mutex<FxHashMap<ProductId, LiveDescriptions>>,
}

impl InMemoryPromoter {
    /// Create a promoter with no live descriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live descriptions most recently promoted for `product`.
    #[must_use]
    pub fn live(&self, product: &ProductId) -> Option<LiveDescriptions> {
        self.lock().get(product).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<ProductId, LiveDescriptions>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProductPromoter for InMemoryPromoter {
    async fn promote(
        &self,
        product: &ProductId,
        descriptions: &LiveDescriptions,
    ) -> Result<(), PromoteError> {
        info!(product_id = %product, "promoting description to live product");

        self.lock().insert(product.clone(), descriptions.clone());

        Ok(())
    }
}
