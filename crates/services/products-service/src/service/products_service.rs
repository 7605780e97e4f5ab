//! Products service - Ownership-scoped product CRUD.
//!
//! Single-product operations load the row first, then check ownership, and
//! only then mutate or publish. A missing id is always `ProductNotFound`,
//! whoever asks.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use tracing::{error, instrument};

use crate::repository::ProductsRepository;
use crate::statistics::StatisticsSink;
use domain::{Clock, DomainError, DomainResult, Product, RepositoryError, SortKey};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Products service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Store a new product owned by `product.owner_name`; returns its id
    async fn create_product(&self, tx: &DatabaseTransaction, product: Product) -> DomainResult<u64>;

    /// Load a product for its owner and record the view
    async fn find_product(&self, tx: &DatabaseTransaction, id: u64, requester: &str) -> DomainResult<Product>;

    /// Replace name, price and quantity. `product.owner_name` is the requester.
    async fn update_product(&self, tx: &DatabaseTransaction, product: Product) -> DomainResult<Product>;

    async fn delete_product(&self, tx: &DatabaseTransaction, id: u64, requester: &str) -> DomainResult<()>;

    /// List the owner's products. An empty `name_filter` matches every name.
    async fn find_product_list(
        &self,
        tx: &DatabaseTransaction,
        owner: &str,
        name_filter: &str,
        sort_key: SortKey,
    ) -> DomainResult<Vec<Product>>;
}

/// Concrete implementation of ProductsService.
pub struct ProductManager {
    repo: Arc<dyn ProductsRepository>,
    statistics: Arc<dyn StatisticsSink>,
    clock: Arc<dyn Clock>,
}

impl ProductManager {
    pub fn new(
        repo: Arc<dyn ProductsRepository>,
        statistics: Arc<dyn StatisticsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            statistics,
            clock,
        }
    }

    /// Load `id` and check that `requester` owns it.
    async fn owned_product(&self, tx: &DatabaseTransaction, id: u64, requester: &str) -> DomainResult<Product> {
        let product = self.repo.find_product(tx, id).await.map_err(lookup_error)?;

        if !product.is_owned_by(requester) {
            return Err(DomainError::PermissionDenied);
        }

        Ok(product)
    }
}

/// Repository errors for operations addressed by product id.
fn lookup_error(err: RepositoryError) -> DomainError {
    match err {
        RepositoryError::NotFound => DomainError::ProductNotFound,
        other => internal(other),
    }
}

fn internal(err: RepositoryError) -> DomainError {
    error!(error = %err, "product repository failure");
    DomainError::Internal
}

#[async_trait]
impl ProductsService for ProductManager {
    #[instrument(skip_all, fields(owner = %product.owner_name))]
    async fn create_product(&self, tx: &DatabaseTransaction, mut product: Product) -> DomainResult<u64> {
        product.created_at = self.clock.now();

        self.repo.create_product(tx, &product).await.map_err(internal)
    }

    #[instrument(skip(self, tx))]
    async fn find_product(&self, tx: &DatabaseTransaction, id: u64, requester: &str) -> DomainResult<Product> {
        let product = self.owned_product(tx, id, requester).await?;

        self.statistics.send(&product).await.map_err(|e| {
            error!(error = %e, "failed to publish product view");
            DomainError::Internal
        })?;

        Ok(product)
    }

    #[instrument(skip_all, fields(id = product.id, requester = %product.owner_name))]
    async fn update_product(&self, tx: &DatabaseTransaction, product: Product) -> DomainResult<Product> {
        let existing = self.owned_product(tx, product.id, &product.owner_name).await?;

        let replacement = Product {
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            ..existing
        };

        self.repo.update_product(tx, &replacement).await.map_err(lookup_error)
    }

    #[instrument(skip(self, tx))]
    async fn delete_product(&self, tx: &DatabaseTransaction, id: u64, requester: &str) -> DomainResult<()> {
        self.owned_product(tx, id, requester).await?;

        self.repo.delete_product(tx, id).await.map_err(lookup_error)
    }

    #[instrument(skip(self, tx))]
    async fn find_product_list(
        &self,
        tx: &DatabaseTransaction,
        owner: &str,
        name_filter: &str,
        sort_key: SortKey,
    ) -> DomainResult<Vec<Product>> {
        self.repo
            .find_product_list(tx, owner, name_filter, sort_key)
            .await
            .map_err(internal)
    }
}
