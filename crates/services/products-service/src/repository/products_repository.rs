//! Product repository. Every statement runs on the caller's transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::{NotSet, Set, Unchanged}, ColumnTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Select,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use common::database::repository_error;
use domain::{Product, RepositoryError, SortKey};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Insert a product and return the assigned id
    async fn create_product(&self, tx: &DatabaseTransaction, product: &Product) -> Result<u64, RepositoryError>;

    async fn find_product(&self, tx: &DatabaseTransaction, id: u64) -> Result<Product, RepositoryError>;

    /// Replace name, price and quantity of an existing row
    async fn update_product(&self, tx: &DatabaseTransaction, product: &Product) -> Result<Product, RepositoryError>;

    async fn delete_product(&self, tx: &DatabaseTransaction, id: u64) -> Result<(), RepositoryError>;

    /// Products of `owner`, optionally restricted to an exact name
    async fn find_product_list(
        &self,
        tx: &DatabaseTransaction,
        owner: &str,
        name_filter: &str,
        sort_key: SortKey,
    ) -> Result<Vec<Product>, RepositoryError>;
}

/// PostgreSQL implementation of [`ProductsRepository`]
#[derive(Debug, Clone, Default)]
pub struct ProductStore;

impl ProductStore {
    pub fn new() -> Self {
        Self
    }

    fn list_query(owner: &str, name_filter: &str, sort_key: SortKey) -> Select<ProductEntity> {
        let mut query = ProductEntity::find().filter(product::Column::OwnerName.eq(owner));

        if !name_filter.is_empty() {
            query = query.filter(product::Column::Name.eq(name_filter));
        }

        match sort_key {
            SortKey::ByName => query.order_by_asc(product::Column::Name),
            SortKey::ByLastCreated => query.order_by_desc(product::Column::CreatedAt),
            SortKey::Unsorted => query.order_by_asc(product::Column::Id),
        }
    }
}

fn column_value(value: u64) -> Result<i64, RepositoryError> {
    i64::try_from(value).map_err(RepositoryError::other)
}

#[async_trait]
impl ProductsRepository for ProductStore {
    #[tracing::instrument(skip_all, fields(owner = %product.owner_name))]
    async fn create_product(&self, tx: &DatabaseTransaction, product: &Product) -> Result<u64, RepositoryError> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(product.name.clone()),
            price: Set(column_value(product.price)?),
            quantity: Set(column_value(product.quantity)?),
            owner_name: Set(product.owner_name.clone()),
            created_at: Set(product.created_at),
        };

        let model = active_model.insert(tx).await.map_err(repository_error)?;
        Ok(Product::try_from(model)?.id)
    }

    #[tracing::instrument(skip(self, tx))]
    async fn find_product(&self, tx: &DatabaseTransaction, id: u64) -> Result<Product, RepositoryError> {
        let id = i64::try_from(id).map_err(|_| RepositoryError::NotFound)?;

        let model = ProductEntity::find_by_id(id)
            .one(tx)
            .await
            .map_err(repository_error)?
            .ok_or(RepositoryError::NotFound)?;

        Product::try_from(model)
    }

    #[tracing::instrument(skip_all, fields(id = product.id))]
    async fn update_product(&self, tx: &DatabaseTransaction, product: &Product) -> Result<Product, RepositoryError> {
        let id = i64::try_from(product.id).map_err(|_| RepositoryError::NotFound)?;

        let active_model = ActiveModel {
            id: Unchanged(id),
            name: Set(product.name.clone()),
            price: Set(column_value(product.price)?),
            quantity: Set(column_value(product.quantity)?),
            owner_name: NotSet,
            created_at: NotSet,
        };

        let model = active_model.update(tx).await.map_err(repository_error)?;
        Product::try_from(model)
    }

    #[tracing::instrument(skip(self, tx))]
    async fn delete_product(&self, tx: &DatabaseTransaction, id: u64) -> Result<(), RepositoryError> {
        let id = i64::try_from(id).map_err(|_| RepositoryError::NotFound)?;

        let result = ProductEntity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(repository_error)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, tx))]
    async fn find_product_list(
        &self,
        tx: &DatabaseTransaction,
        owner: &str,
        name_filter: &str,
        sort_key: SortKey,
    ) -> Result<Vec<Product>, RepositoryError> {
        let models = Self::list_query(owner, name_filter, sort_key)
            .all(tx)
            .await
            .map_err(repository_error)?;

        models.into_iter().map(Product::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait, TransactionTrait};

    use crate::repository::entities::product::Model;

    fn widget() -> Model {
        Model {
            id: 7,
            name: "widget".to_string(),
            price: 10,
            quantity: 5,
            owner_name: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sql(query: Select<ProductEntity>) -> String {
        query.build(DatabaseBackend::Postgres).to_string()
    }

    #[test]
    fn test_list_query_scopes_by_owner() {
        let sql = sql(ProductStore::list_query("alice", "", SortKey::Unsorted));

        assert!(sql.contains(r#""products"."owner_name" = 'alice'"#));
        assert!(!sql.contains(r#""products"."name" = "#));
        assert!(sql.ends_with(r#"ORDER BY "products"."id" ASC"#));
    }

    #[test]
    fn test_list_query_name_filter_is_exact() {
        let sql = sql(ProductStore::list_query("alice", "widget", SortKey::Unsorted));

        assert!(sql.contains(r#""products"."name" = 'widget'"#));
    }

    #[test]
    fn test_list_query_ordering() {
        let by_name = sql(ProductStore::list_query("alice", "", SortKey::ByName));
        assert!(by_name.ends_with(r#"ORDER BY "products"."name" ASC"#));

        let newest_first = sql(ProductStore::list_query("alice", "", SortKey::ByLastCreated));
        assert!(newest_first.ends_with(r#"ORDER BY "products"."created_at" DESC"#));
    }

    #[tokio::test]
    async fn test_find_product_maps_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget()]])
            .into_connection();
        let tx = db.begin().await.unwrap();

        let product = ProductStore::new().find_product(&tx, 7).await.unwrap();

        assert_eq!(product.id, 7);
        assert_eq!(product.owner_name, "alice");
        assert_eq!(product.price, 10);
    }

    #[tokio::test]
    async fn test_find_product_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();
        let tx = db.begin().await.unwrap();

        let result = ProductStore::new().find_product(&tx, 99).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_product_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget()]])
            .into_connection();
        let tx = db.begin().await.unwrap();

        let draft = Product::try_from(widget()).unwrap();
        let id = ProductStore::new().create_product(&tx, &draft).await.unwrap();

        assert_eq!(id, 7);
    }

    #[tokio::test]
    async fn test_delete_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let tx = db.begin().await.unwrap();

        let result = ProductStore::new().delete_product(&tx, 7).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_price_beyond_column_range_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let tx = db.begin().await.unwrap();

        let draft = Product::draft("alice", "widget", u64::MAX, 1);
        let result = ProductStore::new().create_product(&tx, &draft).await;

        assert!(matches!(result, Err(RepositoryError::Other(_))));
    }
}
