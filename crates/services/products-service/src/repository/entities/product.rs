//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Product, RepositoryError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub owner_name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Columns carry non-negative CHECK constraints, so a negative value means
/// the row was written outside the application.
impl TryFrom<Model> for Product {
    type Error = RepositoryError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Product {
            id: unsigned("id", model.id)?,
            name: model.name,
            price: unsigned("price", model.price)?,
            quantity: unsigned("quantity", model.quantity)?,
            owner_name: model.owner_name,
            created_at: model.created_at,
        })
    }
}

fn unsigned(column: &'static str, value: i64) -> Result<u64, RepositoryError> {
    u64::try_from(value).map_err(|e| {
        tracing::error!(column, value, "negative value in products row");
        RepositoryError::other(e)
    })
}
