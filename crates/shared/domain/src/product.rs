//! Product domain entity and listing modifiers.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{SORT_BY_LAST_CREATED, SORT_BY_NAME};

/// A product row owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: u64,
    pub quantity: u64,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// A product that has not been stored yet. The repository assigns `id`
    /// and the service stamps `created_at`.
    pub fn draft(owner_name: impl Into<String>, name: impl Into<String>, price: u64, quantity: u64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            price,
            quantity,
            owner_name: owner_name.into(),
            created_at: DateTime::<Utc>::default(),
        }
    }

    pub fn is_owned_by(&self, principal: &str) -> bool {
        self.owner_name == principal
    }
}

/// Product as returned to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductResponse {
    /// Product identifier
    pub id: u64,
    /// Product name
    pub name: String,
    /// Unit price
    pub price: u64,
    /// Units in stock
    pub quantity: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            created_at: product.created_at,
        }
    }
}

/// Ordering applied to a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first
    ByLastCreated,
    /// Lexicographic by name
    ByName,
    /// Whatever order the repository returns
    #[default]
    Unsorted,
}

/// Returned when a sort query value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(SortKey::Unsorted),
            SORT_BY_LAST_CREATED => Ok(SortKey::ByLastCreated),
            SORT_BY_NAME => Ok(SortKey::ByName),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_query_values() {
        assert_eq!("".parse::<SortKey>(), Ok(SortKey::Unsorted));
        assert_eq!("name".parse::<SortKey>(), Ok(SortKey::ByName));
        assert_eq!("last_create".parse::<SortKey>(), Ok(SortKey::ByLastCreated));
    }

    #[test]
    fn sort_key_rejects_unknown_values() {
        let err = "price".parse::<SortKey>().unwrap_err();
        assert_eq!(err, UnknownSortKey("price".to_string()));
    }

    #[test]
    fn ownership_is_exact_match() {
        let product = Product::draft("alice", "widget", 10, 5);
        assert!(product.is_owned_by("alice"));
        assert!(!product.is_owned_by("Alice"));
        assert!(!product.is_owned_by(""));
    }
}
