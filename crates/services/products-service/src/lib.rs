//! Products Service Library
//!
//! Ownership-scoped product CRUD. Reads of a single product are reported to
//! a statistics stream. Every call runs inside a transaction owned by the
//! caller.

pub mod repository;
pub mod service;
pub mod statistics;

pub use repository::{ProductStore, ProductsRepository};
pub use service::{ProductManager, ProductsService};
pub use statistics::{RedisStatisticsSink, StatisticsError, StatisticsSink};
