//! Domain-level constants.
//!
//! Token, statistics and listing defaults shared across services.

// =============================================================================
// Authentication
// =============================================================================

/// Default token lifetime in minutes. There is no refresh flow.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 5;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Statistics
// =============================================================================

/// Stream that receives one entry per product view
pub const PRODUCTS_STATISTICS_STREAM: &str = "products_statistics";

// =============================================================================
// Product listing
// =============================================================================

/// Query value selecting newest-first ordering
pub const SORT_BY_LAST_CREATED: &str = "last_create";

/// Query value selecting lexicographic ordering by name
pub const SORT_BY_NAME: &str = "name";
