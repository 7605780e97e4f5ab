//! Auth Service Library
//!
//! Registration and login on top of a credential hasher, a token issuer and
//! an auth repository. Every call runs inside a transaction owned by the
//! caller.

pub mod crypto;
pub mod repository;
pub mod service;

pub use crypto::{Argon2Hasher, Claims, CredentialError, CredentialHasher, JwtIssuer, TokenError, TokenIssuer};
pub use repository::{AuthRepository, AuthStore};
pub use service::{AuthService, Authenticator};
