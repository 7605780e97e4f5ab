//! Password hashing and identity tokens.

mod hasher;
mod token;

pub use hasher::{Argon2Hasher, CredentialError, CredentialHasher};
pub use token::{Claims, JwtIssuer, TokenError, TokenIssuer};

#[cfg(any(test, feature = "test-utils"))]
pub use hasher::MockCredentialHasher;
#[cfg(any(test, feature = "test-utils"))]
pub use token::MockTokenIssuer;
