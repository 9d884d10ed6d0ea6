//! Credential primitives for the account service.
//!
//! - Deterministic password hashing (Argon2id with a site-wide salt)
//! - JWT encoding and validation
//! - Access token issuance with a fixed time-to-live
//!
//! The service defines its own ports and adapts these implementations, so the
//! crate carries no knowledge of users or storage.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(b"site-wide-salt").unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert_eq!(hash, hasher.hash("my_password").unwrap());
//! ```
//!
//! ## Token Issuance
//! ```
//! use auth::{TokenGenerator, TokenSubject};
//! use chrono::Duration;
//!
//! let generator =
//!     TokenGenerator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let issued = generator
//!     .generate_token(&TokenSubject {
//!         user_id: "user123",
//!         username: "alice",
//!         token_id: "token456",
//!     })
//!     .unwrap();
//! assert_eq!(issued.expires_at - issued.issued_at, Duration::hours(24));
//!
//! let claims = generator.validate_token(&issued.token).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("user123"));
//! ```

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Clock;
pub use token::IssuedToken;
pub use token::SystemClock;
pub use token::TokenGenerator;
pub use token::TokenSubject;
