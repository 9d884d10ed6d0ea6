//! HS256 signing and verification of claim sets.

mod claims;
mod errors;
mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
