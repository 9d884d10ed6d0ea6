pub mod errors;
pub mod token;
pub mod user;

pub use token::PostgresTokenRepository;
pub use user::PostgresUserRepository;
