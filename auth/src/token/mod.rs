pub mod clock;
pub mod generator;

pub use clock::Clock;
pub use clock::SystemClock;
pub use generator::IssuedToken;
pub use generator::TokenGenerator;
pub use generator::TokenSubject;
