use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;

use super::clock::Clock;
use super::clock::SystemClock;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Identity a token is issued for.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    /// Identifier of the token record, embedded as the `jti` claim
    pub token_id: &'a str,
}

/// Signed token together with the lifetime it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues signed access tokens with a fixed time-to-live.
///
/// Every call reads the clock afresh, so successive tokens get independent,
/// correctly ordered expiries.
pub struct TokenGenerator<C: Clock = SystemClock> {
    jwt_handler: JwtHandler,
    ttl: Duration,
    issuer: Option<String>,
    clock: C,
}

impl TokenGenerator {
    /// Create a generator backed by the system clock.
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret
    /// * `ttl` - Lifetime applied to every issued token
    ///
    /// # Errors
    /// * `MissingKey` - Secret is empty
    /// * `InvalidTtl` - Lifetime is zero or negative
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, JwtError> {
        Self::with_clock(secret, ttl, SystemClock)
    }
}

impl<C: Clock> TokenGenerator<C> {
    /// Create a generator reading time from `clock`.
    ///
    /// # Errors
    /// * `MissingKey` - Secret is empty
    /// * `InvalidTtl` - Lifetime is zero, negative, or pushes expiry out of range
    pub fn with_clock(secret: &[u8], ttl: Duration, clock: C) -> Result<Self, JwtError> {
        if ttl <= Duration::zero() || clock.now().checked_add_signed(ttl).is_none() {
            return Err(JwtError::InvalidTtl(ttl.num_seconds()));
        }

        Ok(Self {
            jwt_handler: JwtHandler::new(secret)?,
            ttl,
            issuer: None,
            clock,
        })
    }

    /// Set the `iss` claim stamped on every token.
    pub fn with_issuer(mut self, issuer: impl ToString) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Expiry instant for a token issued right now.
    ///
    /// # Errors
    /// * `InvalidTtl` - Expiry is out of the representable range
    pub fn expiration_date(&self) -> Result<DateTime<Utc>, JwtError> {
        self.expiry_from(self.now())
    }

    fn expiry_from(&self, issued_at: DateTime<Utc>) -> Result<DateTime<Utc>, JwtError> {
        issued_at
            .checked_add_signed(self.ttl)
            .ok_or(JwtError::InvalidTtl(self.ttl.num_seconds()))
    }

    // Millisecond precision survives a round trip through storage unchanged.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    /// Generate a signed token for `subject`.
    ///
    /// The issuance and expiry instants come from a single clock reading, so
    /// `expires_at - issued_at` always equals the configured TTL.
    ///
    /// # Errors
    /// * `InvalidTtl` - Expiry is out of the representable range
    /// * `EncodingFailed` - Signing failed
    pub fn generate_token(&self, subject: &TokenSubject<'_>) -> Result<IssuedToken, JwtError> {
        let issued_at = self.now();
        let expires_at = self.expiry_from(issued_at)?;

        let mut claims = Claims::for_user(subject.user_id, subject.username, issued_at, expires_at)
            .with_token_id(subject.token_id);
        if let Some(issuer) = &self.issuer {
            claims = claims.with_issuer(issuer);
        }

        let token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verify a token issued by this generator and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `DecodingFailed` - Token is malformed or was signed with another key
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
