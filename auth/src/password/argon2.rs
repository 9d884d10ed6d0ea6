use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Deterministic credential hasher.
///
/// Uses Argon2id with default parameters and a single site-wide salt, so the
/// same plaintext always produces the same PHC string. Stored hashes can then
/// be matched by plain equality.
#[derive(Clone)]
pub struct PasswordHasher {
    salt: SaltString,
}

impl PasswordHasher {
    /// Smallest accepted salt, in raw bytes.
    pub const MIN_SALT_LENGTH: usize = 8;

    /// Largest accepted salt, in raw bytes (64 characters once B64-encoded).
    pub const MAX_SALT_LENGTH: usize = 48;

    /// Create a hasher bound to the given site-wide salt.
    ///
    /// # Arguments
    /// * `salt` - Raw salt bytes, shared by every hash this instance produces
    ///
    /// # Returns
    /// PasswordHasher instance configured with Argon2id defaults
    ///
    /// # Errors
    /// * `InvalidSalt` - Salt is shorter than 8 or longer than 48 bytes
    pub fn new(salt: &[u8]) -> Result<Self, PasswordError> {
        if salt.len() < Self::MIN_SALT_LENGTH || salt.len() > Self::MAX_SALT_LENGTH {
            return Err(PasswordError::InvalidSalt(format!(
                "expected {} to {} bytes, got {}",
                Self::MIN_SALT_LENGTH,
                Self::MAX_SALT_LENGTH,
                salt.len()
            )));
        }

        let salt =
            SaltString::encode_b64(salt).map_err(|e| PasswordError::InvalidSalt(e.to_string()))?;

        Ok(Self { salt })
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Argon2::default()
            .hash_password(password.as_bytes(), &self.salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}
