use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::ProfileError;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a registered, non-deleted account profile. The password hash
/// never leaves storage.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(ProfileError::UnknownSex(s.to_string())),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional profile fields of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub sex: Option<Sex>,
    pub birthdate: Option<NaiveDate>,
    pub biography: Option<String>,
    pub city: Option<String>,
}

impl UserProfile {
    const MAX_NAME_LENGTH: usize = 100;
    const MAX_CITY_LENGTH: usize = 100;
    const MAX_BIOGRAPHY_LENGTH: usize = 1000;

    /// Check field lengths and that the birthdate is not in the future.
    ///
    /// # Errors
    /// * `TooLong` - A text field exceeds its limit
    /// * `BirthdateInFuture` - Birthdate is after today (UTC)
    pub fn validate(&self) -> Result<(), ProfileError> {
        check_length("first name", &self.first_name, Self::MAX_NAME_LENGTH)?;
        check_length("second name", &self.second_name, Self::MAX_NAME_LENGTH)?;
        check_length("city", &self.city, Self::MAX_CITY_LENGTH)?;
        check_length("biography", &self.biography, Self::MAX_BIOGRAPHY_LENGTH)?;

        if let Some(birthdate) = self.birthdate {
            if birthdate > Utc::now().date_naive() {
                return Err(ProfileError::BirthdateInFuture(birthdate));
            }
        }

        Ok(())
    }
}

fn check_length(
    field: &'static str,
    value: &Option<String>,
    max: usize,
) -> Result<(), ProfileError> {
    match value {
        Some(value) if value.chars().count() > max => Err(ProfileError::TooLong {
            field,
            max,
            actual: value.chars().count(),
        }),
        _ => Ok(()),
    }
}

/// Input to account creation.
///
/// The ID is generated by the service; storage never assigns one.
#[derive(Debug, Clone)]
pub struct UserRegister {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub profile: UserProfile,
}

impl UserRegister {
    /// Validate the registration before it reaches storage.
    ///
    /// # Returns
    /// The validated username
    ///
    /// # Errors
    /// * `InvalidUsername` - Username breaks length or character rules
    /// * `EmptyPassword` - Password hash is empty
    /// * `InvalidProfile` - A profile field is invalid
    pub fn validate(&self) -> Result<Username, UserError> {
        let username = Username::new(self.username.clone())?;
        if self.password_hash.is_empty() {
            return Err(UserError::EmptyPassword);
        }
        self.profile.validate()?;
        Ok(username)
    }
}

/// Credentials matched against storage by exact equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLogin {
    pub username: String,
    pub password_hash: String,
}

/// Token record identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub Uuid);

impl TokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Access token handed back after login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token: String,
    pub user_id: UserId,
}

/// Persisted record of an issued token. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWithMetadata {
    pub id: TokenId,
    pub user_id: UserId,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenWithMetadata> for Token {
    fn from(token: TokenWithMetadata) -> Self {
        Self {
            token: token.token,
            user_id: token.user_id,
        }
    }
}

/// Command to authenticate with a plaintext password
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Command to create an account and issue its first token
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: String,
    pub password: String,
    pub profile: UserProfile,
}

impl RegisterCommand {
    /// Construct a register command without profile fields.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            profile: UserProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }
}
