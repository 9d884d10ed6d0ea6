use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Sex;
use crate::domain::user::models::UserProfile;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::ProfileError;

pub async fn register<S: UserServicePort>(
    State(state): State<AppState<S>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::CREATED, token.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    second_name: Option<String>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    birthdate: Option<NaiveDate>,
    #[serde(default)]
    biography: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ProfileError> {
        let sex = self.sex.as_deref().map(str::parse::<Sex>).transpose()?;

        Ok(
            RegisterCommand::new(self.username, self.password).with_profile(UserProfile {
                first_name: self.first_name,
                second_name: self.second_name,
                sex,
                birthdate: self.birthdate,
                biography: self.biography,
                city: self.city,
            }),
        )
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid profile: {err}"))
    }
}
