use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_user<S: UserServicePort>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .get_user_by_id(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub id: String,
    pub username: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub sex: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub biography: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            first_name: user.profile.first_name.clone(),
            second_name: user.profile.second_name.clone(),
            sex: user.profile.sex.map(|sex| sex.to_string()),
            birthdate: user.profile.birthdate,
            biography: user.profile.biography.clone(),
            city: user.profile.city.clone(),
            created_at: user.created_at,
        }
    }
}
