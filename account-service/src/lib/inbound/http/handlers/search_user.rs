use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::get_user::UserResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn search_user<S: UserServicePort>(
    State(state): State<AppState<S>>,
    params: Result<Query<SearchUserParams>, QueryRejection>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let Query(params) = params?;

    state
        .user_service
        .search_user(&params.first_name, &params.last_name)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchUserParams {
    first_name: String,
    last_name: String,
}
