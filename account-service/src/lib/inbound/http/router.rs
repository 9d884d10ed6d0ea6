use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::search_user::search_user;
use crate::domain::user::ports::UserServicePort;

pub struct AppState<S: UserServicePort> {
    pub user_service: Arc<S>,
}

// Derived Clone would require `S: Clone`.
impl<S: UserServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
        }
    }
}

pub fn create_router<S: UserServicePort>(user_service: Arc<S>) -> Router {
    let state = AppState { user_service };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/login", post(login::<S>))
        .route("/user/register", post(register::<S>))
        .route("/user/get/:id", get(get_user::<S>))
        .route("/user/search", get(search_user::<S>))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use chrono::TimeZone;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use mockall::mock;
    use mockall::predicate::eq;
    use serde_json::json;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::models::LoginCommand;
    use crate::domain::user::models::RegisterCommand;
    use crate::domain::user::models::Sex;
    use crate::domain::user::models::Token;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserProfile;
    use crate::domain::user::models::Username;
    use crate::user::errors::UserError;

    mock! {
        pub UserService {}

        #[async_trait]
        impl UserServicePort for UserService {
            async fn login(&self, command: LoginCommand) -> Result<Token, UserError>;
            async fn register(&self, command: RegisterCommand) -> Result<Token, UserError>;
            async fn get_user_by_id(&self, id: &UserId) -> Result<User, UserError>;
            async fn search_user(&self, first_name: &str, last_name: &str) -> Result<User, UserError>;
        }
    }

    fn sample_user() -> User {
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            profile: UserProfile {
                first_name: Some("Alice".to_string()),
                second_name: Some("Smith".to_string()),
                sex: Some(Sex::Female),
                ..UserProfile::default()
            },
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let user_id = UserId::new();
        let mut service = MockUserService::new();
        service
            .expect_login()
            .withf(|command| command.username == "alice" && command.password == "secret")
            .times(1)
            .returning(move |_| {
                Ok(Token {
                    token: "signed.jwt.value".to_string(),
                    user_id,
                })
            });

        let (status, body) = send(
            create_router(Arc::new(service)),
            post_json("/login", json!({"username": "alice", "password": "secret"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_code"], 200);
        assert_eq!(body["data"]["token"], "signed.jwt.value");
        assert_eq!(body["data"]["user_id"], user_id.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_credentials_is_not_found() {
        let mut service = MockUserService::new();
        service.expect_login().returning(|_| {
            Err(UserError::NotFound("no user matches the supplied credentials".to_string())
                .context("login user"))
        });

        let (status, body) = send(
            create_router(Arc::new(service)),
            post_json("/login", json!({"username": "alice", "password": "wrong"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status_code"], 404);
    }

    #[tokio::test]
    async fn test_register_passes_profile_and_returns_created() {
        let mut service = MockUserService::new();
        service
            .expect_register()
            .withf(|command| {
                command.username == "alice"
                    && command.profile.sex == Some(Sex::Female)
                    && command.profile.city.as_deref() == Some("Berlin")
            })
            .times(1)
            .returning(|_| {
                Ok(Token {
                    token: "signed.jwt.value".to_string(),
                    user_id: UserId::new(),
                })
            });

        let (status, body) = send(
            create_router(Arc::new(service)),
            post_json(
                "/user/register",
                json!({
                    "username": "alice",
                    "password": "secret",
                    "sex": "female",
                    "birthdate": "1990-05-17",
                    "city": "Berlin"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["token"], "signed.jwt.value");
    }

    #[tokio::test]
    async fn test_register_unknown_sex_never_reaches_service() {
        let mut service = MockUserService::new();
        service.expect_register().never();

        let (status, _) = send(
            create_router(Arc::new(service)),
            post_json(
                "/user/register",
                json!({"username": "alice", "password": "secret", "sex": "robot"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let mut service = MockUserService::new();
        service.expect_login().never();
        service.expect_register().never();
        let router = create_router(Arc::new(service));

        let (status, body) = send(
            router.clone(),
            Request::post("/login")
                .header("content-type", "application/json")
                .body(Body::from("{\"username\": \"alice\""))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status_code"], 422);
        assert!(body["data"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));

        let (status, body) = send(
            router,
            post_json("/user/register", json!({"username": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status_code"], 422);
    }

    #[tokio::test]
    async fn test_search_missing_parameter_uses_error_envelope() {
        let mut service = MockUserService::new();
        service.expect_search_user().never();

        let (status, body) = send(
            create_router(Arc::new(service)),
            Request::get("/user/search?first_name=Alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["data"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query"));
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let mut service = MockUserService::new();
        service.expect_register().returning(|command| {
            Err(UserError::UsernameAlreadyExists(command.username).context("create user"))
        });

        let (status, body) = send(
            create_router(Arc::new(service)),
            post_json("/user/register", json!({"username": "alice", "password": "secret"})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["data"]["message"], "Username already exists: alice");
    }

    #[tokio::test]
    async fn test_get_user_returns_profile() {
        let user = sample_user();
        let id = user.id;
        let mut service = MockUserService::new();
        service
            .expect_get_user_by_id()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(user.clone()));

        let (status, body) = send(
            create_router(Arc::new(service)),
            Request::get(format!("/user/get/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id.to_string());
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["sex"], "female");
        assert!(body["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_get_user_malformed_id_is_bad_request() {
        let mut service = MockUserService::new();
        service.expect_get_user_by_id().never();

        let (status, _) = send(
            create_router(Arc::new(service)),
            Request::get("/user/get/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_user_by_name() {
        let user = sample_user();
        let mut service = MockUserService::new();
        service
            .expect_search_user()
            .withf(|first, last| first == "Alice" && last == "Smith")
            .times(1)
            .returning(move |_, _| Ok(user.clone()));

        let (status, body) = send(
            create_router(Arc::new(service)),
            Request::get("/user/search?first_name=Alice&last_name=Smith")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["first_name"], "Alice");
    }

    #[tokio::test]
    async fn test_internal_failure_hides_details() {
        let mut service = MockUserService::new();
        service.expect_search_user().returning(|_, _| {
            Err(UserError::DatabaseError("connection failure: refused".to_string())
                .context("search user"))
        });

        let (status, body) = send(
            create_router(Arc::new(service)),
            Request::get("/user/search?first_name=Alice&last_name=Smith")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["data"]["message"], "Internal server error");
    }
}
