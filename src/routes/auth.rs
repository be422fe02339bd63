use crate::{
    auth::{AuthenticatedUserId, LoginRequest, SignUpRequest, TokenResponse},
    error::AppError,
    services::IdentityService,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns its public profile.
/// Responds `409 Conflict` when the username or email is already registered.
#[post("/signup")]
pub async fn signup(
    identity: web::Data<IdentityService>,
    signup_data: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    let user = identity.sign_up(signup_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Authenticates a user and returns a bearer token valid for 24 hours.
/// Unknown usernames and wrong passwords get the same `401` response.
#[post("/login")]
pub async fn login(
    identity: web::Data<IdentityService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = identity.log_in(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Current user
///
/// Returns the public profile of the token's owner. Mounted behind `AuthMiddleware`.
pub async fn me(
    identity: web::Data<IdentityService>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = identity.current_user(user_id.0).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::state::AppState;
    use crate::store::MemoryStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_signup_validation() {
        let state =
            AppState::with_store(&AuthConfig::new("route_secret", 4), Arc::new(MemoryStore::new()))
                .unwrap();
        let app = test::init_service(
            App::new()
                .configure(|cfg| state.register(cfg))
                .configure(crate::routes::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({
                "username": "test",
                "email": "invalid-email",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({ "username": "test", "password": "password123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_signup_then_login() {
        let state =
            AppState::with_store(&AuthConfig::new("route_secret", 4), Arc::new(MemoryStore::new()))
                .unwrap();
        let app = test::init_service(
            App::new()
                .configure(|cfg| state.register(cfg))
                .configure(crate::routes::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({
                "username": "alice",
                "email": "alice@x.com",
                "password": "secret1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let user: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(user["username"], "alice");
        assert!(user.get("password_hash").is_none());

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "alice", "password": "secret1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: TokenResponse = test::read_body_json(resp).await;
        assert_eq!(state.tokens.validate(&body.token).ok(), user["id"].as_i64());
    }

    #[actix_rt::test]
    async fn test_me_returns_the_token_owner() {
        let state =
            AppState::with_store(&AuthConfig::new("route_secret", 4), Arc::new(MemoryStore::new()))
                .unwrap();
        let app = test::init_service(
            App::new()
                .configure(|cfg| state.register(cfg))
                .configure(crate::routes::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({
                "username": "carol",
                "email": "carol@x.com",
                "password": "secret1"
            }))
            .to_request();
        let user: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let token = state.tokens.issue(user["id"].as_i64().unwrap()).unwrap();

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .append_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let me: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(me["username"], "carol");
        assert!(me.get("password_hash").is_none());

        let req = test::TestRequest::get().uri("/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
