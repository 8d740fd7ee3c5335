mod common;

use std::time::{Duration, SystemTime};

use actix_web::http::Method;
use actix_web::{test, web, App, HttpResponse};
use backend::auth::jwt::mint_token;
use backend::error::AppError;
use backend::extractors::current_user::CurrentUser;
use backend::middleware::auth_gate::RequireAuth;
use backend::middleware::identity::IdentityExtract;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use common::{assert_error_body, bearer, TEST_SECRET};

const SUBJECT: &str = "11111111-1111-1111-1111-111111111111";

async fn private_echo(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "subject": user.id })))
}

async fn public_ping() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "pong": true }))
}

fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::without_db(SecurityConfig::new(
        TEST_SECRET.as_bytes(),
    )))
}

macro_rules! gate_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data($state.clone()).service(
                web::scope("/api")
                    .wrap(RequireAuth::new().exempt(Method::POST, "/api/public"))
                    .wrap(IdentityExtract)
                    .route("/public", web::post().to(public_ping))
                    .route("/private", web::get().to(private_echo)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn test_protected_route_without_identity_is_unauthorized() {
    let state = test_state();
    let app = gate_app!(state);

    let req = test::TestRequest::get().uri("/api/private").to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_body(resp, 401, "Unauthorized").await;
}

#[actix_web::test]
async fn test_exempt_route_passes_without_identity() {
    let state = test_state();
    let app = gate_app!(state);

    let req = test::TestRequest::post().uri("/api/public").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_web::test]
async fn test_valid_bearer_reaches_handler_with_subject() {
    let state = test_state();
    let app = gate_app!(state);

    let token = mint_token(
        SUBJECT,
        "Jane Doe",
        "jane@example.com",
        1440,
        SystemTime::now(),
        &state.security,
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/private")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["subject"], SUBJECT);
}

#[actix_web::test]
async fn test_garbage_bearer_is_unauthorized() {
    let state = test_state();
    let app = gate_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/private")
        .insert_header(bearer("garbage.not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_body(resp, 401, "Unauthorized").await;
}

#[actix_web::test]
async fn test_expired_bearer_is_unauthorized() {
    let state = test_state();
    let app = gate_app!(state);

    // Minted two hours ago with a 10-minute lifetime
    let token = mint_token(
        SUBJECT,
        "Jane Doe",
        "jane@example.com",
        10,
        SystemTime::now() - Duration::from_secs(2 * 60 * 60),
        &state.security,
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/private")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_body(resp, 401, "Unauthorized").await;
}

#[actix_web::test]
async fn test_bearer_signed_with_other_key_is_unauthorized() {
    let state = test_state();
    let app = gate_app!(state);

    let other = SecurityConfig::new("a_completely_different_signing_key".as_bytes());
    let token = mint_token(
        SUBJECT,
        "Jane Doe",
        "jane@example.com",
        1440,
        SystemTime::now(),
        &other,
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/private")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_error_body(resp, 401, "Unauthorized").await;
}
