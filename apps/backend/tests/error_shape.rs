mod common;

use actix_web::{test, web, App, HttpResponse};
use backend::error::AppError;
use common::assert_error_body;

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found("The account does not exist"))
}

async fn invalid() -> Result<HttpResponse, AppError> {
    Err(AppError::bad_request("The category does not exist"))
}

async fn failed_send() -> Result<HttpResponse, AppError> {
    Err(AppError::internal_with_exception(
        "Failed to send email",
        "connection refused",
    ))
}

#[actix_web::test]
async fn test_error_body_shape() {
    let app = test::init_service(
        App::new()
            .route("/not-found", web::get().to(not_found))
            .route("/invalid", web::get().to(invalid))
            .route("/failed-send", web::get().to(failed_send)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/not-found").to_request())
        .await;
    assert_error_body(resp, 404, "The account does not exist").await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/invalid").to_request()).await;
    assert_error_body(resp, 400, "The category does not exist").await;
}

#[actix_web::test]
async fn test_internal_error_carries_exception_detail() {
    let app = test::init_service(
        App::new().route("/failed-send", web::get().to(failed_send)),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/failed-send").to_request(),
    )
    .await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to send email");
    assert_eq!(body["exception"], "connection refused");
}

#[actix_web::test]
async fn test_client_errors_omit_exception_field() {
    let app =
        test::init_service(App::new().route("/invalid", web::get().to(invalid))).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/invalid").to_request()).await;

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("exception").is_none());
}
