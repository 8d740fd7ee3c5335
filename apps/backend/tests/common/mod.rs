#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;

/// Signing key shared by the integration tests.
pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only";

/// Assert status code and the `{"error": ...}` wire body.
pub async fn assert_error_body<B>(resp: ServiceResponse<B>, status: u16, message: &str)
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    assert_eq!(resp.status().as_u16(), status);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], message);
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
