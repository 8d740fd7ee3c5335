use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::error::AppError;

/// The authenticated identity of the current request, read from the claims
/// stored in request extensions by `middleware::identity`.
///
/// Routes behind the authorization gate always have claims attached; using
/// this extractor on an exempt route yields 401 when no token was sent.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();

        ready(match claims {
            Some(claims) => Uuid::parse_str(&claims.sub)
                .map(|id| CurrentUser {
                    id,
                    name: claims.name,
                    email: claims.email,
                })
                .map_err(|_| AppError::unauthorized()),
            None => Err(AppError::unauthorized()),
        })
    }
}
