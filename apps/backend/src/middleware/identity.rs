//! Identity extraction middleware.
//!
//! Runs on every request: strips the `Bearer ` prefix from the
//! `Authorization` header, validates the token, and on success stores the
//! [`Claims`] in request extensions. It never rejects a request; deciding
//! whether identity is required is the authorization gate's job
//! (`middleware::auth_gate`).

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, Ready};

use crate::auth::jwt::validate_token;
use crate::state::app_state::AppState;

pub struct IdentityExtract;

impl<S, B> Transform<S, ServiceRequest> for IdentityExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityExtractMiddleware { service }))
    }
}

pub struct IdentityExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for IdentityExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let security = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.security.clone());

        if let Some(security) = security {
            let bearer = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned);

            if let Some(token) = bearer {
                if let Some(claims) = validate_token(&token, &security) {
                    req.extensions_mut().insert(claims);
                }
            }
        }

        self.service.call(req)
    }
}
