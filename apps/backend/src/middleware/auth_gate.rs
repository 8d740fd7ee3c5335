//! Authorization gate.
//!
//! Single-pass, per-request decision over the identity attached by
//! `middleware::identity`:
//!
//! 1. routes registered as exempt pass unconditionally;
//! 2. requests with no identity are short-circuited with HTTP 401 and the
//!    body `{"error": "Unauthorized"}`; the handler never runs;
//! 3. everything else passes, and handlers read the identity through the
//!    `CurrentUser` extractor.
//!
//! Exemptions are explicit `(method, path)` pairs declared at
//! route-registration time.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, Either, Ready};

use crate::auth::jwt::Claims;
use crate::error::AppError;

#[derive(Clone, Default)]
pub struct RequireAuth {
    exempt: Rc<Vec<(Method, String)>>,
}

impl RequireAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route that bypasses the gate entirely.
    pub fn exempt(mut self, method: Method, path: &str) -> Self {
        Rc::make_mut(&mut self.exempt)
            .push((method, path.trim_end_matches('/').to_string()));
        self
    }

    fn is_exempt(&self, method: &Method, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        self.exempt
            .iter()
            .any(|(m, p)| m == method && p == path)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service,
            gate: self.clone(),
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: S,
    gate: RequireAuth,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Either<S::Future, Ready<Result<Self::Response, Self::Error>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.gate.is_exempt(req.method(), req.path()) {
            return Either::Left(self.service.call(req));
        }

        if req.extensions().get::<Claims>().is_none() {
            // AppError's ResponseError impl renders the 401 body
            return Either::Right(ready(Err(AppError::unauthorized().into())));
        }

        Either::Left(self.service.call(req))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::Method;

    use super::RequireAuth;

    #[test]
    fn test_exemption_matching() {
        let gate = RequireAuth::new()
            .exempt(Method::POST, "/api/users")
            .exempt(Method::POST, "/api/users/login");

        assert!(gate.is_exempt(&Method::POST, "/api/users"));
        assert!(gate.is_exempt(&Method::POST, "/api/users/"));
        assert!(gate.is_exempt(&Method::POST, "/api/users/login"));

        // same path, different method
        assert!(!gate.is_exempt(&Method::GET, "/api/users"));
        // non-exempt path
        assert!(!gate.is_exempt(&Method::POST, "/api/accounts"));
        // prefix is not enough
        assert!(!gate.is_exempt(&Method::POST, "/api/users/abc"));
    }
}
