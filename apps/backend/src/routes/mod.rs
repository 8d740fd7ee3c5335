use actix_web::http::Method;
use actix_web::web;

pub mod accounts;
pub mod categories;
pub mod email;
pub mod health;
pub mod transactions;
pub mod users;

use crate::middleware::auth_gate::RequireAuth;
use crate::middleware::identity::IdentityExtract;

/// The gate for everything under `/api`, with the routes that must work
/// without an identity declared exempt at registration time.
pub fn api_gate() -> RequireAuth {
    RequireAuth::new()
        .exempt(Method::POST, "/api/users")
        .exempt(Method::POST, "/api/users/login")
        .exempt(Method::POST, "/api/email/confirmation")
        .exempt(Method::POST, "/api/email/verify")
}

/// Register all application routes. Used by `main` and by the integration
/// tests, so both run the same middleware chain.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // /health sits outside the gated scope
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // wrap() layers run outside-in in reverse registration order:
    // IdentityExtract (registered last) attaches claims before the gate
    // decides.
    cfg.service(
        web::scope("/api")
            .wrap(api_gate())
            .wrap(IdentityExtract)
            .service(web::scope("/users").configure(users::configure_routes))
            .service(web::scope("/accounts").configure(accounts::configure_routes))
            .service(web::scope("/categories").configure(categories::configure_routes))
            .service(web::scope("/transactions").configure(transactions::configure_routes))
            .service(web::scope("/email").configure(email::configure_routes)),
    );
}
