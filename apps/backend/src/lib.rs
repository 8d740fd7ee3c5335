#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use auth::jwt::{mint_token, validate_token, verify_token, Claims};
pub use auth::password::{hash_password, verify_password};
pub use config::AppConfig;
pub use error::AppError;
pub use extractors::current_user::CurrentUser;
pub use middleware::auth_gate::RequireAuth;
pub use middleware::cors::cors_middleware;
pub use middleware::identity::IdentityExtract;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;
