//! Todo API with a JWKS-backed bearer token authorizer.
//!
//! - `services::authorizer`: ALLOW/DENY decisions for `Bearer` tokens (RS256, cached provider certificate)
//! - `api::v1`: gateway authorizer endpoint and the owner-scoped todo CRUD
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
