//! Authenticator: registration, login and bearer token verification.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET` and carry the user's email
//! (`sub`), role and id. They are stateless; nothing is persisted at login.

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use services::{AuthService, PasswordService, TokenService};
