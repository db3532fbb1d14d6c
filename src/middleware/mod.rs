// Extracteurs d'identité : JWT de session (AuthUser / AdminUser) et token API

pub mod api_token;
pub mod auth;

pub use api_token::ApiTokenAccount;
pub use auth::{AdminUser, AuthUser};
