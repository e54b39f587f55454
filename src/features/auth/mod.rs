//! Bearer-token authentication for admin and reviewer endpoints.
//!
//! Tokens are issued elsewhere; this feature only verifies RS256 signatures
//! against the issuer's JWKS and exposes the resulting principal.

mod jwks;
mod validator;

pub mod guards;
pub mod model;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
