//! # beacon-identity
//!
//! Resolves abstract notification scopes (tenant, role, platform) into
//! concrete user ids by querying the identity provider's admin API, with a
//! short-lived cache in front of every provider call.

pub mod cache;
pub mod keycloak;
pub mod resolver;

pub use keycloak::KeycloakResolver;
pub use resolver::IdentityResolver;
