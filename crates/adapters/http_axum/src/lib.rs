//! # lettings-adapter-http-axum
//!
//! JSON REST adapter using [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Map HTTP verbs/routes 1:1 onto the application use-cases
//! - Extract the authenticated identity supplied by the upstream
//!   identity provider (`x-user-id` / `x-user-email` headers)
//! - Translate the domain error taxonomy into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `lettings-app` (services and ports) and `lettings-domain`
//! (data shapes). Never referenced by the core crates.

pub mod api;
pub mod error;
pub mod identity;
pub mod router;
pub mod state;
