//! # lettings-domain
//!
//! Pure domain model for the lettings listing service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define **Houses** (rental listings with an availability state)
//! - Define **Agents** (users allowed to list houses)
//! - Define **Categories** (static reference data houses belong to)
//! - Define the input shapes and their explicit validation functions
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod agent;
pub mod category;
pub mod house;
