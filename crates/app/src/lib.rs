//! # lettings-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HouseRepository` — persistence for houses
//!   - `AgentRepository` — persistence for agents
//!   - `CategoryRepository` — read access to category reference data
//!   - `UserDirectory` — records identity-provider user contact details
//! - Define **driving/inbound ports** as use-case structs:
//!   - `HouseService` — listing queries, create/edit/delete, rent/leave
//!   - `AgentService` — agent registration and lookup
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `lettings-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
