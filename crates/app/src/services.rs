//! Use-case services built on the storage ports.

pub mod agent_service;
pub mod house_service;

pub use agent_service::AgentService;
pub use house_service::HouseService;
