//! Error taxonomy shared across the workspace.
//!
//! Every layer defines its own typed errors and converts into
//! [`LettingsError`] via `#[from]`. Storage adapters box their
//! transport-specific errors into the [`LettingsError::Storage`]
//! variant so the domain stays free of IO types.

use std::fmt;

use serde::Serialize;

use crate::id::CategoryId;

/// Top-level error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum LettingsError {
    /// Input failed one or more explicit validation checks.
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// A referenced entity has no matching row.
    #[error("entity not found")]
    NotFound(#[from] NotFoundError),

    /// A uniqueness or state precondition was violated.
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// The caller is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized(#[from] UnauthorizedError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A single field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A required string field is empty.
    #[error("{field} must not be empty")]
    Required { field: &'static str },

    /// A string field is outside its allowed length range.
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    /// The monthly price is non-positive or above the allowed maximum.
    #[error("price per month must be positive and at most {max}")]
    PriceOutOfRange { max: u32 },

    /// The referenced category does not exist.
    #[error("category {0} does not exist")]
    UnknownCategory(CategoryId),
}

/// The full list of violations found in one input shape.
///
/// Validation never stops at the first problem: callers get every
/// violation at once, the way a form surfaces all field errors together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<Violation>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

/// An entity id with no matching row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with id {id} not found")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"House"`.
    pub entity: &'static str,
    /// The id that failed to resolve, as text.
    pub id: String,
}

/// Uniqueness or state preconditions that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    /// The user is already registered as an agent.
    #[error("user is already an agent")]
    AlreadyAgent,

    /// Another agent already uses this phone number.
    #[error("phone number is already in use")]
    PhoneNumberTaken,

    /// A user with active rents cannot become an agent.
    #[error("user holds active rents")]
    ActiveRents,

    /// The house already has a renter.
    #[error("house is already rented")]
    HouseAlreadyRented,
}

/// Caller-identity checks that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnauthorizedError {
    /// The operation requires the caller to be a registered agent.
    #[error("caller is not an agent")]
    AgentRequired,

    /// The caller is not the agent who listed the house.
    #[error("caller does not own this house")]
    NotOwner,

    /// Agents may not rent houses.
    #[error("agents cannot rent houses")]
    AgentsCannotRent,

    /// The caller is not the current renter of the house.
    #[error("caller is not the renter of this house")]
    NotRenter,
}
