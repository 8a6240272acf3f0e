//! Storage ports — repository traits for persistence.
//!
//! The ports are use-case boundaries, not table mirrors:
//! [`AgentRepository::user_has_rents`] answers a question owned by the
//! agent-registration use-case even though the rows it inspects are
//! house rows.

use std::future::Future;

use lettings_domain::category::Category;
use lettings_domain::error::LettingsError;
use lettings_domain::house::{House, HouseInput};
use lettings_domain::id::{AgentId, CategoryId, HouseId, UserId};

/// A house joined with its category name, as fetched for the browse
/// listing (the category filter matches on the name, not the id).
#[derive(Debug, Clone, PartialEq)]
pub struct HouseRecord {
    pub house: House,
    pub category_name: String,
}

/// Contact details of the agent owning a house, joined with the email
/// recorded for the agent's user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseOwner {
    pub user_id: UserId,
    pub phone_number: String,
    pub email: Option<String>,
}

/// Persistence port for houses.
///
/// Mutations report whether a row was affected so services can turn a
/// silent miss into a typed `NotFound` instead of trusting callers to
/// have checked existence first.
pub trait HouseRepository {
    /// Insert a new house owned by `agent_id`, returning the assigned id.
    fn insert(
        &self,
        input: &HouseInput,
        agent_id: AgentId,
    ) -> impl Future<Output = Result<HouseId, LettingsError>> + Send;

    fn get(&self, id: HouseId)
    -> impl Future<Output = Result<Option<House>, LettingsError>> + Send;

    /// Fetch all houses joined with their category names.
    fn list(&self) -> impl Future<Output = Result<Vec<HouseRecord>, LettingsError>> + Send;

    fn by_agent(
        &self,
        agent_id: AgentId,
    ) -> impl Future<Output = Result<Vec<House>, LettingsError>> + Send;

    fn by_renter(
        &self,
        renter: &UserId,
    ) -> impl Future<Output = Result<Vec<House>, LettingsError>> + Send;

    /// Replace every mutable field. Returns `false` when no row matched.
    fn update(
        &self,
        id: HouseId,
        input: &HouseInput,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send;

    /// Returns `false` when no row matched.
    fn delete(&self, id: HouseId) -> impl Future<Output = Result<bool, LettingsError>> + Send;

    /// Unconditionally set or clear the renter. Returns `false` when no
    /// row matched.
    fn set_renter(
        &self,
        id: HouseId,
        renter: Option<&UserId>,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send;

    /// Conditionally set the renter only while the house is vacant
    /// (compare-and-swap on `renter_id` being null). Returns `false`
    /// when the house was missing or already rented.
    fn rent_if_vacant(
        &self,
        id: HouseId,
        renter: &UserId,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send;

    /// Contact details of the owning agent, or `None` when the house is
    /// missing.
    fn owner(
        &self,
        id: HouseId,
    ) -> impl Future<Output = Result<Option<HouseOwner>, LettingsError>> + Send;
}

/// Persistence port for agents.
pub trait AgentRepository {
    /// Insert a new agent row, returning the assigned id.
    ///
    /// Implementations back the uniqueness of `user_id` and
    /// `phone_number` with storage constraints and surface a violation
    /// as [`LettingsError::Conflict`], closing the concurrent
    /// registration race the pre-checks alone cannot.
    fn insert(
        &self,
        user_id: &UserId,
        phone_number: &str,
    ) -> impl Future<Output = Result<AgentId, LettingsError>> + Send;

    fn exists_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send;

    fn phone_exists(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send;

    fn id_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<AgentId>, LettingsError>> + Send;

    /// Whether any house is currently rented by this user.
    fn user_has_rents(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<bool, LettingsError>> + Send;
}

/// Read port for category reference data.
pub trait CategoryRepository {
    fn list(&self) -> impl Future<Output = Result<Vec<Category>, LettingsError>> + Send;

    fn exists(&self, id: CategoryId) -> impl Future<Output = Result<bool, LettingsError>> + Send;

    fn name(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<Option<String>, LettingsError>> + Send;
}

/// Records user contact details supplied by the identity provider, so
/// house details can surface the owning agent's email.
pub trait UserDirectory {
    /// Upsert the email recorded for a user. A `None` email still
    /// records the user row.
    fn record(
        &self,
        user_id: &UserId,
        email: Option<&str>,
    ) -> impl Future<Output = Result<(), LettingsError>> + Send;
}
