//! Shared application state for axum handlers.

use std::sync::Arc;

use lettings_app::ports::{AgentRepository, CategoryRepository, HouseRepository, UserDirectory};
use lettings_app::services::{AgentService, HouseService};

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do
/// not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<HR, CR, AR, UD> {
    /// House listing service.
    pub house_service: Arc<HouseService<HR, CR>>,
    /// Agent registration service.
    pub agent_service: Arc<AgentService<AR>>,
    /// Directory recording identity-provider user contacts.
    pub users: Arc<UD>,
}

impl<HR, CR, AR, UD> Clone for AppState<HR, CR, AR, UD> {
    fn clone(&self) -> Self {
        Self {
            house_service: Arc::clone(&self.house_service),
            agent_service: Arc::clone(&self.agent_service),
            users: Arc::clone(&self.users),
        }
    }
}

impl<HR, CR, AR, UD> AppState<HR, CR, AR, UD>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        house_service: HouseService<HR, CR>,
        agent_service: AgentService<AR>,
        users: UD,
    ) -> Self {
        Self {
            house_service: Arc::new(house_service),
            agent_service: Arc::new(agent_service),
            users: Arc::new(users),
        }
    }
}
