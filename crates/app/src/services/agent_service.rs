//! Agent service — use-cases for agent registration and lookup.

use lettings_domain::agent::AgentInput;
use lettings_domain::error::{ConflictError, LettingsError, NotFoundError};
use lettings_domain::id::{AgentId, UserId};

use crate::ports::AgentRepository;

/// Application service for agent registration and lookup.
pub struct AgentService<R> {
    repo: R,
}

impl<R: AgentRepository> AgentService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Whether an agent row exists for this user.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn exists_by_user(&self, user_id: &UserId) -> Result<bool, LettingsError> {
        self.repo.exists_by_user(user_id).await
    }

    /// Whether any agent already uses this phone number.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn phone_number_exists(&self, phone_number: &str) -> Result<bool, LettingsError> {
        self.repo.phone_exists(phone_number).await
    }

    /// Whether the user currently rents any house, which blocks
    /// becoming an agent.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn user_has_rents(&self, user_id: &UserId) -> Result<bool, LettingsError> {
        self.repo.user_has_rents(user_id).await
    }

    /// Register the user as an agent.
    ///
    /// Runs every precondition itself rather than trusting the caller:
    /// the checks reject early with a typed error, and the storage
    /// uniqueness constraints catch whatever slips between concurrent
    /// registrations.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::Validation`] for a malformed phone
    /// number, or [`LettingsError::Conflict`] when the user is already
    /// an agent, the phone number is taken, or the user holds active
    /// rents.
    pub async fn create(
        &self,
        user_id: &UserId,
        input: &AgentInput,
    ) -> Result<AgentId, LettingsError> {
        input.validate()?;
        if self.repo.exists_by_user(user_id).await? {
            return Err(ConflictError::AlreadyAgent.into());
        }
        if self.repo.phone_exists(&input.phone_number).await? {
            return Err(ConflictError::PhoneNumberTaken.into());
        }
        if self.repo.user_has_rents(user_id).await? {
            return Err(ConflictError::ActiveRents.into());
        }
        let id = self.repo.insert(user_id, &input.phone_number).await?;
        tracing::info!(agent_id = %id, "agent registered");
        Ok(id)
    }

    /// Look up the agent id for a user.
    ///
    /// # Errors
    ///
    /// Returns [`LettingsError::NotFound`] when no agent exists for the
    /// user, or a storage error from the repository.
    pub async fn agent_id(&self, user_id: &UserId) -> Result<AgentId, LettingsError> {
        self.repo.id_by_user(user_id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Agent",
                id: user_id.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettings_domain::agent::Agent;
    use lettings_domain::error::Violation;
    use std::collections::HashSet;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryAgentRepo {
        agents: Mutex<Vec<Agent>>,
        renters: Mutex<HashSet<String>>,
    }

    impl AgentRepository for InMemoryAgentRepo {
        fn insert(
            &self,
            user_id: &UserId,
            phone_number: &str,
        ) -> impl Future<Output = Result<AgentId, LettingsError>> + Send {
            let mut agents = self.agents.lock().unwrap();
            let id = AgentId::new(agents.len() as i64 + 1);
            agents.push(Agent {
                id,
                user_id: user_id.clone(),
                phone_number: phone_number.to_string(),
            });
            async move { Ok(id) }
        }

        fn exists_by_user(
            &self,
            user_id: &UserId,
        ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
            let found = self
                .agents
                .lock()
                .unwrap()
                .iter()
                .any(|a| &a.user_id == user_id);
            async move { Ok(found) }
        }

        fn phone_exists(
            &self,
            phone_number: &str,
        ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
            let found = self
                .agents
                .lock()
                .unwrap()
                .iter()
                .any(|a| a.phone_number == phone_number);
            async move { Ok(found) }
        }

        fn id_by_user(
            &self,
            user_id: &UserId,
        ) -> impl Future<Output = Result<Option<AgentId>, LettingsError>> + Send {
            let found = self
                .agents
                .lock()
                .unwrap()
                .iter()
                .find(|a| &a.user_id == user_id)
                .map(|a| a.id);
            async move { Ok(found) }
        }

        fn user_has_rents(
            &self,
            user_id: &UserId,
        ) -> impl Future<Output = Result<bool, LettingsError>> + Send {
            let found = self.renters.lock().unwrap().contains(user_id.as_str());
            async move { Ok(found) }
        }
    }

    fn make_service() -> AgentService<InMemoryAgentRepo> {
        AgentService::new(InMemoryAgentRepo::default())
    }

    fn phone(suffix: &str) -> AgentInput {
        AgentInput {
            phone_number: format!("+35988{suffix}"),
        }
    }

    #[tokio::test]
    async fn should_register_agent_and_resolve_id() {
        let svc = make_service();
        let user = UserId::new("user-1");

        let id = svc.create(&user, &phone("11111")).await.unwrap();

        assert!(svc.exists_by_user(&user).await.unwrap());
        assert_eq!(svc.agent_id(&user).await.unwrap(), id);
    }

    #[tokio::test]
    async fn should_reject_duplicate_phone_number_before_inserting() {
        let svc = make_service();
        svc.create(&UserId::new("user-1"), &phone("11111"))
            .await
            .unwrap();

        let result = svc.create(&UserId::new("user-2"), &phone("11111")).await;

        assert!(matches!(
            result,
            Err(LettingsError::Conflict(ConflictError::PhoneNumberTaken))
        ));
        assert_eq!(svc.repo.agents.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_second_registration_for_same_user() {
        let svc = make_service();
        let user = UserId::new("user-1");
        svc.create(&user, &phone("11111")).await.unwrap();

        let result = svc.create(&user, &phone("22222")).await;

        assert!(matches!(
            result,
            Err(LettingsError::Conflict(ConflictError::AlreadyAgent))
        ));
    }

    #[tokio::test]
    async fn should_reject_user_with_active_rents() {
        let svc = make_service();
        let user = UserId::new("renter-1");
        svc.repo
            .renters
            .lock()
            .unwrap()
            .insert(user.as_str().to_string());

        let result = svc.create(&user, &phone("11111")).await;

        assert!(matches!(
            result,
            Err(LettingsError::Conflict(ConflictError::ActiveRents))
        ));
    }

    #[tokio::test]
    async fn should_reject_malformed_phone_number() {
        let svc = make_service();
        let input = AgentInput {
            phone_number: "123".to_string(),
        };

        let result = svc.create(&UserId::new("user-1"), &input).await;

        match result {
            Err(LettingsError::Validation(errors)) => {
                assert!(matches!(errors.0.as_slice(), [Violation::Length { .. }]));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_user() {
        let svc = make_service();
        let result = svc.agent_id(&UserId::new("nobody")).await;
        assert!(matches!(result, Err(LettingsError::NotFound(_))));
    }
}
