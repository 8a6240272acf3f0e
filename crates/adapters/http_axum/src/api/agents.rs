//! JSON REST handlers for agent registration.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use lettings_app::ports::{AgentRepository, CategoryRepository, HouseRepository, UserDirectory};
use lettings_domain::agent::AgentInput;
use lettings_domain::id::AgentId;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::state::AppState;

/// Response body for newly registered agents.
#[derive(Serialize)]
pub struct CreatedAgent {
    pub id: AgentId,
}

/// `POST /api/agents` — become an agent.
pub async fn create<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    identity: Identity,
    Json(input): Json<AgentInput>,
) -> Result<(StatusCode, Json<CreatedAgent>), ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    state
        .users
        .record(&identity.user_id, identity.email.as_deref())
        .await?;

    let id = state.agent_service.create(&identity.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(CreatedAgent { id })))
}
