//! JSON REST handlers for houses.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use lettings_app::ports::{AgentRepository, CategoryRepository, HouseRepository, UserDirectory};
use lettings_domain::error::{NotFoundError, UnauthorizedError};
use lettings_domain::house::{
    HouseDetails, HouseInput, HouseQuery, HouseSorting, HouseSummary,
};
use lettings_domain::id::HouseId;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::state::AppState;

/// Fixed page size of the browse listing.
pub const HOUSES_PER_PAGE: u32 = 3;

/// Query string of the browse listing.
#[derive(Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub search_term: Option<String>,
    #[serde(default)]
    pub sorting: HouseSorting,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// Response body of the browse listing: one page plus the data the
/// filter UI needs.
#[derive(Serialize)]
pub struct ListResponse {
    pub houses: Vec<HouseSummary>,
    pub total_count: u64,
    pub categories: Vec<String>,
}

/// Response body for newly created houses.
#[derive(Serialize)]
pub struct CreatedHouse {
    pub id: HouseId,
}

/// `GET /api/houses`
pub async fn list<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let result = state
        .house_service
        .query(&HouseQuery {
            category: params.category,
            search_term: params.search_term,
            sorting: params.sorting,
            page: params.page,
            per_page: HOUSES_PER_PAGE,
        })
        .await?;
    let categories = state.house_service.category_names().await?;

    Ok(Json(ListResponse {
        houses: result.houses,
        total_count: result.total_count,
        categories,
    }))
}

/// `GET /api/houses/recent`
pub async fn recent<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
) -> Result<Json<Vec<HouseSummary>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let houses = state.house_service.recent(3).await?;
    Ok(Json(houses))
}

/// `GET /api/houses/mine` — the agent's listings, or the rented houses
/// for callers who are not agents.
pub async fn mine<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    identity: Identity,
) -> Result<Json<Vec<HouseSummary>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let houses = if state
        .agent_service
        .exists_by_user(&identity.user_id)
        .await?
    {
        let agent_id = state.agent_service.agent_id(&identity.user_id).await?;
        state.house_service.by_agent(agent_id).await?
    } else {
        state.house_service.by_renter(&identity.user_id).await?
    };

    Ok(Json(houses))
}

/// `GET /api/houses/{id}`
pub async fn get<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    Path(id): Path<i64>,
) -> Result<Json<HouseDetails>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let details = state.house_service.details(HouseId::new(id)).await?;
    Ok(Json(details))
}

/// `POST /api/houses` — agents only.
pub async fn create<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    identity: Identity,
    Json(input): Json<HouseInput>,
) -> Result<(StatusCode, Json<CreatedHouse>), ApiError>
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
    if !state
        .agent_service
        .exists_by_user(&identity.user_id)
        .await?
    {
        return Err(UnauthorizedError::AgentRequired.into());
    }

    let agent_id = state.agent_service.agent_id(&identity.user_id).await?;
    let id = state.house_service.create(&input, agent_id).await?;

    Ok((StatusCode::CREATED, Json(CreatedHouse { id })))
}

/// `PUT /api/houses/{id}` — owning agent only.
pub async fn update<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    identity: Identity,
    Path(id): Path<i64>,
    Json(input): Json<HouseInput>,
) -> Result<StatusCode, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let id = HouseId::new(id);
    require_exists(&state, id).await?;
    require_owner(&state, id, &identity).await?;

    state.house_service.edit(id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/houses/{id}` — owning agent only.
pub async fn delete<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let id = HouseId::new(id);
    require_exists(&state, id).await?;
    require_owner(&state, id, &identity).await?;

    state.house_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/houses/{id}/rent` — agents may not rent; the house must
/// be vacant.
pub async fn rent<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let id = HouseId::new(id);
    state
        .users
        .record(&identity.user_id, identity.email.as_deref())
        .await?;
    require_exists(&state, id).await?;
    if state
        .agent_service
        .exists_by_user(&identity.user_id)
        .await?
    {
        return Err(UnauthorizedError::AgentsCannotRent.into());
    }

    state.house_service.rent(id, &identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/houses/{id}/leave` — current renter only.
pub async fn leave<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let id = HouseId::new(id);
    require_exists(&state, id).await?;
    if !state
        .house_service
        .is_rented_by(id, &identity.user_id)
        .await?
    {
        return Err(UnauthorizedError::NotRenter.into());
    }

    state.house_service.leave(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_exists<HR, CR, AR, UD>(
    state: &AppState<HR, CR, AR, UD>,
    id: HouseId,
) -> Result<(), ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    if state.house_service.exists(id).await? {
        Ok(())
    } else {
        Err(NotFoundError {
            entity: "House",
            id: id.to_string(),
        }
        .into())
    }
}

async fn require_owner<HR, CR, AR, UD>(
    state: &AppState<HR, CR, AR, UD>,
    id: HouseId,
    identity: &Identity,
) -> Result<(), ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    if state.house_service.owned_by(id, &identity.user_id).await? {
        Ok(())
    } else {
        Err(UnauthorizedError::NotOwner.into())
    }
}
