//! JSON REST handlers for category reference data.

use axum::Json;
use axum::extract::State;

use lettings_app::ports::{AgentRepository, CategoryRepository, HouseRepository, UserDirectory};
use lettings_domain::category::Category;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/categories`
pub async fn list<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
) -> Result<Json<Vec<Category>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let categories = state.house_service.categories().await?;
    Ok(Json(categories))
}

/// `GET /api/categories/names`
pub async fn names<HR, CR, AR, UD>(
    State(state): State<AppState<HR, CR, AR, UD>>,
) -> Result<Json<Vec<String>>, ApiError>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    let names = state.house_service.category_names().await?;
    Ok(Json(names))
}
