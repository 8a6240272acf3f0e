//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod agents;
#[allow(clippy::missing_errors_doc)]
pub mod categories;
#[allow(clippy::missing_errors_doc)]
pub mod houses;

use axum::Router;
use axum::routing::{get, post};

use lettings_app::ports::{AgentRepository, CategoryRepository, HouseRepository, UserDirectory};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<HR, CR, AR, UD>() -> Router<AppState<HR, CR, AR, UD>>
where
    HR: HouseRepository + Send + Sync + 'static,
    CR: CategoryRepository + Send + Sync + 'static,
    AR: AgentRepository + Send + Sync + 'static,
    UD: UserDirectory + Send + Sync + 'static,
{
    Router::new()
        // Houses
        .route(
            "/houses",
            get(houses::list::<HR, CR, AR, UD>).post(houses::create::<HR, CR, AR, UD>),
        )
        .route("/houses/recent", get(houses::recent::<HR, CR, AR, UD>))
        .route("/houses/mine", get(houses::mine::<HR, CR, AR, UD>))
        .route(
            "/houses/{id}",
            get(houses::get::<HR, CR, AR, UD>)
                .put(houses::update::<HR, CR, AR, UD>)
                .delete(houses::delete::<HR, CR, AR, UD>),
        )
        .route("/houses/{id}/rent", post(houses::rent::<HR, CR, AR, UD>))
        .route("/houses/{id}/leave", post(houses::leave::<HR, CR, AR, UD>))
        // Categories
        .route("/categories", get(categories::list::<HR, CR, AR, UD>))
        .route(
            "/categories/names",
            get(categories::names::<HR, CR, AR, UD>),
        )
        // Agents
        .route("/agents", post(agents::create::<HR, CR, AR, UD>))
}
