use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::age::parse_date;
use super::domain::{HouseholdId, NewHousehold, NewOccupant};
use super::repository::HouseholdRepository;
use super::rules::GrantScheme;
use super::service::{GrantService, GrantServiceError};
use super::views::HouseholdView;

pub(crate) const HOUSEHOLD_CREATED: &str = "household has been created and saved into database";
pub(crate) const MEMBER_ADDED: &str =
    "family member has been added to the household in the database";
pub(crate) const NOT_FOUND: &str = "no records found in db";
pub(crate) const INTERNAL_ERROR: &str = "internal server error";

/// Router builder exposing household registration, lookups, and grant queries.
pub fn grant_router<R>(service: Arc<GrantService<R>>) -> Router
where
    R: HouseholdRepository + 'static,
{
    Router::new()
        .route(
            "/household/create-household",
            post(create_household_handler::<R>),
        )
        .route("/add-member-to-household", post(add_member_handler::<R>))
        .route(
            "/household/list-households",
            get(list_households_handler::<R>),
        )
        .route(
            "/household/specific-household/:household_id",
            get(household_handler::<R>),
        )
        .route("/grant/:scheme", get(grant_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GrantQuery {
    #[serde(default)]
    pub(crate) as_of: Option<String>,
}

pub(crate) async fn create_household_handler<R>(
    State(service): State<Arc<GrantService<R>>>,
    Json(household): Json<NewHousehold>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    match service.create_household(household) {
        Ok(id) => {
            let payload = json!({ "message": HOUSEHOLD_CREATED, "household_id": id });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn add_member_handler<R>(
    State(service): State<Arc<GrantService<R>>>,
    Json(member): Json<NewOccupant>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    match service.add_member(member) {
        Ok(uuid) => {
            let payload = json!({ "message": MEMBER_ADDED, "uuid": uuid });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn list_households_handler<R>(
    State(service): State<Arc<GrantService<R>>>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    match service.list_households() {
        Ok(households) => records_response(households.into_iter().map(HouseholdView::from)),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn household_handler<R>(
    State(service): State<Arc<GrantService<R>>>,
    Path(household_id): Path<u64>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    match service.household(HouseholdId(household_id)) {
        Ok(households) => records_response(households.into_iter().map(HouseholdView::from)),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn grant_handler<R>(
    State(service): State<Arc<GrantService<R>>>,
    Path(scheme): Path<String>,
    Query(query): Query<GrantQuery>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    let scheme = match scheme.parse::<GrantScheme>() {
        Ok(scheme) => scheme,
        Err(err) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };

    let as_of = match query.as_of.as_deref().map(parse_date).transpose() {
        Ok(as_of) => as_of.unwrap_or_else(|| Local::now().date_naive()),
        Err(err) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };

    match service.grant(scheme, as_of) {
        Ok(households) => records_response(households.into_iter().map(HouseholdView::from)),
        Err(err) => failure_response(err),
    }
}

fn records_response(views: impl Iterator<Item = HouseholdView>) -> Response {
    let views: Vec<HouseholdView> = views.collect();
    if views.is_empty() {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": NOT_FOUND }))).into_response();
    }
    (StatusCode::OK, Json(views)).into_response()
}

fn failure_response(err: GrantServiceError) -> Response {
    match err {
        GrantServiceError::InvalidInput(detail) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": detail })),
        )
            .into_response(),
        GrantServiceError::Repository(source) => {
            error!(error = %source, "repository failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": INTERNAL_ERROR })),
            )
                .into_response()
        }
    }
}
