use axum::Router;
use utoipa::openapi::InfoBuilder;

pub mod app_error;
pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod extract;
pub mod models;
pub mod password;
pub mod pharmacy;
pub mod routes;
pub mod schema;
pub mod swagger;

use app_state::AppState;

/// Builds the complete application router, Swagger UI included.
pub fn app(state: AppState) -> Router {
    let (router, mut openapi) = routes::routes_with_openapi().split_for_parts();
    openapi.info = InfoBuilder::new()
        .title("Smart Hospital API")
        .version(env!("CARGO_PKG_VERSION"))
        .build();

    router
        .merge(swagger::create_swagger_ui(openapi))
        .with_state(state)
}
