use axum::Router;
use rolo::domain::constants::API_PREFIX;
use rolo::kernel::server::ApiState;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "Rolo", description = "Client directory REST API"),
    tags(
        (name = "System", description = "Liveness and build information"),
        (name = "Clients", description = "Create, list and delete clients"),
    )
)]
struct ApiDoc;

/// Path the Scalar reference UI is served from.
pub(crate) const DOCS_PATH: &str = "/api";

pub(crate) fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(rolo::server::router::system_router())
        .nest(API_PREFIX, rolo::server::router::clients_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url(DOCS_PATH, api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}
