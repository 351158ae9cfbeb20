//! REST handlers for `/clientes`.

use crate::Clients;
use crate::error::{ClientError, DUPLICATE_KEY_CODE, VALIDATION_FAILED_CODE};
use crate::model::{ClientCandidate, ClientId, ClientRecord};
use crate::rules::{ValidationReport, strip_phone};
use crate::view::ListView;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use rolo_kernel::domain::constants::CLIENTS_TAG;
use rolo_kernel::envelope::{Envelope, FieldErrors};
use rolo_kernel::server::{ApiFailure, ApiResponse, ApiState};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const INVALID_BODY_CODE: &str = "invalid_body";
pub const INVALID_QUERY_CODE: &str = "invalid_query";

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number. Out of range values are clamped.
    pub page: Option<usize>,
}

/// One page of clients sized by `directory.page_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClientPage {
    pub data: Vec<ClientRecord>,
    pub current_page: usize,
    pub total: usize,
    pub per_page: usize,
    pub last_page: usize,
}

impl ClientPage {
    fn of(records: Vec<ClientRecord>, page: usize, page_size: usize) -> Self {
        let mut view = ListView::new(page_size);
        view.replace(records);
        let current_page = view.set_page(page);
        Self {
            data: view.page().to_vec(),
            current_page,
            total: view.total_items(),
            per_page: view.page_size(),
            last_page: view.total_pages().max(1),
        }
    }
}

/// Client routes, relative to the API prefix.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_clients, create_client))
        .routes(routes!(delete_client))
}

fn slice(state: &ApiState) -> Result<&Clients, ApiFailure> {
    let debug = state.config.app.debug;
    state
        .try_get_slice::<Clients>()
        .map_err(|e| ApiFailure::internal("Client directory unavailable", e, debug))
}

fn invalid(report: &ValidationReport) -> ApiFailure {
    ApiFailure::unprocessable("Validation failed", VALIDATION_FAILED_CODE, report.to_field_errors())
}

fn to_failure(err: ClientError, message: &str, debug: bool) -> ApiFailure {
    match err {
        ClientError::Validation { report, .. } => invalid(&report),
        ClientError::DuplicateKey { field, message, .. } => ApiFailure::unprocessable(
            "Validation failed",
            DUPLICATE_KEY_CODE,
            FieldErrors::from([(field.as_str().to_owned(), message.into_owned())]),
        ),
        ClientError::NotFound { .. } => ApiFailure::not_found("Client not found"),
        other => ApiFailure::internal(message, other, debug),
    }
}

/// Every client, newest first. With `?page=N` the reply is a [`ClientPage`] instead.
#[utoipa::path(
    get,
    path = "/clientes",
    params(ListQuery),
    responses(
        (
            status = OK,
            description = "Clients retrieved successfully",
            body = Envelope<Vec<ClientRecord>>
        ),
        (status = BAD_REQUEST, description = "Query string is not a page number"),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure"),
    ),
    tag = CLIENTS_TAG,
)]
pub(crate) async fn list_clients(
    State(state): State<ApiState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, ApiFailure> {
    let clients = slice(&state)?;
    let Query(query) = query.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected list query");
        ApiFailure::bad_request("Invalid query string").with_code(INVALID_QUERY_CODE)
    })?;

    let records = clients
        .gateway
        .list()
        .await
        .map_err(|e| to_failure(e, "Failed to retrieve clients", state.config.app.debug))?;

    let message = "Clients retrieved successfully";
    Ok(match query.page {
        Some(page) => {
            ApiResponse::ok(message, ClientPage::of(records, page, clients.page_size))
                .into_response()
        },
        None => ApiResponse::ok(message, records).into_response(),
    })
}

#[utoipa::path(
    post,
    path = "/clientes",
    request_body = ClientCandidate,
    responses(
        (
            status = CREATED,
            description = "Client created successfully",
            body = Envelope<ClientRecord>
        ),
        (status = BAD_REQUEST, description = "Body is not a client object"),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid fields or an email already taken"),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure"),
    ),
    tag = CLIENTS_TAG,
)]
pub(crate) async fn create_client(
    State(state): State<ApiState>,
    payload: Result<Json<ClientCandidate>, JsonRejection>,
) -> Result<ApiResponse<ClientRecord>, ApiFailure> {
    let debug = state.config.app.debug;
    let clients = slice(&state)?;

    let Json(mut candidate) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected client payload");
        ApiFailure::bad_request("Invalid request body").with_code(INVALID_BODY_CODE)
    })?;
    candidate.phone = candidate.phone.as_deref().map(strip_phone);

    let client = clients.rules.validate(&candidate).map_err(|report| invalid(&report))?;

    let record = clients
        .gateway
        .create(client)
        .await
        .map_err(|e| to_failure(e, "Failed to create client", debug))?;

    info!(id = %record.id, "Client created");
    Ok(ApiResponse::created("Client created successfully", record))
}

#[utoipa::path(
    delete,
    path = "/clientes/{id}",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = OK, description = "Client deleted successfully"),
        (status = NOT_FOUND, description = "Client not found"),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure"),
    ),
    tag = CLIENTS_TAG,
)]
pub(crate) async fn delete_client(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiFailure> {
    let clients = slice(&state)?;
    let id = ClientId::from(id);
    if !id.is_well_formed() {
        return Err(ApiFailure::not_found("Client not found"));
    }

    clients
        .gateway
        .delete(&id)
        .await
        .map_err(|e| to_failure(e, "Failed to delete client", state.config.app.debug))?;

    info!(%id, "Client deleted");
    Ok(ApiResponse::message("Client deleted successfully"))
}
