//! Route handlers

use axum::{
    Form, Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::http::error::{ApiError, JsonError};
use crate::http::params::{CheckParams, LegacyVersionQuery, ProgramQuery};
use crate::http::response::{ProgramReport, ResponseFormat, render};
use crate::http::server::AppState;
use crate::version::checker::{ReleaseLookup, check_version};
use crate::version::error::CheckError;
use crate::version::types::{CheckResult, ReleaseChannel};

/// Validate the request and run the check.
///
/// Field order: program present, program known, then the client release
/// fields, so an unknown program is reported regardless of other fields.
pub fn run_check(catalog: &Catalog, params: &CheckParams) -> Result<CheckResult, ApiError> {
    let program = params.program()?;
    if !catalog.has_program(program) {
        return Err(CheckError::ProgramNotFound(program.to_string()).into());
    }

    let client = params.client_release()?;
    let check_unstable = params.check_unstable()?;
    Ok(check_version(catalog, program, &client, check_unstable)?)
}

fn respond(state: &AppState, params: CheckParams, default_format: ResponseFormat) -> Response {
    let (format, outcome) = match params.format(default_format) {
        Ok(format) => (format, run_check(&state.catalog, &params)),
        Err(err) => (default_format, Err(err.into())),
    };

    match outcome {
        Ok(result) => render(result, format),
        Err(err) => {
            warn!(
                "Rejected check for {:?}: {} ({})",
                params.program,
                err.message(),
                err.status()
            );
            match format {
                ResponseFormat::Text => err.into_response(),
                ResponseFormat::Json => JsonError(err).into_response(),
            }
        }
    }
}

/// `POST /check` with a form body
pub async fn check_form(
    State(state): State<AppState>,
    Form(params): Form<CheckParams>,
) -> Response {
    respond(&state, params, ResponseFormat::Text)
}

/// `GET /check`, only answered when browser queries are enabled
pub async fn check_query(
    State(state): State<AppState>,
    Query(params): Query<CheckParams>,
) -> Response {
    if !state.allow_get {
        debug!("GET /check rejected: browser queries are disabled");
        return ApiError::Forbidden.into_response();
    }
    respond(&state, params, ResponseFormat::Text)
}

/// `POST /api/check` with a JSON body, always answered in JSON
///
/// A body that is not a JSON object of check fields is a bad request.
pub async fn check_json(
    State(state): State<AppState>,
    payload: Result<Json<CheckParams>, JsonRejection>,
) -> Result<Json<CheckResult>, JsonError> {
    let Json(params) = payload.map_err(|rejection| {
        warn!("Rejected JSON check body: {}", rejection.body_text());
        JsonError(ApiError::BadRequest)
    })?;

    run_check(&state.catalog, &params)
        .map(Json)
        .map_err(|err| {
            warn!(
                "Rejected JSON check for {:?}: {}",
                params.program,
                err.message()
            );
            JsonError(err)
        })
}

/// `GET /version?name=<program>`: stable version string, `0` when unknown
pub async fn legacy_version(
    State(state): State<AppState>,
    Query(query): Query<LegacyVersionQuery>,
) -> String {
    query
        .name()
        .and_then(|name| {
            state
                .catalog
                .latest_release(name, ReleaseChannel::Stable)
        })
        .map(|release| release.version().to_string())
        .unwrap_or_else(|| "0".to_string())
}

fn program_releases(state: &AppState, query: &ProgramQuery) -> Response {
    let Some(program) = query.program() else {
        return ApiError::Forbidden.into_response();
    };

    match state.catalog.get(program).and_then(|entry| entry.most_stable()) {
        Some(release) => Json(ProgramReport::from(release)).into_response(),
        None => (StatusCode::NOT_FOUND, "ERROR: Program Not Found").into_response(),
    }
}

/// `POST /program`: the program's most stable release
pub async fn program_form(
    State(state): State<AppState>,
    Form(query): Form<ProgramQuery>,
) -> Response {
    program_releases(&state, &query)
}

/// `GET /program`, gated like `GET /check`
pub async fn program_query(
    State(state): State<AppState>,
    Query(query): Query<ProgramQuery>,
) -> Response {
    if !state.allow_get {
        return ApiError::Forbidden.into_response();
    }
    program_releases(&state, &query)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub programs: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        programs: state.catalog.len(),
    })
}
