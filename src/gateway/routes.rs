//! HTTP routes and outcome to response mapping

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use tracing::debug;

use crate::gateway::middleware::access_log;
use crate::gateway::validate::{ValidationErrors, validate_params};
use crate::resolve::dispatch::Resolver;
use crate::resolve::types::{Flavour, ResolutionOutcome, VersionQuery};

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<Resolver>,
}

/// Build the router serving `/{flavour}/{version}` and its `/v1` alias
pub fn router(resolver: Arc<Resolver>) -> Router {
    Router::new()
        .route("/{flavour}/{version}", get(resolve_download))
        .route("/v1/{flavour}/{version}", get(resolve_download))
        .layer(middleware::from_fn(access_log))
        .with_state(AppState { resolver })
}

async fn resolve_download(
    State(state): State<AppState>,
    params: Result<Path<(String, String)>, PathRejection>,
) -> Response {
    let (flavour, version) = match params {
        Ok(Path(params)) => params,
        Err(rejection) => return bad_request(ValidationErrors::from_path_rejection(&rejection)),
    };

    if let Err(errors) = validate_params(&flavour, &version) {
        return bad_request(errors);
    }

    // Unknown flavours never reach a provider or the store
    let Ok(known) = flavour.parse::<Flavour>() else {
        debug!("Unknown flavour {:?}", flavour);
        return outcome_response(ResolutionOutcome::NotFound);
    };

    let query = match VersionQuery::new(known, &version) {
        Ok(query) => query,
        Err(e) => {
            return bad_request(ValidationErrors::from_version_error(e, &version));
        }
    };

    outcome_response(state.resolver.dispatch(&query).await)
}

fn bad_request(errors: ValidationErrors) -> Response {
    (StatusCode::BAD_REQUEST, Json(errors)).into_response()
}

/// Map a resolution outcome onto the HTTP response sent to the client
pub fn outcome_response(outcome: ResolutionOutcome) -> Response {
    match outcome {
        ResolutionOutcome::Found(url) => {
            (StatusCode::FOUND, [(header::LOCATION, url.as_str())]).into_response()
        }
        ResolutionOutcome::NotFound => StatusCode::NOT_FOUND.into_response(),
        // Already logged by the resolver
        ResolutionOutcome::UpstreamError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
