use serde_json::json;
use tracing::warn;

use super::AppState;
use super::http::{HttpRequest, HttpResponse};
use crate::modulation::Scheme;
use crate::request::WireRequest;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Dispatch one request. CORS headers are added for allowed origins.
pub fn route(request: &HttpRequest, state: &AppState) -> HttpResponse {
    let response = match (request.path.as_str(), request.method.as_str()) {
        (_, "OPTIONS") if is_known_path(&request.path) => HttpResponse::empty(204),
        ("/modulate", "POST") => modulate(request, state),
        ("/schemes", "GET") => {
            let schemes: Vec<_> = Scheme::ALL.iter().map(|s| s.info()).collect();
            HttpResponse::json(200, &schemes)
        }
        ("/health", "GET") => HttpResponse::json(200, &json!({ "status": "ok" })),
        (path, _) if is_known_path(path) => {
            HttpResponse::error(405, "method_not_allowed", "method not allowed")
                .with_header("Allow", allowed_for(path))
        }
        _ => HttpResponse::error(404, "not_found", "no such endpoint"),
    };
    with_cors(response, request, state)
}

fn is_known_path(path: &str) -> bool {
    matches!(path, "/modulate" | "/schemes" | "/health")
}

fn allowed_for(path: &str) -> &'static str {
    match path {
        "/modulate" => "POST, OPTIONS",
        _ => "GET, OPTIONS",
    }
}

fn modulate(request: &HttpRequest, state: &AppState) -> HttpResponse {
    let wire = match WireRequest::from_json(&request.body) {
        Ok(wire) => wire,
        Err(err) => {
            warn!("Malformed /modulate body: {}", err);
            return HttpResponse::error(400, "malformed_request", &err.to_string());
        }
    };

    let outcome = wire
        .validate(Some(state.config.max_bits))
        .and_then(|request| request.run(&state.synth));
    match outcome {
        Ok(result) => HttpResponse::json(200, &result),
        Err(err) => {
            warn!("Rejected /modulate request: {}", err);
            HttpResponse::error(400, err.kind(), &err.to_string())
        }
    }
}

fn with_cors(response: HttpResponse, request: &HttpRequest, state: &AppState) -> HttpResponse {
    let Some(origin) = request.header("origin") else {
        return response;
    };
    if !state.config.cors_origins.iter().any(|allowed| allowed == origin) {
        return response;
    }
    response
        .with_header("Access-Control-Allow-Origin", origin)
        .with_header("Access-Control-Allow-Methods", ALLOWED_METHODS)
        .with_header("Access-Control-Allow-Headers", ALLOWED_HEADERS)
        .with_header("Vary", "Origin")
}
