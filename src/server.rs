//! HTTP transport: GraphQL endpoint plus metrics & health.
//!
//! Routes:
//!  - `POST /graphql` – execute a JSON GraphQL request
//!  - `GET  /graphql` – GraphiQL explorer (only when enabled)
//!  - `GET  /metrics` – Prometheus text exposition
//!  - `GET  /healthz` – liveness probe

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Instant};

use async_graphql::http::GraphiQLSource;
use hyper::body::{Bytes, HttpBody};
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use prometheus::{Encoder, TextEncoder};
use tracing::{info, warn};

use crate::metrics::{self, GRAPHQL_ERRORS, GRAPHQL_HISTOGRAM, GRAPHQL_REQUESTS};
use crate::schema::SurveySchema;

/// Largest GraphQL request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared, read-only state handed to every connection.
pub struct AppState {
    pub schema: SurveySchema,
    pub graphiql: bool,
}

/// Bind `addr` and serve until the server fails.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<(), hyper::Error> {
    let make_svc = make_service_fn(move |_conn| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                route(req, state.clone())
            }))
        }
    });

    info!(%addr, "Starting GraphQL server");
    Server::bind(&addr).serve(make_svc).await
}

/// Dispatch one request.
pub async fn route(req: Request<Body>, state: Arc<AppState>) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = match (&method, path.as_str()) {
        (&Method::POST, "/graphql") => graphql(req, &state.schema).await,

        (&Method::GET, "/graphql") if state.graphiql => respond(
            StatusCode::OK,
            "text/html; charset=utf-8",
            GraphiQLSource::build().endpoint("/graphql").finish(),
        ),

        // Prometheus (v3+) rejects scrapes without the versioned content type.
        (&Method::GET, "/metrics") => {
            let encoder = TextEncoder::new();
            let mut resp = Response::new(Body::from(metrics::gather_metrics()));
            if let Ok(mime) = HeaderValue::from_str(encoder.format_type()) {
                resp.headers_mut().insert(CONTENT_TYPE, mime);
            }
            resp
        }

        (&Method::GET, "/healthz") => respond(StatusCode::OK, "text/plain", "OK"),

        _ => respond(StatusCode::NOT_FOUND, "text/plain", ""),
    };

    Ok(resp)
}

async fn graphql(req: Request<Body>, schema: &SurveySchema) -> Response<Body> {
    let bytes = match read_body(req, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(resp) => return resp,
    };

    let request: async_graphql::Request = match serde_json::from_slice(&bytes) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected malformed GraphQL request");
            return respond(
                StatusCode::BAD_REQUEST,
                "text/plain",
                format!("invalid GraphQL request: {e}"),
            );
        }
    };

    GRAPHQL_REQUESTS.inc();
    let start = Instant::now();
    let response = schema.execute(request).await;
    GRAPHQL_HISTOGRAM.observe(start.elapsed().as_secs_f64());

    if response.is_err() {
        GRAPHQL_ERRORS.inc();
    }

    match serde_json::to_vec(&response) {
        Ok(body) => respond(StatusCode::OK, "application/json", body),
        Err(e) => {
            warn!(error = %e, "Failed to serialize GraphQL response");
            respond(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", "")
        }
    }
}

/// Buffer the request body, refusing anything over `limit` bytes either by
/// declared `Content-Length` or by what actually arrives.
async fn read_body(req: Request<Body>, limit: usize) -> Result<Bytes, Response<Body>> {
    let too_large = || {
        respond(
            StatusCode::PAYLOAD_TOO_LARGE,
            "text/plain",
            "request body too large",
        )
    };

    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.map_or(false, |len| len > limit) {
        warn!(declared = ?declared, limit = limit as u64, "Rejected oversized request body");
        return Err(too_large());
    }

    let mut body = req.into_body();
    let mut buf = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|e| {
            warn!(error = %e, "Failed to read request body");
            respond(StatusCode::BAD_REQUEST, "text/plain", "unreadable body")
        })?;
        if buf.len() + chunk.len() > limit {
            warn!(limit = limit as u64, "Rejected oversized request body");
            return Err(too_large());
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buf))
}

fn respond(status: StatusCode, content_type: &'static str, body: impl Into<Body>) -> Response<Body> {
    let mut resp = Response::new(body.into());
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}
