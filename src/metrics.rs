//! Prometheus metrics registry and metric definitions.

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global registry under crate namespace
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::new_custom(Some("survey_api".into()), None)
        .expect("failed to create Prometheus registry")
});

/// Total GraphQL operations executed
pub static GRAPHQL_REQUESTS: Lazy<IntCounter> = Lazy::new(|| {
    let opts = Opts::new("graphql_requests_total", "Total number of GraphQL requests");
    let c = IntCounter::with_opts(opts).expect("counter opts");
    REGISTRY.register(Box::new(c.clone())).expect("register counter");
    c
});

/// GraphQL responses that carried at least one error
pub static GRAPHQL_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    let opts = Opts::new(
        "graphql_errors_total",
        "Total number of GraphQL responses with errors",
    );
    let c = IntCounter::with_opts(opts).expect("counter opts");
    REGISTRY.register(Box::new(c.clone())).expect("register counter");
    c
});

/// Histogram of GraphQL execution durations
pub static GRAPHQL_HISTOGRAM: Lazy<Histogram> = Lazy::new(|| {
    let opts = HistogramOpts::new(
        "graphql_request_duration_seconds",
        "Duration of GraphQL request execution in seconds",
    );
    let h = Histogram::with_opts(opts).expect("histogram opts");
    REGISTRY.register(Box::new(h.clone())).expect("register histogram");
    h
});

/// Entities created, labelled by entity kind (survey/question/option/answer)
pub static ENTITIES_CREATED: Lazy<IntCounterVec> = Lazy::new(|| {
    let opts = Opts::new("entities_created_total", "Total number of entities created");
    let c = IntCounterVec::new(opts, &["entity"]).expect("counter vec opts");
    REGISTRY.register(Box::new(c.clone())).expect("register counter vec");
    c
});

/// Encode all metrics as text
pub fn gather_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let mf = REGISTRY.gather();
    encoder.encode(&mf, &mut buffer).expect("failed to encode");
    String::from_utf8(buffer).expect("invalid utf8")
}
