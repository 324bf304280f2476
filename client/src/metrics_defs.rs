use shared::metrics_defs::{MetricDef, MetricType};

pub const BACKEND_CALLS: MetricDef = MetricDef {
    name: "backend.calls",
    metric_type: MetricType::Counter,
    description: "Backend calls issued through the transport client. Tagged with action.",
};

pub const BACKEND_CALL_FAILURES: MetricDef = MetricDef {
    name: "backend.call_failures",
    metric_type: MetricType::Counter,
    description: "Backend calls that resolved to an error. Tagged with action.",
};

pub const ALL_METRICS: &[MetricDef] = &[BACKEND_CALLS, BACKEND_CALL_FAILURES];
