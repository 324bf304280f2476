use shared::metrics_defs::{MetricDef, MetricType};

pub const RELAYED_REQUESTS: MetricDef = MetricDef {
    name: "relay.requests",
    metric_type: MetricType::Counter,
    description: "Requests handled by the relay. Tagged with method and outcome.",
};

pub const UPSTREAM_FAILURES: MetricDef = MetricDef {
    name: "relay.upstream_failures",
    metric_type: MetricType::Counter,
    description: "Forwarding attempts that failed at the transport level.",
};

pub const UPSTREAM_LATENCY: MetricDef = MetricDef {
    name: "relay.upstream_latency",
    metric_type: MetricType::Histogram,
    description: "Upstream round-trip time in seconds, successful sends only.",
};

pub const ALL_METRICS: &[MetricDef] = &[RELAYED_REQUESTS, UPSTREAM_FAILURES, UPSTREAM_LATENCY];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_latency_is_a_histogram() {
        assert_eq!(UPSTREAM_LATENCY.metric_type, MetricType::Histogram);
        assert!(ALL_METRICS.iter().any(|m| m.name == UPSTREAM_LATENCY.name));
    }
}
