use shared::metrics_defs::{MetricDef, MetricType};

pub const SAVE_BATCHES: MetricDef = MetricDef {
    name: "save.batches",
    metric_type: MetricType::Counter,
    description: "Confirmed save operations started.",
};

pub const SAVED_ROWS: MetricDef = MetricDef {
    name: "save.rows",
    metric_type: MetricType::Counter,
    description: "Individual row writes acknowledged by the backend.",
};

pub const SAVE_FAILURES: MetricDef = MetricDef {
    name: "save.failures",
    metric_type: MetricType::Counter,
    description: "Save operations aborted by a row write failure.",
};

pub const ALL_METRICS: &[MetricDef] = &[SAVE_BATCHES, SAVED_ROWS, SAVE_FAILURES];
