// Quality metrics over judge verdicts: append-only log, windowed aggregation, health.

pub mod aggregate;
pub mod handlers;
pub mod patterns;
pub mod store;
