use prometheus::{register_int_counter_vec, register_int_gauge, IntCounterVec, IntGauge};

lazy_static::lazy_static! {
    static ref LOAD_COUNT: IntCounterVec = register_int_counter_vec!(
        "rules_load_total",
        "Number of rule file loads",
        &["result"]
    )
    .unwrap();

    static ref RESOLVE_COUNT: IntCounterVec = register_int_counter_vec!(
        "rules_resolve_total",
        "Number of hostname lookups",
        &["result"]
    )
    .unwrap();

    static ref TABLE_SIZE: IntGauge =
        register_int_gauge!("rules_table_size", "Number of rules in the published table").unwrap();
}

pub(crate) fn record_load(ok: bool, rules: usize) {
    if ok {
        LOAD_COUNT.with_label_values(&["loaded"]).inc();
        TABLE_SIZE.set(rules as i64);
    } else {
        LOAD_COUNT.with_label_values(&["failed"]).inc();
    }
}

pub(crate) fn record_resolve(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    RESOLVE_COUNT.with_label_values(&[result]).inc();
}

pub(crate) fn record_clean() {
    TABLE_SIZE.set(0);
}

/// Read back a counter, for tests and host diagnostics
pub fn load_count(result: &str) -> u64 {
    LOAD_COUNT.with_label_values(&[result]).get()
}

pub fn resolve_count(result: &str) -> u64 {
    RESOLVE_COUNT.with_label_values(&[result]).get()
}
