use std::sync::LazyLock;

use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

pub const SUCCESS: &str = "success";
pub const FAILURE: &str = "failure";

// Metric name constants
pub const METRIC_EMAIL_SENT_TOTAL: &str = "bulkmailer_email_sent_total";
pub const METRIC_EMAIL_SEND_DURATION_SECONDS: &str = "bulkmailer_email_send_duration_seconds";
pub const METRIC_BATCH_DISPATCH_TOTAL: &str = "bulkmailer_batch_dispatch_total";

pub static BULKMAILER_EMAIL_SENT_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        METRIC_EMAIL_SENT_TOTAL,
        "Total number of sent emails, grouped by status",
        &["status"]
    )
    .expect("Failed to register bulkmailer_email_sent_total")
});

pub static BULKMAILER_EMAIL_SEND_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        METRIC_EMAIL_SEND_DURATION_SECONDS,
        "Distribution of per-recipient send durations, measured in seconds, grouped by status",
        &["status"]
    )
    .expect("Failed to register bulkmailer_email_send_duration_seconds")
});

pub static BULKMAILER_BATCH_DISPATCH_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!(
        METRIC_BATCH_DISPATCH_TOTAL,
        "Total number of dispatched batches"
    )
    .expect("Failed to register bulkmailer_batch_dispatch_total")
});
