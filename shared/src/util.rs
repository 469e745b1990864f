/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh UUID v4 string for use as resource ID.
///
/// Used by both the fulfillment server and its tests so every record kind
/// (order, transaction, tracking, quote) draws ids from one place.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
