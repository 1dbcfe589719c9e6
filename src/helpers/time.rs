use chrono::Utc;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn now_seconds() -> i64 {
    Utc::now().timestamp()
}
