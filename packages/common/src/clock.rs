use chrono::{DateTime, Utc};

/// Wall-clock timestamp stored on documents, pages and elements
pub type Timestamp = DateTime<Utc>;

/// Current UTC time
pub fn now() -> Timestamp {
    Utc::now()
}
