//! JSON payloads returned by `GET /`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

pub const GREETING_MESSAGE: &str = "Hello from the DevOps GitOps Pipeline!";
pub const DB_CONNECTED_MESSAGE: &str = "✅ Backend successfully connected to Postgres Database!";
pub const DB_FAILED_MESSAGE: &str = "❌ Failed to connect to Postgres Database";

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.123Z`.
fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Clone, Serialize)]
pub struct GreetingResponse {
    pub message: String,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl GreetingResponse {
    pub fn now() -> Self {
        Self {
            message: GREETING_MESSAGE.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DbTimeResponse {
    pub message: String,
    #[serde(serialize_with = "iso_millis")]
    pub db_time: DateTime<Utc>,
}

impl DbTimeResponse {
    pub fn connected(db_time: DateTime<Utc>) -> Self {
        Self {
            message: DB_CONNECTED_MESSAGE.to_string(),
            db_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DbErrorResponse {
    pub message: String,
    pub error: String,
}

impl DbErrorResponse {
    pub fn failed(error: impl ToString) -> Self {
        Self {
            message: DB_FAILED_MESSAGE.to_string(),
            error: error.to_string(),
        }
    }
}
