use poem_openapi::Object;

/// One activity log entry
#[derive(Object, Debug)]
pub struct ActivityEntryResponse {
    pub id: i64,

    /// Action code, e.g. USER_LOGIN
    pub action: String,
    pub ip_address: Option<String>,

    /// Client identifier of the request that produced the entry
    pub user_agent: String,

    /// Unix timestamp in microseconds
    pub timestamp: i64,

    /// Action-specific payload
    pub data: serde_json::Value,
}

/// The caller's most recent activity, newest first
#[derive(Object, Debug)]
pub struct ActivityLogResponse {
    pub entries: Vec<ActivityEntryResponse>,
}
