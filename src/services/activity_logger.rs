use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::stores::ActivityStore;
use crate::types::db::activity_log;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{ActivityAction, ActivityEntry};

/// Best-effort writer and reader of the user activity log
///
/// Writes never fail the operation they describe: a failed append is logged
/// with `tracing::error!` and dropped.
pub struct ActivityLogger {
    store: Arc<ActivityStore>,
}

impl ActivityLogger {
    pub fn new(store: Arc<ActivityStore>) -> Self {
        Self { store }
    }

    /// Start an entry owned by `user_id`
    pub fn builder(&self, user_id: i64, action: impl Into<ActivityAction>) -> ActivityBuilder<'_> {
        ActivityBuilder {
            entry: ActivityEntry::new(user_id, action.into()),
            logger: self,
        }
    }

    /// Append an entry, swallowing any failure
    pub async fn record(&self, entry: ActivityEntry) {
        let user_id = entry.user_id;
        let action = entry.action.to_string();
        if let Err(e) = self.store.append(entry).await {
            tracing::error!(
                "Failed to record activity {} for user {}: {}",
                action,
                user_id,
                e
            );
        }
    }

    /// Most recent entries for a user, newest first
    pub async fn list_for_user(
        &self,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<activity_log::Model>, InternalError> {
        self.store.list_for_user(user_id, limit).await
    }
}

/// Fluent construction of an [`ActivityEntry`]
pub struct ActivityBuilder<'a> {
    entry: ActivityEntry,
    logger: &'a ActivityLogger,
}

impl<'a> ActivityBuilder<'a> {
    /// Copy client IP and user agent from the request
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.entry.ip_address = ctx.ip_string();
        self.entry.user_agent = ctx.user_agent.clone();
        self
    }

    pub fn add_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::warn!("Activity field could not be serialized: {}", e);
            json!(null)
        });
        self.entry.data.insert(key.into(), value);
        self
    }

    /// Write the entry; never fails
    pub async fn record(self) {
        let logger = self.logger;
        logger.record(self.entry).await;
    }
}

/// Decode the stored JSON payload of an entry
pub fn decode_payload(
    model: &activity_log::Model,
) -> Result<serde_json::Map<String, serde_json::Value>, InternalError> {
    serde_json::from_str(&model.data).map_err(|e| {
        InternalError::from(AuditError::CorruptPayload(format!(
            "entry {}: {}",
            model.id, e
        )))
    })
}
