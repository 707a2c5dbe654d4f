use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to write activity log: {0}")]
    LogWriteFailed(String),

    #[error("Stored activity payload is not valid JSON: {0}")]
    CorruptPayload(String),
}
