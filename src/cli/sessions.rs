use crate::services::AuthService;

/// Delete expired session rows
pub async fn purge_sessions(auth: &AuthService) -> Result<(), Box<dyn std::error::Error>> {
    let purged = auth.purge_expired().await?;
    println!("✅ Removed {} expired session(s).", purged);
    Ok(())
}
