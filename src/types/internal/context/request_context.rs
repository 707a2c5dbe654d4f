use std::net::IpAddr;

use poem::Request;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request metadata that flows from the endpoint down to the activity log
///
/// Carries only facts about the inbound request. The caller's identity is a
/// separate [`Session`](crate::types::internal::session::Session) value.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Client identifier string (the User-Agent header), empty when absent
    pub user_agent: String,

    /// Unique identifier for this request
    pub request_id: RequestId,

    /// Source of the request
    pub source: RequestSource,

    /// Free-form actor label for logs, e.g. "cli:create-user"
    pub actor: String,
}

impl RequestContext {
    /// Create a context for an HTTP request
    pub fn from_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            user_agent: Self::extract_user_agent(req),
            request_id: RequestId::generate(),
            source: RequestSource::API,
            actor: "anonymous".to_owned(),
        }
    }

    /// Create a context for CLI operations
    ///
    /// # Arguments
    /// * `command_name` - Name of the CLI command being executed
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            user_agent: format!("cli:{}", command_name),
            request_id: RequestId::generate(),
            source: RequestSource::CLI,
            actor: format!("cli:{}", command_name),
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Proxy/load balancer chain, first hop is the client
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.trim().parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn extract_user_agent(req: &Request) -> String {
        req.header("User-Agent").unwrap_or_default().to_owned()
    }

    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip_address.map(|ip| ip.to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            ip_address: None,
            user_agent: String::new(),
            request_id: RequestId::generate(),
            source: RequestSource::API,
            actor: "anonymous".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ip_from_x_forwarded_for() {
        let req = Request::builder()
            .header("X-Forwarded-For", "192.168.1.1, 10.0.0.1")
            .finish();

        let ip = RequestContext::extract_ip_address(&req);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_ip_from_x_real_ip() {
        let req = Request::builder()
            .header("X-Real-IP", "192.168.1.2")
            .finish();

        let ip = RequestContext::extract_ip_address(&req);
        assert_eq!(ip, Some("192.168.1.2".parse().unwrap()));
    }

    #[test]
    fn test_malformed_forwarded_header_yields_none() {
        let req = Request::builder()
            .header("X-Forwarded-For", "not-an-ip")
            .finish();

        assert_eq!(RequestContext::extract_ip_address(&req), None);
    }

    #[test]
    fn test_from_request_reads_user_agent() {
        let req = Request::builder()
            .header("User-Agent", "Mozilla/5.0")
            .header("X-Real-IP", "10.1.2.3")
            .finish();

        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.user_agent, "Mozilla/5.0");
        assert_eq!(ctx.ip_string(), Some("10.1.2.3".to_string()));
        assert_eq!(ctx.source, RequestSource::API);
    }

    #[test]
    fn test_missing_user_agent_is_empty() {
        let req = Request::builder().finish();
        assert_eq!(RequestContext::from_request(&req).user_agent, "");
    }

    #[test]
    fn test_for_cli() {
        let ctx = RequestContext::for_cli("create-user");
        assert_eq!(ctx.source, RequestSource::CLI);
        assert_eq!(ctx.actor, "cli:create-user");
        assert!(ctx.ip_address.is_none());
    }
}
