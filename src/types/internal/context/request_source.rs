/// Where an operation was triggered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// HTTP endpoint
    API,
    /// Administrative command line
    CLI,
}

impl RequestSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::API => "api",
            Self::CLI => "cli",
        }
    }
}
