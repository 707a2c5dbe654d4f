// Services layer - Business operations
pub mod account_service;
pub mod activity_logger;
pub mod auth_service;
pub mod crypto;
pub mod dashboard_service;
pub mod guard;
pub mod validation;

pub use account_service::{AccountService, ProfileUpdate, Registration};
pub use activity_logger::ActivityLogger;
pub use auth_service::{AuthService, LoginOutcome};
pub use crypto::CryptoService;
pub use dashboard_service::DashboardService;
