pub mod access;
pub mod activity;
pub mod context;
pub mod dashboard;
pub mod pipeline;
pub mod role;
pub mod session;

pub use access::{Access, Denial};
pub use activity::{ActivityAction, ActivityEntry};
pub use dashboard::{Dashboard, DashboardSection};
pub use role::{Group, Role};
pub use session::{Session, SessionToken};
