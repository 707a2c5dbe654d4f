// Database entities - SeaORM models
pub mod activity_log;
pub mod candidate;
pub mod requisition;
pub mod session;
pub mod user;
pub mod user_group;
