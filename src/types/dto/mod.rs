// Data transfer objects - API request and response bodies
pub mod accounts;
pub mod activity;
pub mod common;
pub mod dashboard;
