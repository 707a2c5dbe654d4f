// Stores layer - Data access and repository pattern
pub mod activity_store;
pub mod candidate_store;
pub mod requisition_store;
pub mod session_store;
pub mod sources;
pub mod user_store;

pub use activity_store::ActivityStore;
pub use candidate_store::CandidateStore;
pub use requisition_store::RequisitionStore;
pub use session_store::SessionStore;
pub use sources::{CandidateSource, RequisitionSource};
pub use user_store::{NewUser, ProfileChanges, UserStore};
