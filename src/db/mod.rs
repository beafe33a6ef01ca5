pub mod models;
pub mod store;

pub use models::{AssessmentDoc, AssessmentRecord, UserDoc, UserResponse};
pub use store::Store;
