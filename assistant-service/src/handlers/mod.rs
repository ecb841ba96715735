pub mod chat;
pub mod health;
pub mod policy;

pub use chat::chat;
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use policy::extract_policy;
