pub mod auth;
pub mod task;
pub mod team;

pub use auth::AuthStore;
pub use task::{StatusCounts, TaskStore};
pub use team::TeamStore;
