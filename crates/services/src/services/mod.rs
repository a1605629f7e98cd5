pub mod database_validator;
pub mod policy;
pub mod project;
pub mod task;
pub mod user;
