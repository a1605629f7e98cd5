//! Client-side state for the task board: observable stores, a session that
//! owns them, and view models derived from their snapshots.

pub mod model;
pub mod session;
pub mod store;
pub mod stores;
pub mod views;
