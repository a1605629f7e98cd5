//! View models: plain data derived from store snapshots, ready to render.

pub mod dashboard;
pub mod sidebar;
pub mod team;
