pub mod auth;
pub mod model_loaders;

pub use auth::*;
pub use model_loaders::*;
