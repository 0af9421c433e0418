// Application layer - use cases and orchestration.
// Services sit between the clients (CLI, HTTP) and the repository.

pub mod auth;
pub mod error;
pub mod service;

pub use auth::*;
pub use error::*;
pub use service::*;
