pub mod assignments;
pub mod auth;
pub mod coordinator;
pub mod gateway;
pub mod navigator;
pub mod session;
pub mod state;
pub mod submissions;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the pieces a front end wires together.
pub use auth::{AuthFlow, LoginError};
pub use gateway::{AuthSignal, Gateway};
pub use navigator::Navigator;
pub use session::SessionStore;
pub use state::AppContext;
