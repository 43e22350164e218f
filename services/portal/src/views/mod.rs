//! services/portal/src/views/mod.rs
//!
//! Headless view-models for the portal screens. Each one owns its list and form
//! state, talks to the services, and exposes what a front end needs to render.
//!
//! Every view follows the same rules: a mutation is awaited, then the whole list
//! is fetched again; failures become an inline error that stays until dismissed;
//! successes become a notice that expires on its own; a 401 shows nothing, the
//! coordinator takes the client back to login.

pub mod list_state;
pub mod notice;
pub mod student_dashboard;
pub mod teacher_dashboard;
pub mod teacher_submissions;

pub use list_state::{FetchTicket, ListState};
pub use notice::Notice;
pub use student_dashboard::StudentDashboard;
pub use teacher_dashboard::TeacherDashboard;
pub use teacher_submissions::TeacherSubmissions;

use classroom_core::ports::PortError;
use classroom_core::validation::ValidationError;

/// Why a view action did not go through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// A form field failed its local check; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The server refused or could not be reached. Carries the text shown to the user.
    #[error("{0}")]
    Failed(String),
    /// The credentials were rejected; the client is on its way back to login.
    #[error("Your session has ended, please log in again")]
    Unauthenticated,
    /// The control that triggers this action is disabled while it runs.
    #[error("That action is already in progress")]
    Busy,
    #[error("No assignment is selected")]
    NothingSelected,
}

impl ActionError {
    /// Maps a port error to the message a view shows for it.
    pub(crate) fn from_port(error: &PortError, fallback: &str) -> Self {
        if error.is_unauthorized() {
            ActionError::Unauthenticated
        } else {
            ActionError::Failed(error.user_message(fallback))
        }
    }

    /// The inline text for this error, if it should be shown at all.
    pub(crate) fn inline_message(&self) -> Option<String> {
        match self {
            ActionError::Unauthenticated => None,
            other => Some(other.to_string()),
        }
    }
}
