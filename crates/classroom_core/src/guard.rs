//! crates/classroom_core/src/guard.rs
//!
//! Maps the session and a view's required role to an allow/deny decision.
//!
//! There is no "forbidden" outcome: a logged-in user asking for a view of another
//! role is sent to the login view exactly like an anonymous one.

use crate::domain::{Role, Session};
use std::fmt;

/// Every place the client can be positioned at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    TeacherDashboard,
    TeacherSubmissions { assignment_id: String },
    StudentDashboard,
}

impl View {
    /// The role a session must hold to see this view. `None` means public.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            View::Login => None,
            View::TeacherDashboard | View::TeacherSubmissions { .. } => Some(Role::Teacher),
            View::StudentDashboard => Some(Role::Student),
        }
    }

    pub fn is_public(&self) -> bool {
        self.required_role().is_none()
    }

    pub fn path(&self) -> String {
        match self {
            View::Login => "/".to_string(),
            View::TeacherDashboard => "/teacher".to_string(),
            View::TeacherSubmissions { assignment_id } => {
                format!("/teacher/submissions/{}", assignment_id)
            }
            View::StudentDashboard => "/student".to_string(),
        }
    }

    /// Parses a route path. Unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<View> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(View::Login),
            ["teacher"] => Some(View::TeacherDashboard),
            ["teacher", "submissions", id] => Some(View::TeacherSubmissions {
                assignment_id: (*id).to_string(),
            }),
            ["student"] => Some(View::StudentDashboard),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Whether `session` may see a view guarded by `required`.
pub fn can_access(session: Option<&Session>, required: Option<Role>) -> bool {
    let Some(session) = session.filter(|s| s.has_token()) else {
        return false;
    };
    match required {
        Some(role) => session.role == role,
        None => true,
    }
}

/// Returns `requested` when the guard allows it, otherwise the login view.
pub fn resolve(session: Option<&Session>, requested: View) -> View {
    if requested.is_public() || can_access(session, requested.required_role()) {
        requested
    } else {
        View::Login
    }
}

/// Where a freshly logged-in user lands. Teachers get their dashboard, anyone
/// else the student one.
pub fn home_view(role: Role) -> View {
    match role {
        Role::Teacher => View::TeacherDashboard,
        _ => View::StudentDashboard,
    }
}
