//! crates/classroom_core/src/domain.rs
//!
//! Defines the core data structures shared by every layer of the client.
//! The server owns all of these; the client only ever holds a read-through copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Identity
//=========================================================================================

/// The role the server assigned to the logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
    /// Any role string the client does not know about.
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted user blob: display name and role, without the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub role: Role,
}

/// The client's belief about who is logged in.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub display_name: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn new(display_name: impl Into<String>, role: Role, token: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            role,
            token: token.into(),
        }
    }

    /// A session without a token grants nothing.
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.display_name.clone(),
            role: self.role,
        }
    }
}

// The token never shows up in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}

//=========================================================================================
// Assignments
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Draft,
    Published,
    Completed,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 3] = [
        AssignmentStatus::Draft,
        AssignmentStatus::Published,
        AssignmentStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Draft => "Draft",
            AssignmentStatus::Published => "Published",
            AssignmentStatus::Completed => "Completed",
        }
    }

    /// The status a teacher can move an assignment to next, if any.
    pub fn next(&self) -> Option<AssignmentStatus> {
        match self {
            AssignmentStatus::Draft => Some(AssignmentStatus::Published),
            AssignmentStatus::Published => Some(AssignmentStatus::Completed),
            AssignmentStatus::Completed => None,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssignmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown assignment status '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
}

impl Assignment {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }
}

/// The body of a create-assignment request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

//=========================================================================================
// Submissions
//=========================================================================================

/// The `studentId` field arrives either populated or as a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentRef {
    Profile {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
    Id(String),
}

impl StudentRef {
    pub fn display_name(&self) -> &str {
        match self {
            StudentRef::Profile { name: Some(name), .. } => name,
            _ => "Unknown Student",
        }
    }

    pub fn email(&self) -> &str {
        match self {
            StudentRef::Profile { email: Some(email), .. } => email,
            _ => "N/A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub assignment_id: String,
    #[serde(rename = "studentId", default)]
    pub student: Option<StudentRef>,
    #[serde(default)]
    pub answer: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed: bool,
}

impl Submission {
    pub fn review_label(&self) -> &'static str {
        if self.reviewed {
            "Reviewed"
        } else {
            "Pending Review"
        }
    }
}

/// The body of a submit-answer request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub assignment_id: String,
    pub answer: String,
}
