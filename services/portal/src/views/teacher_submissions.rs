//! The teacher's review table for one assignment.

use classroom_core::domain::Submission;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::error;

use crate::app::submissions::SubmissionService;
use crate::views::{ActionError, ListState};

pub const LOAD_FAILED: &str = "Failed to fetch submissions";

#[derive(Default)]
struct ReviewState {
    list: ListState<Submission>,
    error: Option<String>,
}

pub struct TeacherSubmissions {
    submissions: SubmissionService,
    assignment_id: String,
    state: Mutex<ReviewState>,
}

impl TeacherSubmissions {
    pub fn new(submissions: SubmissionService, assignment_id: impl Into<String>) -> Self {
        Self {
            submissions,
            assignment_id: assignment_id.into(),
            state: Mutex::new(ReviewState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ReviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // The list endpoint does not return the assignment itself, only its id.
    pub fn heading(&self) -> String {
        format!("Assignment {}", self.assignment_id)
    }

    pub async fn load(&self) {
        let ticket = {
            let mut state = self.state();
            state.error = None;
            state.list.begin()
        };

        let result = self.submissions.for_assignment(&self.assignment_id).await;

        let mut state = self.state();
        match result {
            Ok(items) => {
                state.list.finish(ticket, items);
            }
            Err(e) => {
                error!("Error fetching submissions: {}", e);
                if state.list.fail(ticket) {
                    state.error = ActionError::from_port(&e, LOAD_FAILED).inline_message();
                }
            }
        }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state().list.items().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.state().list.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.state().error = None;
    }
}
