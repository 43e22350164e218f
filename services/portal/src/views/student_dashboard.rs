//! services/portal/src/views/student_dashboard.rs
//!
//! The student's assignment list and the answer form. A student's own
//! submission is only fetched when they open an assignment.

use classroom_core::domain::{Assignment, NewSubmission, Submission};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::app::assignments::AssignmentService;
use crate::app::submissions::SubmissionService;
use crate::views::{ActionError, ListState, Notice};

pub const LOAD_FAILED: &str = "Failed to load assignments";
pub const SUBMIT_FAILED: &str = "Failed to submit assignment";
pub const SUBMITTED: &str = "Assignment submitted successfully!";

#[derive(Default)]
struct DashboardState {
    list: ListState<Assignment>,
    my_submissions: HashMap<String, Submission>,
    current: Option<Assignment>,
    answer: String,
    submitting: bool,
    form_error: Option<String>,
    error: Option<String>,
    notice: Option<Notice>,
}

pub struct StudentDashboard {
    assignments: AssignmentService,
    submissions: SubmissionService,
    notice_duration: Duration,
    state: Mutex<DashboardState>,
}

impl StudentDashboard {
    pub fn new(
        assignments: AssignmentService,
        submissions: SubmissionService,
        notice_duration: Duration,
    ) -> Self {
        Self {
            assignments,
            submissions,
            notice_duration,
            state: Mutex::new(DashboardState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn load(&self) {
        let ticket = {
            let mut state = self.state();
            state.error = None;
            state.list.begin()
        };

        let result = self.assignments.list(None).await;

        let mut state = self.state();
        match result {
            Ok(items) => {
                state.list.finish(ticket, items);
            }
            Err(e) => {
                error!("Error fetching assignments: {}", e);
                if state.list.fail(ticket) {
                    state.error = ActionError::from_port(&e, LOAD_FAILED).inline_message();
                }
            }
        }
    }

    /// Opens the answer form for one assignment, prefilled with the student's
    /// earlier answer if the server has one. If another assignment was opened
    /// while this one was loading, the form is left to that one.
    pub async fn open_submission(&self, assignment_id: &str) -> Result<Option<Submission>, ActionError> {
        let assignment = {
            let mut state = self.state();
            let assignment = state
                .list
                .items()
                .iter()
                .find(|a| a.id == assignment_id)
                .cloned()
                .ok_or(ActionError::NothingSelected)?;
            state.current = Some(assignment.clone());
            state.form_error = None;
            assignment
        };

        // No submission yet is the common case; any failure is read that way.
        let existing = match self.submissions.mine(&assignment.id).await {
            Ok(found) => found,
            Err(e) => {
                debug!("No existing submission for {}: {}", assignment.id, e);
                None
            }
        };

        let mut state = self.state();
        if let Some(submission) = &existing {
            state
                .my_submissions
                .insert(assignment.id.clone(), submission.clone());
        }
        let still_open = state.current.as_ref().is_some_and(|a| a.id == assignment.id);
        if !still_open {
            debug!("Assignment {} was closed before its submission arrived", assignment.id);
            return Ok(existing);
        }
        match &existing {
            Some(submission) => state.answer = submission.answer.clone(),
            None => state.answer.clear(),
        }
        Ok(existing)
    }

    pub fn close_submission(&self) {
        let mut state = self.state();
        state.current = None;
        state.answer.clear();
        state.form_error = None;
    }

    pub fn set_answer(&self, answer: impl Into<String>) {
        self.state().answer = answer.into();
    }

    /// The submit button is enabled only with an answer and no submit in flight.
    pub fn can_submit(&self) -> bool {
        let state = self.state();
        state.current.is_some() && !state.answer.trim().is_empty() && !state.submitting
    }

    pub async fn submit(&self) -> Result<(), ActionError> {
        let new_submission = {
            let mut state = self.state();
            state.form_error = None;
            if state.submitting {
                return Err(ActionError::Busy);
            }
            let assignment_id = state
                .current
                .as_ref()
                .map(|a| a.id.clone())
                .ok_or(ActionError::NothingSelected)?;
            let new_submission = NewSubmission {
                assignment_id,
                answer: state.answer.clone(),
            };
            if let Err(invalid) = new_submission.validate() {
                state.form_error = Some(invalid.to_string());
                return Err(invalid.into());
            }
            state.submitting = true;
            new_submission
        };

        let result = self.submissions.submit(&new_submission).await;

        {
            let mut state = self.state();
            state.submitting = false;
            if let Err(e) = result {
                error!("Error submitting assignment: {}", e);
                let failure = ActionError::from_port(&e, SUBMIT_FAILED);
                state.form_error = failure.inline_message();
                return Err(failure);
            }
            info!("Submitted answer for {}", new_submission.assignment_id);
            state.current = None;
            state.answer.clear();
            state.notice = Some(Notice::new(SUBMITTED, self.notice_duration));
        }

        self.load().await;
        Ok(())
    }

    //=====================================================================================
    // Accessors
    //=====================================================================================

    pub fn assignments(&self) -> Vec<Assignment> {
        self.state().list.items().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.state().list.is_loading()
    }

    /// Only known once the assignment has been opened in this view.
    pub fn has_submission(&self, assignment_id: &str) -> bool {
        self.state().my_submissions.contains_key(assignment_id)
    }

    pub fn current(&self) -> Option<Assignment> {
        self.state().current.clone()
    }

    pub fn answer(&self) -> String {
        self.state().answer.clone()
    }

    pub fn form_error(&self) -> Option<String> {
        self.state().form_error.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.state().error = None;
    }

    pub fn notice(&self) -> Option<String> {
        self.state()
            .notice
            .as_ref()
            .filter(|n| n.is_visible())
            .map(|n| n.message().to_string())
    }
}
