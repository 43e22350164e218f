//! services/portal/src/views/teacher_dashboard.rs
//!
//! The teacher's assignment list: status filter, create form and the
//! Draft → Published → Completed actions.

use chrono::{DateTime, Utc};
use classroom_core::domain::{Assignment, AssignmentStatus, NewAssignment};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{error, info};

use crate::app::assignments::AssignmentService;
use crate::views::{ActionError, ListState, Notice};

pub const LOAD_FAILED: &str = "Failed to load assignments";
pub const CREATE_FAILED: &str = "Failed to create assignment";
pub const CHANGE_FAILED: &str = "Failed to change assignment status";
pub const CREATED: &str = "Assignment created successfully!";

//=========================================================================================
// State
//=========================================================================================

/// The create-assignment dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentForm {
    pub open: bool,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[derive(Default)]
struct DashboardState {
    list: ListState<Assignment>,
    filter: Option<AssignmentStatus>,
    form: AssignmentForm,
    creating: bool,
    changing: HashSet<String>,
    error: Option<String>,
    notice: Option<Notice>,
}

pub struct TeacherDashboard {
    assignments: AssignmentService,
    notice_duration: Duration,
    state: Mutex<DashboardState>,
}

impl TeacherDashboard {
    pub fn new(assignments: AssignmentService, notice_duration: Duration) -> Self {
        Self {
            assignments,
            notice_duration,
            state: Mutex::new(DashboardState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    //=====================================================================================
    // Loading
    //=====================================================================================

    /// Fetches the full list for the current filter, replacing whatever is shown.
    pub async fn load(&self) {
        let (ticket, filter) = {
            let mut state = self.state();
            state.error = None;
            (state.list.begin(), state.filter)
        };

        let result = self.assignments.list(filter).await;

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

    /// Changing the filter refetches immediately.
    pub async fn set_filter(&self, filter: Option<AssignmentStatus>) {
        self.state().filter = filter;
        self.load().await;
    }

    //=====================================================================================
    // Create Form
    //=====================================================================================

    pub fn open_create_form(&self) {
        self.state().form.open = true;
    }

    /// Closing discards whatever was typed.
    pub fn close_create_form(&self) {
        self.state().form = AssignmentForm::default();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state().form.title = title.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.state().form.description = description.into();
    }

    pub fn set_due_date(&self, due_date: Option<DateTime<Utc>>) {
        self.state().form.due_date = due_date;
    }

    /// The create button is enabled only with a title and no create in flight.
    pub fn can_create(&self) -> bool {
        let state = self.state();
        !state.form.title.trim().is_empty() && !state.creating
    }

    pub async fn create(&self) -> Result<(), ActionError> {
        let new_assignment = {
            let mut state = self.state();
            state.form.error = None;
            if state.creating {
                return Err(ActionError::Busy);
            }
            let new_assignment = NewAssignment {
                title: state.form.title.clone(),
                description: state.form.description.clone(),
                due_date: state.form.due_date,
            };
            if let Err(invalid) = new_assignment.validate() {
                state.form.error = Some(invalid.to_string());
                return Err(invalid.into());
            }
            state.creating = true;
            new_assignment
        };

        let result = self.assignments.create(&new_assignment).await;

        {
            let mut state = self.state();
            state.creating = false;
            if let Err(e) = result {
                error!("Error creating assignment: {}", e);
                let failure = ActionError::from_port(&e, CREATE_FAILED);
                state.form.error = failure.inline_message();
                return Err(failure);
            }
            info!("Created assignment '{}'", new_assignment.title);
            state.form = AssignmentForm::default();
            state.notice = Some(Notice::new(CREATED, self.notice_duration));
        }

        self.load().await;
        Ok(())
    }

    //=====================================================================================
    // Status Changes
    //=====================================================================================

    /// Moves one assignment to `next`. The same assignment cannot be changed again
    /// until this call finishes; other assignments can.
    pub async fn change_status(&self, id: &str, next: AssignmentStatus) -> Result<(), ActionError> {
        {
            let mut state = self.state();
            if !state.changing.insert(id.to_string()) {
                return Err(ActionError::Busy);
            }
            state.error = None;
        }

        let result = self.assignments.change_status(id, next).await;

        {
            let mut state = self.state();
            state.changing.remove(id);
            if let Err(e) = result {
                error!("Error changing status of {}: {}", id, e);
                let failure = ActionError::from_port(&e, CHANGE_FAILED);
                state.error = failure.inline_message();
                return Err(failure);
            }
            state.notice = Some(Notice::new(
                format!("Assignment status changed to {}", next),
                self.notice_duration,
            ));
        }

        self.load().await;
        Ok(())
    }

    /// Publishes a draft or completes a published assignment, as shown in the list.
    pub async fn advance(&self, id: &str) -> Result<AssignmentStatus, ActionError> {
        let current = self
            .state()
            .list
            .items()
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.status)
            .ok_or(ActionError::NothingSelected)?;
        let next = current.next().ok_or_else(|| {
            ActionError::Failed(format!("Assignment is already {}", current))
        })?;
        self.change_status(id, next).await?;
        Ok(next)
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

    pub fn filter(&self) -> Option<AssignmentStatus> {
        self.state().filter
    }

    pub fn form(&self) -> AssignmentForm {
        self.state().form.clone()
    }

    pub fn is_changing(&self, id: &str) -> bool {
        self.state().changing.contains(id)
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.state().error = None;
    }

    /// The success message, while it is still visible.
    pub fn notice(&self) -> Option<String> {
        self.state()
            .notice
            .as_ref()
            .filter(|n| n.is_visible())
            .map(|n| n.message().to_string())
    }
}
