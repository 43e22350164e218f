//! services/portal/src/app/submissions.rs
//!
//! Calls for the submission resource.

use classroom_core::domain::{NewSubmission, Submission};
use classroom_core::ports::{Method, PortError, PortResult};
use serde_json::Value;

use crate::app::gateway::{list_field, Gateway};

#[derive(Clone)]
pub struct SubmissionService {
    gateway: Gateway,
}

impl SubmissionService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// The response body is not read; callers refetch what they show.
    pub async fn submit(&self, submission: &NewSubmission) -> PortResult<()> {
        let body =
            serde_json::to_value(submission).map_err(|e| PortError::Decode(e.to_string()))?;
        self.gateway
            .request(Method::Post, "/api/submissions", Some(body), &[])
            .await?;
        Ok(())
    }

    /// The caller's own submission for an assignment. `None` when there is none yet.
    pub async fn mine(&self, assignment_id: &str) -> PortResult<Option<Submission>> {
        let path = format!("/api/submissions/my/{}", assignment_id);
        match self.gateway.request(Method::Get, &path, None, &[]).await {
            Ok(response) => match response.body.get("submission") {
                None | Some(Value::Null) => Ok(None),
                Some(found) => serde_json::from_value(found.clone())
                    .map(Some)
                    .map_err(|e| PortError::Decode(e.to_string())),
            },
            Err(PortError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Every submission for an assignment (teacher only).
    pub async fn for_assignment(&self, assignment_id: &str) -> PortResult<Vec<Submission>> {
        let path = format!("/api/submissions/{}", assignment_id);
        let response = self.gateway.request(Method::Get, &path, None, &[]).await?;
        list_field(&response.body, "submissions")
    }
}
