//! services/portal/src/app/assignments.rs
//!
//! Calls for the assignment resource. No caching: every caller gets what the
//! server says right now. Mutations ignore the response body; callers refetch.

use classroom_core::domain::{Assignment, AssignmentStatus, NewAssignment};
use classroom_core::ports::{Method, PortError, PortResult};
use serde_json::json;

use crate::app::gateway::{list_field, Gateway};

#[derive(Clone)]
pub struct AssignmentService {
    gateway: Gateway,
}

impl AssignmentService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// `GET /api/assignments`, optionally filtered by status.
    pub async fn list(&self, status: Option<AssignmentStatus>) -> PortResult<Vec<Assignment>> {
        let params: Vec<(&str, &str)> = status.iter().map(|s| ("status", s.as_str())).collect();
        let response = self
            .gateway
            .request(Method::Get, "/api/assignments", None, &params)
            .await?;
        list_field(&response.body, "assignments")
    }

    pub async fn create(&self, assignment: &NewAssignment) -> PortResult<()> {
        let body =
            serde_json::to_value(assignment).map_err(|e| PortError::Decode(e.to_string()))?;
        self.gateway
            .request(Method::Post, "/api/assignments", Some(body), &[])
            .await?;
        Ok(())
    }

    pub async fn change_status(&self, id: &str, status: AssignmentStatus) -> PortResult<()> {
        self.gateway
            .request(
                Method::Put,
                &format!("/api/assignments/{}/status", id),
                Some(json!({ "status": status })),
                &[],
            )
            .await?;
        Ok(())
    }
}
