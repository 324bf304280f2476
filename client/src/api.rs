use crate::errors::Result;
use crate::records::{AttendanceSheet, Collaborator, Eligibility, Flow};
use crate::transport::{CallMethod, Transport};
use serde_json::{Map, Value, json};

/// Typed surface over the backend actions the dashboard uses.
///
/// Each method is one envelope call; write methods return `Ok(())` once the
/// backend acknowledged the row.
#[derive(Clone)]
pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(ApiClient {
            transport: Transport::new(base_url)?,
        })
    }

    pub fn from_transport(transport: Transport) -> Self {
        ApiClient { transport }
    }

    pub async fn collaborators(&self) -> Result<Vec<Collaborator>> {
        let data = self
            .transport
            .call(CallMethod::Get, "getCollaborators", None, &[])
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn flows(&self) -> Result<Vec<Flow>> {
        let data = self
            .transport
            .call(CallMethod::Get, "getFlows", None, &[])
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn set_required_profiles(&self, flow: &str, required: u32) -> Result<()> {
        self.transport
            .call(
                CallMethod::Post,
                "updateFlow",
                as_object(json!({ "flow": flow, "requiredProfiles": required })),
                &[],
            )
            .await?;
        Ok(())
    }

    pub async fn eligibility(&self, collaborator_id: &str) -> Result<Vec<Eligibility>> {
        let data = self
            .transport
            .call(
                CallMethod::Get,
                "getEligibility",
                None,
                &[("collaboratorId", collaborator_id)],
            )
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn set_eligibility(
        &self,
        collaborator_id: &str,
        flow: &str,
        enabled: bool,
        fixed: bool,
    ) -> Result<()> {
        self.transport
            .call(
                CallMethod::Post,
                "updateEligibility",
                as_object(json!({
                    "collaboratorId": collaborator_id,
                    "flow": flow,
                    "enabled": enabled,
                    "fixed": fixed,
                })),
                &[],
            )
            .await?;
        Ok(())
    }

    pub async fn attendance(&self, day: &str) -> Result<AttendanceSheet> {
        let data = self
            .transport
            .call(CallMethod::Get, "getAttendance", None, &[("day", day)])
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn set_attendance(&self, day: &str, collaborator_id: &str, code: &str) -> Result<()> {
        self.transport
            .call(
                CallMethod::Post,
                "updateAttendance",
                as_object(json!({
                    "day": day,
                    "collaboratorId": collaborator_id,
                    "code": code,
                })),
                &[],
            )
            .await?;
        Ok(())
    }

    /// Dispatches a Slack notification through the backend.
    pub async fn send_notification(&self, text: &str) -> Result<()> {
        self.transport
            .call(
                CallMethod::Post,
                "sendNotification",
                as_object(json!({ "text": text })),
                &[],
            )
            .await?;
        Ok(())
    }

    /// Best-effort reachability probe. Failures are reported as `false`, not
    /// as errors; callers only flip a status indicator on this.
    pub async fn health(&self) -> bool {
        match self
            .transport
            .call(CallMethod::Get, "health", None, &[])
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                false
            }
        }
    }
}

fn as_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
