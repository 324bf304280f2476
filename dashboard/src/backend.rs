use async_trait::async_trait;
use client::ApiClient;
use client::ClientError;
use client::records::{AttendanceSheet, Collaborator, Eligibility, Flow};

/// Port to the spreadsheet backend.
///
/// Tab controllers only speak this trait, so tests drive them against an
/// in-memory implementation instead of a network.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    async fn collaborators(&self) -> Result<Vec<Collaborator>, ClientError>;

    async fn flows(&self) -> Result<Vec<Flow>, ClientError>;
    async fn set_required_profiles(&self, flow: &str, required: u32) -> Result<(), ClientError>;

    async fn eligibility(&self, collaborator_id: &str) -> Result<Vec<Eligibility>, ClientError>;
    async fn set_eligibility(
        &self,
        collaborator_id: &str,
        flow: &str,
        enabled: bool,
        fixed: bool,
    ) -> Result<(), ClientError>;

    async fn attendance(&self, day: &str) -> Result<AttendanceSheet, ClientError>;
    async fn set_attendance(
        &self,
        day: &str,
        collaborator_id: &str,
        code: &str,
    ) -> Result<(), ClientError>;

    async fn send_notification(&self, text: &str) -> Result<(), ClientError>;

    /// Best-effort probe; implementations must not error.
    async fn health(&self) -> bool;
}

#[async_trait]
impl SheetBackend for ApiClient {
    async fn collaborators(&self) -> Result<Vec<Collaborator>, ClientError> {
        ApiClient::collaborators(self).await
    }

    async fn flows(&self) -> Result<Vec<Flow>, ClientError> {
        ApiClient::flows(self).await
    }

    async fn set_required_profiles(&self, flow: &str, required: u32) -> Result<(), ClientError> {
        ApiClient::set_required_profiles(self, flow, required).await
    }

    async fn eligibility(&self, collaborator_id: &str) -> Result<Vec<Eligibility>, ClientError> {
        ApiClient::eligibility(self, collaborator_id).await
    }

    async fn set_eligibility(
        &self,
        collaborator_id: &str,
        flow: &str,
        enabled: bool,
        fixed: bool,
    ) -> Result<(), ClientError> {
        ApiClient::set_eligibility(self, collaborator_id, flow, enabled, fixed).await
    }

    async fn attendance(&self, day: &str) -> Result<AttendanceSheet, ClientError> {
        ApiClient::attendance(self, day).await
    }

    async fn set_attendance(
        &self,
        day: &str,
        collaborator_id: &str,
        code: &str,
    ) -> Result<(), ClientError> {
        ApiClient::set_attendance(self, day, collaborator_id, code).await
    }

    async fn send_notification(&self, text: &str) -> Result<(), ClientError> {
        ApiClient::send_notification(self, text).await
    }

    async fn health(&self) -> bool {
        ApiClient::health(self).await
    }
}
