use crate::backend::SheetBackend;
use crate::errors::Result;
use crate::submit::TabState;
use crate::tabs::{AttendanceTab, EligibilityTab, FlowsTab};
use client::records::{AttendanceSheet, Eligibility, Flow};
use std::sync::Arc;

/// Status of the best-effort backend probe. Only ever reflected in a status
/// indicator; probe failures are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendHealth {
    Unknown,
    Reachable,
    Unreachable,
}

/// Closed set of tab variants, each carrying its typed controller.
pub enum ActiveTab {
    Flows(FlowsTab),
    Eligibility(EligibilityTab),
    Attendance(AttendanceTab),
}

impl ActiveTab {
    pub fn name(&self) -> &'static str {
        match self {
            ActiveTab::Flows(_) => "flows",
            ActiveTab::Eligibility(_) => "eligibility",
            ActiveTab::Attendance(_) => "attendance",
        }
    }

    pub fn state(&self) -> TabState {
        match self {
            ActiveTab::Flows(tab) => tab.state(),
            ActiveTab::Eligibility(tab) => tab.state(),
            ActiveTab::Attendance(tab) => tab.state(),
        }
    }
}

#[derive(Default)]
struct EntityCaches {
    flows: Option<Vec<Flow>>,
    /// Eligibility rows, valid for the collaborator they were loaded for.
    eligibility: Option<(String, Vec<Eligibility>)>,
    attendance: Option<AttendanceSheet>,
}

/// One operator's dashboard session.
///
/// Owns the backend handle, the per-entity caches, and the active tab. All
/// session state lives here; there are no module-level singletons. Switching
/// tabs stows the outgoing tab's rows in the cache and drops its edit buffer
/// without warning.
pub struct Session {
    backend: Arc<dyn SheetBackend>,
    caches: EntityCaches,
    health: BackendHealth,
    active: ActiveTab,
}

impl Session {
    /// Starts on the flows tab with cold caches.
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        let active = ActiveTab::Flows(FlowsTab::new(Arc::clone(&backend), None));
        Session {
            backend,
            caches: EntityCaches::default(),
            health: BackendHealth::Unknown,
            active,
        }
    }

    pub fn active(&self) -> &ActiveTab {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveTab {
        &mut self.active
    }

    pub fn health(&self) -> BackendHealth {
        self.health
    }

    pub fn switch_to_flows(&mut self) {
        self.stow_active();
        tracing::debug!(tab = "flows", "switching tab");
        self.active = ActiveTab::Flows(FlowsTab::new(
            Arc::clone(&self.backend),
            self.caches.flows.clone(),
        ));
    }

    pub fn switch_to_eligibility(&mut self, collaborator_id: &str) {
        self.stow_active();
        tracing::debug!(tab = "eligibility", collaborator_id, "switching tab");
        let cached = self.caches.eligibility.as_ref().and_then(|(id, rows)| {
            (id == collaborator_id).then(|| rows.clone())
        });
        self.active = ActiveTab::Eligibility(EligibilityTab::new(
            Arc::clone(&self.backend),
            collaborator_id,
            cached,
        ));
    }

    pub fn switch_to_attendance(&mut self, day: &str) {
        self.stow_active();
        tracing::debug!(tab = "attendance", day, "switching tab");
        self.active = ActiveTab::Attendance(AttendanceTab::new(
            Arc::clone(&self.backend),
            day,
            self.caches.attendance.clone(),
        ));
    }

    /// Stows the outgoing tab's loaded rows. Its edit buffer is dropped with
    /// the controller; unsaved edits are discarded silently.
    fn stow_active(&mut self) {
        match &self.active {
            ActiveTab::Flows(tab) => {
                if tab.is_loaded() {
                    self.caches.flows = Some(tab.rows().to_vec());
                }
            }
            ActiveTab::Eligibility(tab) => {
                if tab.is_loaded() {
                    self.caches.eligibility =
                        Some((tab.collaborator_id().to_string(), tab.rows().to_vec()));
                }
            }
            ActiveTab::Attendance(tab) => {
                if let Some(sheet) = tab.sheet() {
                    self.caches.attendance = Some(sheet);
                }
            }
        }
    }

    /// Best-effort backend probe; only moves the status indicator.
    pub async fn probe_health(&mut self) {
        self.health = if self.backend.health().await {
            BackendHealth::Reachable
        } else {
            BackendHealth::Unreachable
        };
    }

    /// Dispatches a Slack notification through the backend.
    pub async fn notify(&self, text: &str) -> Result<()> {
        self.backend.send_notification(text).await?;
        Ok(())
    }
}
