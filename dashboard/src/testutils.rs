//! In-memory backend used by tab controller and session tests.

use crate::backend::SheetBackend;
use async_trait::async_trait;
use client::ClientError;
use client::records::{AttendanceEntry, AttendanceSheet, Collaborator, Eligibility, Flow};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Records every call, applies writes to its stored rows, and can be told to
/// fail writes for one specific key.
pub struct MockBackend {
    pub flows: Mutex<Vec<Flow>>,
    pub eligibility: Mutex<Vec<Eligibility>>,
    pub sheet: Mutex<AttendanceSheet>,
    pub collaborators: Mutex<Vec<Collaborator>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_writes_for: Mutex<Option<String>>,
    pub healthy: AtomicBool,
}

impl MockBackend {
    pub fn with_sample_data() -> Self {
        MockBackend {
            flows: Mutex::new(vec![
                flow("Ventas", 1),
                flow("Soporte", 2),
                flow("Calidad", 0),
            ]),
            eligibility: Mutex::new(vec![
                eligibility("Ventas", true, false),
                eligibility("Soporte", false, false),
            ]),
            sheet: Mutex::new(AttendanceSheet {
                day: "2026-08-30".to_string(),
                codes: vec![
                    "P".to_string(),
                    "A".to_string(),
                    "V".to_string(),
                    String::new(),
                ],
                entries: vec![
                    AttendanceEntry {
                        collaborator_id: "c1".to_string(),
                        code: "P".to_string(),
                    },
                    AttendanceEntry {
                        collaborator_id: "c2".to_string(),
                        code: String::new(),
                    },
                ],
            }),
            collaborators: Mutex::new(vec![
                Collaborator {
                    id: "c1".to_string(),
                    name: "Ana".to_string(),
                    active: true,
                },
                Collaborator {
                    id: "c2".to_string(),
                    name: "Bruno".to_string(),
                    active: true,
                },
            ]),
            calls: Mutex::new(Vec::new()),
            fail_writes_for: Mutex::new(None),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn fail_writes_for(&self, key: &str) {
        *self.fail_writes_for.lock().unwrap() = Some(key.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_write(&self, key: &str) -> Result<(), ClientError> {
        if self.fail_writes_for.lock().unwrap().as_deref() == Some(key) {
            return Err(ClientError::Application(format!("write rejected: {key}")));
        }
        Ok(())
    }
}

fn flow(name: &str, required_profiles: u32) -> Flow {
    Flow {
        name: name.to_string(),
        required_profiles,
    }
}

fn eligibility(flow: &str, enabled: bool, fixed: bool) -> Eligibility {
    Eligibility {
        flow: flow.to_string(),
        enabled,
        fixed,
    }
}

#[async_trait]
impl SheetBackend for MockBackend {
    async fn collaborators(&self) -> Result<Vec<Collaborator>, ClientError> {
        self.record("getCollaborators".to_string());
        Ok(self.collaborators.lock().unwrap().clone())
    }

    async fn flows(&self) -> Result<Vec<Flow>, ClientError> {
        self.record("getFlows".to_string());
        Ok(self.flows.lock().unwrap().clone())
    }

    async fn set_required_profiles(&self, flow: &str, required: u32) -> Result<(), ClientError> {
        self.record(format!("updateFlow:{flow}={required}"));
        self.check_write(flow)?;
        let mut flows = self.flows.lock().unwrap();
        if let Some(row) = flows.iter_mut().find(|f| f.name == flow) {
            row.required_profiles = required;
        }
        Ok(())
    }

    async fn eligibility(&self, collaborator_id: &str) -> Result<Vec<Eligibility>, ClientError> {
        self.record(format!("getEligibility:{collaborator_id}"));
        Ok(self.eligibility.lock().unwrap().clone())
    }

    async fn set_eligibility(
        &self,
        collaborator_id: &str,
        flow: &str,
        enabled: bool,
        fixed: bool,
    ) -> Result<(), ClientError> {
        self.record(format!(
            "updateEligibility:{collaborator_id}:{flow}={enabled}/{fixed}"
        ));
        self.check_write(flow)?;
        let mut rows = self.eligibility.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|e| e.flow == flow) {
            row.enabled = enabled;
            row.fixed = fixed;
        }
        Ok(())
    }

    async fn attendance(&self, day: &str) -> Result<AttendanceSheet, ClientError> {
        self.record(format!("getAttendance:{day}"));
        Ok(self.sheet.lock().unwrap().clone())
    }

    async fn set_attendance(
        &self,
        day: &str,
        collaborator_id: &str,
        code: &str,
    ) -> Result<(), ClientError> {
        self.record(format!("updateAttendance:{day}:{collaborator_id}={code}"));
        self.check_write(collaborator_id)?;
        let mut sheet = self.sheet.lock().unwrap();
        match sheet
            .entries
            .iter_mut()
            .find(|e| e.collaborator_id == collaborator_id)
        {
            Some(entry) => entry.code = code.to_string(),
            None => sheet.entries.push(AttendanceEntry {
                collaborator_id: collaborator_id.to_string(),
                code: code.to_string(),
            }),
        }
        Ok(())
    }

    async fn send_notification(&self, text: &str) -> Result<(), ClientError> {
        self.record(format!("sendNotification:{text}"));
        Ok(())
    }

    async fn health(&self) -> bool {
        self.record("health".to_string());
        self.healthy.load(Ordering::SeqCst)
    }
}
