use crate::backend::SheetBackend;
use crate::errors::{DashboardError, Result};
use crate::submit::{EditSession, SavePreview, TabState};
use client::records::Eligibility;
use std::sync::Arc;

/// Pending value for one eligibility row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityEdit {
    pub enabled: bool,
    pub fixed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityMetrics {
    pub flow_count: usize,
    pub enabled_count: usize,
    pub fixed_count: usize,
    pub pending_edits: usize,
}

/// Controller for the eligibility matrix of one selected collaborator.
///
/// The buffer is keyed by flow name only; the collaborator is fixed by the
/// current selection and switching it silently discards pending edits.
pub struct EligibilityTab {
    backend: Arc<dyn SheetBackend>,
    collaborator_id: String,
    rows: Vec<Eligibility>,
    loaded: bool,
    edits: EditSession<String, EligibilityEdit>,
}

impl EligibilityTab {
    pub(crate) fn new(
        backend: Arc<dyn SheetBackend>,
        collaborator_id: &str,
        cached: Option<Vec<Eligibility>>,
    ) -> Self {
        let loaded = cached.is_some();
        EligibilityTab {
            backend,
            collaborator_id: collaborator_id.to_string(),
            rows: cached.unwrap_or_default(),
            loaded,
            edits: EditSession::new(),
        }
    }

    pub async fn load(&mut self, force: bool) -> Result<()> {
        if self.loaded && !force {
            return Ok(());
        }
        self.rows = self.backend.eligibility(&self.collaborator_id).await?;
        self.loaded = true;
        self.edits.reset();
        Ok(())
    }

    pub fn collaborator_id(&self) -> &str {
        &self.collaborator_id
    }

    pub fn rows(&self) -> &[Eligibility] {
        &self.rows
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn state(&self) -> TabState {
        self.edits.state()
    }

    /// Changes the selected collaborator. Unsaved edits are discarded
    /// without warning, matching the rest of the selection switches.
    pub fn select_collaborator(&mut self, collaborator_id: &str) {
        if collaborator_id == self.collaborator_id {
            return;
        }
        self.collaborator_id = collaborator_id.to_string();
        self.rows.clear();
        self.loaded = false;
        self.edits.reset();
    }

    pub fn effective(&self, flow: &str) -> Option<EligibilityEdit> {
        let row = self.rows.iter().find(|e| e.flow == flow)?;
        let backend_value = EligibilityEdit {
            enabled: row.enabled,
            fixed: row.fixed,
        };
        Some(*self.edits.buffer().effective(&row.flow, &backend_value))
    }

    pub fn edit(&mut self, flow: &str, enabled: bool, fixed: bool) -> Result<()> {
        if !self.rows.iter().any(|e| e.flow == flow) {
            return Err(DashboardError::Validation(format!("unknown flow '{flow}'")));
        }
        self.edits
            .set(flow.to_string(), EligibilityEdit { enabled, fixed })
    }

    pub fn begin_save(&mut self) -> Result<SavePreview> {
        self.edits.begin_save(|flow, edit| {
            let mut line = format!(
                "{flow}: {}",
                if edit.enabled { "enabled" } else { "disabled" }
            );
            if edit.fixed {
                line.push_str(", fixed");
            }
            line
        })
    }

    pub fn cancel_save(&mut self) -> Result<()> {
        self.edits.cancel_save()
    }

    pub async fn confirm_save(&mut self) -> Result<usize> {
        let backend = Arc::clone(&self.backend);
        let collaborator_id = self.collaborator_id.clone();
        let applied = self
            .edits
            .confirm_save(|flow, edit| {
                let backend = Arc::clone(&backend);
                let collaborator_id = collaborator_id.clone();
                async move {
                    backend
                        .set_eligibility(&collaborator_id, &flow, edit.enabled, edit.fixed)
                        .await
                }
            })
            .await?;
        self.rows = self.backend.eligibility(&self.collaborator_id).await?;
        Ok(applied)
    }

    pub fn metrics(&self) -> EligibilityMetrics {
        let buffer = self.edits.buffer();
        let mut enabled_count = 0;
        let mut fixed_count = 0;
        for row in &self.rows {
            let backend_value = EligibilityEdit {
                enabled: row.enabled,
                fixed: row.fixed,
            };
            let effective = buffer.effective(&row.flow, &backend_value);
            if effective.enabled {
                enabled_count += 1;
            }
            if effective.fixed {
                fixed_count += 1;
            }
        }
        EligibilityMetrics {
            flow_count: self.rows.len(),
            enabled_count,
            fixed_count,
            pending_edits: buffer.len(),
        }
    }
}
