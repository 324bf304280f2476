use crate::backend::SheetBackend;
use crate::errors::{DashboardError, Result};
use crate::submit::{EditSession, SavePreview, TabState};
use client::records::{AttendanceEntry, AttendanceSheet};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceMetrics {
    pub collaborator_count: usize,
    /// Entries with a non-empty effective code.
    pub filled_count: usize,
    pub coverage_pct: f64,
    /// Effective code -> occurrences, empty codes excluded.
    pub code_counts: BTreeMap<String, usize>,
}

/// Controller for the attendance sheet of one selected day.
///
/// The buffer is keyed by collaborator id. The empty string is a valid
/// pending value meaning "explicitly cleared", distinct from a key that was
/// never touched.
pub struct AttendanceTab {
    backend: Arc<dyn SheetBackend>,
    day: String,
    codes: Vec<String>,
    entries: Vec<AttendanceEntry>,
    loaded: bool,
    edits: EditSession<String, String>,
}

impl AttendanceTab {
    pub(crate) fn new(
        backend: Arc<dyn SheetBackend>,
        day: &str,
        cached: Option<AttendanceSheet>,
    ) -> Self {
        let mut tab = AttendanceTab {
            backend,
            day: day.to_string(),
            codes: Vec::new(),
            entries: Vec::new(),
            loaded: false,
            edits: EditSession::new(),
        };
        if let Some(sheet) = cached
            && sheet.day == day
        {
            tab.apply_sheet(sheet);
        }
        tab
    }

    fn apply_sheet(&mut self, sheet: AttendanceSheet) {
        self.day = sheet.day;
        self.codes = sheet.codes;
        self.entries = sheet.entries;
        self.loaded = true;
    }

    pub async fn load(&mut self, force: bool) -> Result<()> {
        if self.loaded && !force {
            return Ok(());
        }
        let sheet = self.backend.attendance(&self.day).await?;
        self.apply_sheet(sheet);
        self.edits.reset();
        Ok(())
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn entries(&self) -> &[AttendanceEntry] {
        &self.entries
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn state(&self) -> TabState {
        self.edits.state()
    }

    /// Snapshot of the loaded sheet, used to cache it across tab switches.
    pub fn sheet(&self) -> Option<AttendanceSheet> {
        if !self.loaded {
            return None;
        }
        Some(AttendanceSheet {
            day: self.day.clone(),
            codes: self.codes.clone(),
            entries: self.entries.clone(),
        })
    }

    /// Changes the selected day, silently discarding unsaved edits.
    pub fn select_day(&mut self, day: &str) {
        if day == self.day {
            return;
        }
        self.day = day.to_string();
        self.codes.clear();
        self.entries.clear();
        self.loaded = false;
        self.edits.reset();
    }

    pub fn effective_code(&self, collaborator_id: &str) -> Option<&str> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.collaborator_id == collaborator_id)?;
        Some(
            self.edits
                .buffer()
                .effective(&entry.collaborator_id, &entry.code)
                .as_str(),
        )
    }

    /// Records a code edit. The empty string clears the entry; any other
    /// code must come from the backend-supplied list.
    pub fn edit(&mut self, collaborator_id: &str, code: &str) -> Result<()> {
        if !self
            .entries
            .iter()
            .any(|e| e.collaborator_id == collaborator_id)
        {
            return Err(DashboardError::Validation(format!(
                "unknown collaborator '{collaborator_id}'"
            )));
        }
        if !code.is_empty() && !self.codes.iter().any(|c| c == code) {
            return Err(DashboardError::Validation(format!(
                "'{code}' is not a valid attendance code"
            )));
        }
        self.edits
            .set(collaborator_id.to_string(), code.to_string())
    }

    pub fn begin_save(&mut self) -> Result<SavePreview> {
        self.edits.begin_save(|collaborator_id, code| {
            if code.is_empty() {
                format!("{collaborator_id}: (cleared)")
            } else {
                format!("{collaborator_id}: {code}")
            }
        })
    }

    pub fn cancel_save(&mut self) -> Result<()> {
        self.edits.cancel_save()
    }

    pub async fn confirm_save(&mut self) -> Result<usize> {
        let backend = Arc::clone(&self.backend);
        let day = self.day.clone();
        let applied = self
            .edits
            .confirm_save(|collaborator_id, code| {
                let backend = Arc::clone(&backend);
                let day = day.clone();
                async move { backend.set_attendance(&day, &collaborator_id, &code).await }
            })
            .await?;
        let sheet = self.backend.attendance(&self.day).await?;
        self.apply_sheet(sheet);
        Ok(applied)
    }

    pub fn metrics(&self) -> AttendanceMetrics {
        let buffer = self.edits.buffer();
        let mut code_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut filled_count = 0;

        for entry in &self.entries {
            let effective = buffer.effective(&entry.collaborator_id, &entry.code);
            if effective.is_empty() {
                continue;
            }
            filled_count += 1;
            *code_counts.entry(effective.clone()).or_insert(0) += 1;
        }

        let collaborator_count = self.entries.len();
        let coverage_pct = if collaborator_count == 0 {
            0.0
        } else {
            filled_count as f64 * 100.0 / collaborator_count as f64
        };
        AttendanceMetrics {
            collaborator_count,
            filled_count,
            coverage_pct,
            code_counts,
        }
    }
}
