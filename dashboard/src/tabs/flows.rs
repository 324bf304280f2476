use crate::backend::SheetBackend;
use crate::errors::{DashboardError, Result};
use crate::submit::{EditSession, SavePreview, TabState};
use client::records::Flow;
use std::sync::Arc;

/// Aggregates recomputed on every change, with pending edits overlaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowMetrics {
    pub flow_count: usize,
    pub total_required: u64,
    pub pending_edits: usize,
}

/// Controller for the flow/queue list with its required-profile counts.
pub struct FlowsTab {
    backend: Arc<dyn SheetBackend>,
    rows: Vec<Flow>,
    loaded: bool,
    edits: EditSession<String, u32>,
}

impl FlowsTab {
    pub(crate) fn new(backend: Arc<dyn SheetBackend>, cached: Option<Vec<Flow>>) -> Self {
        let loaded = cached.is_some();
        FlowsTab {
            backend,
            rows: cached.unwrap_or_default(),
            loaded,
            edits: EditSession::new(),
        }
    }

    /// Fetch-or-use-cache. A forced reload refetches and silently discards
    /// pending edits.
    pub async fn load(&mut self, force: bool) -> Result<()> {
        if self.loaded && !force {
            return Ok(());
        }
        self.rows = self.backend.flows().await?;
        self.loaded = true;
        self.edits.reset();
        Ok(())
    }

    pub fn rows(&self) -> &[Flow] {
        &self.rows
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn state(&self) -> TabState {
        self.edits.state()
    }

    /// The value the operator currently sees for a flow: the pending edit if
    /// dirty, else the last-loaded backend value.
    pub fn effective_required(&self, flow: &str) -> Option<u32> {
        let row = self.rows.iter().find(|f| f.name == flow)?;
        Some(*self.edits.buffer().effective(&row.name, &row.required_profiles))
    }

    /// Validates and records a required-profiles edit. Rejected input never
    /// enters the buffer; the last valid entry (or the backend value) stays
    /// authoritative.
    pub fn edit_required(&mut self, flow: &str, input: &str) -> Result<()> {
        if !self.rows.iter().any(|f| f.name == flow) {
            return Err(DashboardError::Validation(format!("unknown flow '{flow}'")));
        }
        let required = parse_required_profiles(input)?;
        self.edits.set(flow.to_string(), required)
    }

    pub fn begin_save(&mut self) -> Result<SavePreview> {
        self.edits
            .begin_save(|flow, required| format!("{flow}: {required} profiles"))
    }

    pub fn cancel_save(&mut self) -> Result<()> {
        self.edits.cancel_save()
    }

    /// One write per dirty flow, then a single reload on full success.
    pub async fn confirm_save(&mut self) -> Result<usize> {
        let backend = Arc::clone(&self.backend);
        let applied = self
            .edits
            .confirm_save(|flow, required| {
                let backend = Arc::clone(&backend);
                async move { backend.set_required_profiles(&flow, required).await }
            })
            .await?;
        self.rows = self.backend.flows().await?;
        Ok(applied)
    }

    /// Full pass over the loaded rows with the buffer overlaid.
    pub fn metrics(&self) -> FlowMetrics {
        let buffer = self.edits.buffer();
        let total_required = self
            .rows
            .iter()
            .map(|f| u64::from(*buffer.effective(&f.name, &f.required_profiles)))
            .sum();
        FlowMetrics {
            flow_count: self.rows.len(),
            total_required,
            pending_edits: buffer.len(),
        }
    }
}

/// Required-profile inputs must parse to a finite, non-negative whole
/// number. Everything else is rejected locally and never buffered.
fn parse_required_profiles(input: &str) -> Result<u32> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| DashboardError::Validation(format!("'{input}' is not a number")))?;
    if !value.is_finite() {
        return Err(DashboardError::Validation(
            "required profiles must be finite".to_string(),
        ));
    }
    if value < 0.0 {
        return Err(DashboardError::Validation(
            "required profiles cannot be negative".to_string(),
        ));
    }
    if value.fract() != 0.0 {
        return Err(DashboardError::Validation(
            "required profiles must be a whole number".to_string(),
        ));
    }
    if value > f64::from(u32::MAX) {
        return Err(DashboardError::Validation(
            "required profiles is too large".to_string(),
        ));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::MockBackend;

    async fn loaded_tab(backend: &Arc<MockBackend>) -> FlowsTab {
        let mut tab = FlowsTab::new(Arc::clone(backend) as Arc<dyn SheetBackend>, None);
        tab.load(false).await.unwrap();
        tab
    }

    #[tokio::test]
    async fn load_uses_cache_when_present() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let cached = backend.flows.lock().unwrap().clone();
        let mut tab = FlowsTab::new(Arc::clone(&backend) as Arc<dyn SheetBackend>, Some(cached));

        tab.load(false).await.unwrap();
        assert_eq!(backend.call_count("getFlows"), 0);
        assert_eq!(tab.rows().len(), 3);
    }

    #[tokio::test]
    async fn forced_reload_discards_pending_edits() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        tab.edit_required("Ventas", "7").unwrap();
        assert_eq!(tab.state(), TabState::Dirty);

        tab.load(true).await.unwrap();
        assert_eq!(tab.state(), TabState::Clean);
        assert_eq!(tab.effective_required("Ventas"), Some(1));
    }

    #[tokio::test]
    async fn invalid_inputs_never_enter_the_buffer() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        for input in ["-1", "NaN", "abc", "2.5", "inf", ""] {
            assert!(
                matches!(
                    tab.edit_required("Ventas", input),
                    Err(DashboardError::Validation(_))
                ),
                "input {input:?} should be rejected"
            );
        }
        assert_eq!(tab.state(), TabState::Clean);
        assert_eq!(tab.effective_required("Ventas"), Some(1));
    }

    #[tokio::test]
    async fn zero_is_a_valid_required_count() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        tab.edit_required("Ventas", "0").unwrap();
        assert_eq!(tab.effective_required("Ventas"), Some(0));
    }

    #[tokio::test]
    async fn unknown_flow_is_rejected() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        assert!(matches!(
            tab.edit_required("Inexistente", "1"),
            Err(DashboardError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn pending_edit_overlays_backend_value() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        tab.edit_required("Ventas", "3").unwrap();
        assert_eq!(tab.effective_required("Ventas"), Some(3));
        assert_eq!(tab.effective_required("Soporte"), Some(2));
    }

    #[tokio::test]
    async fn metrics_use_the_overlay() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        // Backend totals: 1 + 2 + 0 = 3.
        assert_eq!(
            tab.metrics(),
            FlowMetrics {
                flow_count: 3,
                total_required: 3,
                pending_edits: 0
            }
        );

        tab.edit_required("Calidad", "4").unwrap();
        assert_eq!(
            tab.metrics(),
            FlowMetrics {
                flow_count: 3,
                total_required: 7,
                pending_edits: 1
            }
        );
    }

    #[tokio::test]
    async fn successful_save_clears_buffer_and_reloads_once() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        tab.edit_required("Ventas", "3").unwrap();
        let preview = tab.begin_save().unwrap();
        assert_eq!(preview.total, 1);
        assert_eq!(preview.lines, vec!["Ventas: 3 profiles"]);

        let applied = tab.confirm_save().await.unwrap();
        assert_eq!(applied, 1);
        assert_eq!(tab.state(), TabState::Clean);

        // The reloaded rows reflect confirmed server state, not the buffer.
        assert_eq!(tab.effective_required("Ventas"), Some(3));
        assert_eq!(backend.call_count("updateFlow"), 1);
        // Initial load plus exactly one post-save reload.
        assert_eq!(backend.call_count("getFlows"), 2);
    }

    #[tokio::test]
    async fn partial_failure_keeps_remainder_and_skips_reload() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        tab.edit_required("Ventas", "3").unwrap();
        tab.edit_required("Soporte", "4").unwrap();
        tab.edit_required("Calidad", "5").unwrap();
        backend.fail_writes_for("Soporte");

        tab.begin_save().unwrap();
        let err = tab.confirm_save().await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::PartialBatch { applied: 1, total: 3, .. }
        ));

        // Ventas was applied upstream; Soporte and Calidad stay pending.
        assert_eq!(tab.state(), TabState::Dirty);
        assert_eq!(tab.effective_required("Soporte"), Some(4));
        assert_eq!(backend.call_count("updateFlow"), 2);
        assert_eq!(backend.call_count("getFlows"), 1);
    }

    #[tokio::test]
    async fn cancel_leaves_buffer_dirty() {
        let backend = Arc::new(MockBackend::with_sample_data());
        let mut tab = loaded_tab(&backend).await;

        tab.edit_required("Ventas", "3").unwrap();
        tab.begin_save().unwrap();
        tab.cancel_save().unwrap();

        assert_eq!(tab.state(), TabState::Dirty);
        assert_eq!(backend.call_count("updateFlow"), 0);
    }
}
