//! One controller per editable entity family.
//!
//! Controllers share the same shape: fetch-or-use-cache, per-row edits into
//! an [`EditSession`](crate::submit::EditSession), derived metrics computed
//! by a full pass with pending edits overlaid, and the confirm-then-submit
//! save flow.

pub mod attendance;
pub mod eligibility;
pub mod flows;

pub use attendance::{AttendanceMetrics, AttendanceTab};
pub use eligibility::{EligibilityMetrics, EligibilityTab};
pub use flows::{FlowMetrics, FlowsTab};
