//! Client-side core of the scheduling dashboard: optimistic edit buffers,
//! the confirm-then-submit save flow, and one controller per editable tab.
//!
//! Nothing here renders anything; controllers expose loaded rows, effective
//! (buffer-overlaid) values, and derived metrics for a view layer to show.

pub mod backend;
pub mod buffer;
pub mod errors;
pub mod metrics_defs;
pub mod session;
pub mod submit;
pub mod tabs;

#[cfg(test)]
pub(crate) mod testutils;

pub use backend::SheetBackend;
pub use buffer::EditBuffer;
pub use errors::DashboardError;
pub use session::{ActiveTab, BackendHealth, Session};
pub use submit::{EditSession, PREVIEW_LIMIT, SavePreview, TabState};
