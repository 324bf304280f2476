use crate::buffer::EditBuffer;
use crate::errors::{DashboardError, Result};
use crate::metrics_defs::{SAVED_ROWS, SAVE_BATCHES, SAVE_FAILURES};
use client::ClientError;
use shared::counter;
use std::fmt::Display;
use std::hash::Hash;

/// Maximum number of pending changes shown in a save confirmation preview.
pub const PREVIEW_LIMIT: usize = 12;

/// Observable state of an editable tab session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabState {
    /// Buffer empty.
    Clean,
    /// At least one pending edit.
    Dirty,
    /// A save was requested and awaits operator confirmation.
    PendingConfirmation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SavePhase {
    Idle,
    PendingConfirmation,
}

/// Preview presented to the operator before any network call is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePreview {
    /// Total pending changes in the buffer.
    pub total: usize,
    /// Rendered lines for the first [`PREVIEW_LIMIT`] changes.
    pub lines: Vec<String>,
}

/// Edit buffer plus the save-intent state machine shared by every editable
/// tab.
///
/// Save flow: `begin_save` builds a preview and enters
/// `PendingConfirmation`; `cancel_save` returns to `Dirty` with the buffer
/// untouched; `confirm_save` drains the buffer one sequential write per key,
/// in insertion order. The first failing write aborts the remainder:
/// applied keys are gone from the buffer, the failed key and everything
/// after it remain, and the error reports how far the loop got. Writes are
/// never retried and never rolled back.
#[derive(Debug, Clone)]
pub struct EditSession<K, V> {
    buffer: EditBuffer<K, V>,
    phase: SavePhase,
}

impl<K, V> Default for EditSession<K, V>
where
    K: Hash + Eq + Clone + Display,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EditSession<K, V>
where
    K: Hash + Eq + Clone + Display,
    V: Clone,
{
    pub fn new() -> Self {
        EditSession {
            buffer: EditBuffer::new(),
            phase: SavePhase::Idle,
        }
    }

    pub fn state(&self) -> TabState {
        match self.phase {
            SavePhase::PendingConfirmation => TabState::PendingConfirmation,
            SavePhase::Idle if self.buffer.is_empty() => TabState::Clean,
            SavePhase::Idle => TabState::Dirty,
        }
    }

    pub fn buffer(&self) -> &EditBuffer<K, V> {
        &self.buffer
    }

    /// Records a pending edit. Rejected while a confirmation is open so the
    /// preview the operator is looking at stays accurate.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        if self.phase == SavePhase::PendingConfirmation {
            return Err(DashboardError::ConfirmationPending);
        }
        self.buffer.set(key, value);
        Ok(())
    }

    /// Discards all pending edits and any open confirmation, silently.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.phase = SavePhase::Idle;
    }

    /// Requests a save: builds the confirmation preview and blocks further
    /// edits until the operator confirms or cancels.
    pub fn begin_save<F>(&mut self, render: F) -> Result<SavePreview>
    where
        F: Fn(&K, &V) -> String,
    {
        if self.phase == SavePhase::PendingConfirmation {
            return Err(DashboardError::ConfirmationPending);
        }
        if self.buffer.is_empty() {
            return Err(DashboardError::NothingToSave);
        }

        let lines = self
            .buffer
            .iter()
            .take(PREVIEW_LIMIT)
            .map(|(k, v)| render(k, v))
            .collect();
        self.phase = SavePhase::PendingConfirmation;
        Ok(SavePreview {
            total: self.buffer.len(),
            lines,
        })
    }

    /// Declines the pending save. The buffer is left untouched (still
    /// dirty).
    pub fn cancel_save(&mut self) -> Result<()> {
        if self.phase != SavePhase::PendingConfirmation {
            return Err(DashboardError::NoPendingConfirmation);
        }
        self.phase = SavePhase::Idle;
        Ok(())
    }

    /// Runs the confirmed save: one write per dirty key, strictly
    /// sequential, in insertion order. Returns the number of rows applied
    /// on full success.
    pub async fn confirm_save<F, Fut>(&mut self, mut write_row: F) -> Result<usize>
    where
        F: FnMut(K, V) -> Fut,
        Fut: Future<Output = Result<(), ClientError>>,
    {
        if self.phase != SavePhase::PendingConfirmation {
            return Err(DashboardError::NoPendingConfirmation);
        }
        self.phase = SavePhase::Idle;
        counter!(SAVE_BATCHES).increment(1);

        let pending = self.buffer.snapshot();
        let total = pending.len();
        let mut applied = 0;

        for (key, value) in pending {
            match write_row(key.clone(), value).await {
                Ok(()) => {
                    self.buffer.discard(&key);
                    applied += 1;
                    counter!(SAVED_ROWS).increment(1);
                }
                Err(source) => {
                    counter!(SAVE_FAILURES).increment(1);
                    tracing::error!(key = %key, applied, total, error = %source, "save aborted");
                    return Err(DashboardError::PartialBatch {
                        applied,
                        total,
                        failed_key: key.to_string(),
                        source,
                    });
                }
            }
        }

        tracing::debug!(applied, "save complete");
        Ok(applied)
    }
}
