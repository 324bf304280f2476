//! Backend record shapes, limited to the fields the dashboard touches.
//!
//! The spreadsheet backend speaks camelCase JSON; everything else about its
//! rows is opaque and intentionally not modeled.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub name: String,
    pub required_profiles: u32,
}

/// One row of the eligibility matrix for the currently selected collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub flow: String,
    pub enabled: bool,
    pub fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub collaborator_id: String,
    /// Attendance code for the day; empty string means "no entry".
    #[serde(default)]
    pub code: String,
}

/// Attendance for one day: the entries plus the backend-supplied list of
/// valid codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheet {
    pub day: String,
    pub codes: Vec<String>,
    pub entries: Vec<AttendanceEntry>,
}
