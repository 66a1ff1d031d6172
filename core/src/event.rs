//! Audit trail of desk write-backs.
//!
//! RULE: An event is appended only after the store accepted the write, or
//! after a rejected write has been rolled back locally.

use crate::types::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Variants are only ever appended; stored payloads must keep decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    // ── Roster ─────────────────────────────────────
    OfficeCreated {
        office_id: EntityId,
        name: String,
    },
    OfficeStaffingUpdated {
        office_id: EntityId,
        roles: Vec<String>,
    },
    EmployeeCreated {
        employee_id: EntityId,
        name: String,
        office_id: Option<EntityId>,
    },
    EmployeeUpdated {
        employee_id: EntityId,
        fields: Vec<String>,
    },
    EmployeesDeleted {
        employee_ids: Vec<EntityId>,
    },
    WriteRolledBack {
        entity: String,
        entity_id: EntityId,
        reason: String,
    },

    // ── Bulk edits ─────────────────────────────────
    NamesUpdated {
        applied: usize,
        failed: usize,
        not_found: Vec<String>,
    },
    EmployeesBulkAdded {
        office_id: Option<EntityId>,
        created: usize,
    },
    DayRolledOver {
        date: NaiveDate,
        employees_reset: usize,
        #[serde(default)]
        failed: usize,
    },

    // ── Daily summaries ────────────────────────────
    DaySummarySaved {
        summary_id: EntityId,
        date: NaiveDate,
        offices: usize,
    },
    DaySummaryDeleted {
        summary_id: EntityId,
    },
}

impl DeskEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::OfficeCreated { .. } => "office_created",
            Self::OfficeStaffingUpdated { .. } => "office_staffing_updated",
            Self::EmployeeCreated { .. } => "employee_created",
            Self::EmployeeUpdated { .. } => "employee_updated",
            Self::EmployeesDeleted { .. } => "employees_deleted",
            Self::WriteRolledBack { .. } => "write_rolled_back",
            Self::NamesUpdated { .. } => "names_updated",
            Self::EmployeesBulkAdded { .. } => "employees_bulk_added",
            Self::DayRolledOver { .. } => "day_rolled_over",
            Self::DaySummarySaved { .. } => "day_summary_saved",
            Self::DaySummaryDeleted { .. } => "day_summary_deleted",
        }
    }
}

/// A persisted event log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub event_type: String,
    pub payload: String,
}
