//! Partial updates and the optimistic local roster.
//!
//! WRITE-BACK DISCIPLINE:
//!   1. apply the update to the local roster, keeping the returned snapshot
//!   2. send the same update to the store
//!   3. on failure, hand the snapshot back to restore_*()
//!
//! One entity per update. Two in-flight updates to the same id are not
//! coordinated; whichever write-back completes last wins.

use crate::{
    error::{DeskError, DeskResult},
    model::{AbsenceReason, Employee, Level, Office, Role, Status, WorkMode},
    types::{EntityId, StaffingMap},
    validation::require_field,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Lets `"field": null` mean "clear" while a missing field means "leave alone".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ── Employee ───────────────────────────────────────────────────

/// The fields an employee edit may touch. `None` leaves a field unchanged;
/// for the absence fields `Some(None)` clears the value.
/// A status other than Ausente also clears both absence fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<WorkMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub absence_reason: Option<Option<AbsenceReason>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub absence_end_date: Option<Option<NaiveDate>>,
}

impl EmployeeUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Drop onto an office card: the employee becomes operations staff there.
    pub fn move_to_office(office_id: impl Into<EntityId>) -> Self {
        Self {
            office_id: Some(office_id.into()),
            work_mode: Some(WorkMode::Operaciones),
            ..Self::default()
        }
    }

    /// Drop onto the administrative pool. The office link is kept.
    pub fn move_to_admin_pool() -> Self {
        Self {
            work_mode: Some(WorkMode::Administrativo),
            ..Self::default()
        }
    }

    /// Present or late; any recorded absence is cleared.
    pub fn mark(status: Status) -> Self {
        if status == Status::Ausente {
            return Self::absent(AbsenceReason::Inasistencia, None);
        }
        Self {
            status: Some(status),
            absence_reason: Some(None),
            absence_end_date: Some(None),
            ..Self::default()
        }
    }

    /// Absent for `reason`. An end date is only kept for prolonged absences.
    pub fn absent(reason: AbsenceReason, end_date: Option<NaiveDate>) -> Self {
        Self {
            status: Some(Status::Ausente),
            absence_reason: Some(Some(reason)),
            absence_end_date: Some(end_date.filter(|_| reason.is_prolonged())),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.office_id.is_some() {
            fields.push("office_id");
        }
        if self.role.is_some() {
            fields.push("role");
        }
        if self.level.is_some() {
            fields.push("level");
        }
        if self.work_mode.is_some() {
            fields.push("work_mode");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.absence_reason.is_some() {
            fields.push("absence_reason");
        }
        if self.absence_end_date.is_some() {
            fields.push("absence_end_date");
        }
        fields
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.is_empty() {
            return Err(DeskError::validation("update", "no fields to change"));
        }
        if let Some(name) = &self.name {
            require_field("name", name)?;
        }
        if let Some(office_id) = &self.office_id {
            require_field("office_id", office_id)?;
        }
        if let (Some(Some(reason)), Some(Some(_))) = (self.absence_reason, self.absence_end_date) {
            if !reason.is_prolonged() {
                return Err(DeskError::validation(
                    "absence_end_date",
                    "a same-day absence has no end date",
                ));
            }
        }
        if let (Some(status), Some(Some(_))) = (self.status, self.absence_reason) {
            if status != Status::Ausente {
                return Err(DeskError::validation(
                    "absence_reason",
                    format!("an absence reason needs status Ausente, got {}", status.as_str()),
                ));
            }
        }
        Ok(())
    }

    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.trim().to_string();
        }
        if let Some(office_id) = &self.office_id {
            employee.office_id = Some(office_id.clone());
        }
        if let Some(role) = &self.role {
            employee.role = role.clone();
        }
        if let Some(level) = &self.level {
            employee.level = Some(level.clone());
        }
        if let Some(work_mode) = self.work_mode {
            employee.work_mode = work_mode;
        }
        if let Some(status) = self.status {
            employee.status = status;
            // Back at work: any recorded absence ends with it.
            if status != Status::Ausente {
                employee.absence_reason = None;
                employee.absence_end_date = None;
            }
        }
        if let Some(reason) = self.absence_reason {
            employee.absence_reason = reason;
        }
        if let Some(end_date) = self.absence_end_date {
            employee.absence_end_date = end_date;
        }
    }
}

// ── Office ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingKind {
    Theoretical,
    Real,
}

/// Per-role staffing entries to overwrite. Roles not listed keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficeUpdate {
    #[serde(default)]
    pub theoretical_staffing: StaffingMap,
    #[serde(default)]
    pub real_staffing: StaffingMap,
}

impl OfficeUpdate {
    pub fn set(kind: StaffingKind, role: Role, count: u32) -> Self {
        let mut update = Self::default();
        match kind {
            StaffingKind::Theoretical => update.theoretical_staffing.insert(role, count),
            StaffingKind::Real => update.real_staffing.insert(role, count),
        };
        update
    }

    pub fn is_empty(&self) -> bool {
        self.theoretical_staffing.is_empty() && self.real_staffing.is_empty()
    }

    pub fn apply_to(&self, office: &mut Office) {
        for (role, count) in &self.theoretical_staffing {
            office.theoretical_staffing.insert(role.clone(), *count);
        }
        for (role, count) in &self.real_staffing {
            office.real_staffing.insert(role.clone(), *count);
        }
    }
}

// ── Local roster ───────────────────────────────────────────────

/// The caller's working copy of the store. Mutations return the state they
/// replaced so a failed write-back can be reverted exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalRoster {
    offices: Vec<Office>,
    employees: Vec<Employee>,
}

impl LocalRoster {
    pub fn new(offices: Vec<Office>, employees: Vec<Employee>) -> Self {
        Self { offices, employees }
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn office(&self, id: &str) -> Option<&Office> {
        self.offices.iter().find(|o| o.id == id)
    }

    /// Applies `update` in place. Returns the pre-update employee, or `None`
    /// (and changes nothing) when the id is unknown.
    pub fn apply_employee_update(&mut self, id: &str, update: &EmployeeUpdate) -> Option<Employee> {
        let employee = self.employees.iter_mut().find(|e| e.id == id)?;
        let previous = employee.clone();
        update.apply_to(employee);
        Some(previous)
    }

    /// Compensating revert for a failed employee write-back.
    pub fn restore_employee(&mut self, previous: Employee) {
        match self.employees.iter_mut().find(|e| e.id == previous.id) {
            Some(slot) => *slot = previous,
            None => self.employees.push(previous),
        }
    }

    pub fn apply_office_update(&mut self, id: &str, update: &OfficeUpdate) -> Option<Office> {
        let office = self.offices.iter_mut().find(|o| o.id == id)?;
        let previous = office.clone();
        update.apply_to(office);
        Some(previous)
    }

    pub fn restore_office(&mut self, previous: Office) {
        match self.offices.iter_mut().find(|o| o.id == previous.id) {
            Some(slot) => *slot = previous,
            None => self.offices.push(previous),
        }
    }

    pub fn insert_office(&mut self, office: Office) {
        self.offices.push(office);
    }

    pub fn insert_employee(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    /// Removes the listed employees and returns them with their positions,
    /// for `restore_removed`.
    pub fn remove_employees(&mut self, ids: &[EntityId]) -> Vec<(usize, Employee)> {
        let mut removed = Vec::new();
        let mut index = 0;
        self.employees.retain(|e| {
            let keep = !ids.contains(&e.id);
            if !keep {
                removed.push((index, e.clone()));
            }
            index += 1;
            keep
        });
        removed
    }

    /// Puts employees removed by `remove_employees` back where they were.
    pub fn restore_removed(&mut self, removed: Vec<(usize, Employee)>) {
        for (index, employee) in removed {
            let at = index.min(self.employees.len());
            self.employees.insert(at, employee);
        }
    }
}
