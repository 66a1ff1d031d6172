//! Real vs. theoretical staffing per role.

use crate::{
    model::{Employee, Office, Role},
    types::EntityId,
};
use serde::{Deserialize, Serialize};

/// True when fewer people are available than the target calls for.
pub fn is_staffing_deficit(real_count: u32, theoretical_count: u32) -> bool {
    real_count < theoretical_count
}

/// Employees holding `role` who are present or late. Absent employees are
/// still assigned but do not count.
pub fn role_attendance_count(employees: &[Employee], role: &Role) -> usize {
    employees
        .iter()
        .filter(|e| &e.role == role && e.status.is_accounted_for())
        .count()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingRow {
    pub role: Role,
    /// From the live roster.
    pub live: u32,
    /// From the manual daily entry.
    pub reported: u32,
    pub theoretical: u32,
    pub deficit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeStaffing {
    pub office_id: EntityId,
    pub office_name: String,
    pub rows: Vec<StaffingRow>,
}

impl OfficeStaffing {
    pub fn has_deficit(&self) -> bool {
        self.rows.iter().any(|r| r.deficit)
    }
}

/// Staffing table for one office. `employees` may be the whole roster;
/// only this office's operations staff is counted. The deficit flag compares
/// the manually reported figure against the target.
pub fn office_staffing(office: &Office, employees: &[Employee], roles: &[Role]) -> OfficeStaffing {
    let assigned: Vec<Employee> = employees
        .iter()
        .filter(|e| !e.is_administrative() && e.office_id.as_deref() == Some(office.id.as_str()))
        .cloned()
        .collect();

    let rows = roles
        .iter()
        .map(|role| {
            let reported = office.real_for(role);
            let theoretical = office.theoretical_for(role);
            StaffingRow {
                role: role.clone(),
                live: role_attendance_count(&assigned, role) as u32,
                reported,
                theoretical,
                deficit: is_staffing_deficit(reported, theoretical),
            }
        })
        .collect();

    OfficeStaffing {
        office_id: office.id.clone(),
        office_name: office.name.clone(),
        rows,
    }
}

pub fn staffing_overview(offices: &[Office], employees: &[Employee], roles: &[Role]) -> Vec<OfficeStaffing> {
    offices
        .iter()
        .map(|o| office_staffing(o, employees, roles))
        .collect()
}
