//! Employee queries.

use super::{new_id, parse_date, DeskStore};
use crate::{
    error::{DeskError, DeskResult},
    model::{AbsenceReason, Employee, Level, NewEmployee, Role, Status, WorkMode},
    types::{EntityId, DATE_FORMAT},
    update::EmployeeUpdate,
};
use rusqlite::{params, OptionalExtension};

const EMPLOYEE_COLUMNS: &str = "employee_id, name, office_id, role, level, work_mode,
                                status, absence_reason, absence_end_date";

/// Raw column values; enum labels are decoded afterwards so a bad label
/// surfaces as `InvalidData` rather than a SQLite conversion error.
struct EmployeeRow {
    employee_id: String,
    name: String,
    office_id: Option<String>,
    role: String,
    level: Option<String>,
    work_mode: String,
    status: String,
    absence_reason: Option<String>,
    absence_end_date: Option<String>,
}

impl EmployeeRow {
    fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            employee_id: r.get(0)?,
            name: r.get(1)?,
            office_id: r.get(2)?,
            role: r.get(3)?,
            level: r.get(4)?,
            work_mode: r.get(5)?,
            status: r.get(6)?,
            absence_reason: r.get(7)?,
            absence_end_date: r.get(8)?,
        })
    }

    fn into_employee(self) -> DeskResult<Employee> {
        Ok(Employee {
            id: self.employee_id,
            name: self.name,
            office_id: self.office_id,
            role: Role::from_label(&self.role),
            level: self.level.as_deref().map(Level::from_label),
            work_mode: self.work_mode.parse::<WorkMode>()?,
            status: self.status.parse::<Status>()?,
            absence_reason: self
                .absence_reason
                .as_deref()
                .map(str::parse::<AbsenceReason>)
                .transpose()?,
            absence_end_date: self
                .absence_end_date
                .as_deref()
                .map(|d| parse_date("employee.absence_end_date", d))
                .transpose()?,
        })
    }
}

impl DeskStore {
    pub fn select_employees(&self, office_filter: Option<&str>) -> DeskResult<Vec<Employee>> {
        let rows = match office_filter {
            Some(office_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employee
                     WHERE office_id = ?1 ORDER BY rowid ASC"
                ))?;
                let rows = stmt
                    .query_map(params![office_id], EmployeeRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employee ORDER BY rowid ASC"
                ))?;
                let rows = stmt
                    .query_map([], EmployeeRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        rows.into_iter().map(EmployeeRow::into_employee).collect()
    }

    pub fn select_employee(&self, employee_id: &str) -> DeskResult<Option<Employee>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE employee_id = ?1"),
                params![employee_id],
                EmployeeRow::from_row,
            )
            .optional()?;
        row.map(EmployeeRow::into_employee).transpose()
    }

    pub fn insert_employee(&self, new: &NewEmployee) -> DeskResult<Employee> {
        let mut employee = Employee::new(new_id(), new.name.trim(), new.office_id.clone(), new.role.clone());
        employee.level = Some(new.level.clone());
        self.write_employee_row(&employee, true)?;
        Ok(employee)
    }

    pub fn write_employee_update(&self, employee_id: &str, update: &EmployeeUpdate) -> DeskResult<()> {
        let mut employee = self
            .select_employee(employee_id)?
            .ok_or_else(|| DeskError::WriteRejected {
                entity: "employee",
                id: employee_id.to_string(),
            })?;
        update.apply_to(&mut employee);
        self.write_employee_row(&employee, false)
    }

    pub fn remove_employees(&self, employee_ids: &[EntityId]) -> DeskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for id in employee_ids {
            let deleted = tx.execute("DELETE FROM employee WHERE employee_id = ?1", params![id])?;
            if deleted == 0 {
                // Dropping the transaction rolls back earlier deletes.
                return Err(DeskError::WriteRejected {
                    entity: "employee",
                    id: id.clone(),
                });
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_employee_row(&self, e: &Employee, insert: bool) -> DeskResult<()> {
        let sql = if insert {
            "INSERT INTO employee (employee_id, name, office_id, role, level, work_mode,
                                   status, absence_reason, absence_end_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        } else {
            "UPDATE employee SET name = ?2, office_id = ?3, role = ?4, level = ?5,
                                 work_mode = ?6, status = ?7, absence_reason = ?8,
                                 absence_end_date = ?9
             WHERE employee_id = ?1"
        };
        let written = self.conn.execute(
            sql,
            params![
                e.id,
                e.name,
                e.office_id,
                e.role.as_str(),
                e.level.as_ref().map(|l| l.as_str()),
                e.work_mode.as_str(),
                e.status.as_str(),
                e.absence_reason.map(|r| r.as_str()),
                e.absence_end_date.map(|d| d.format(DATE_FORMAT).to_string()),
            ],
        )?;
        if written == 0 {
            return Err(DeskError::WriteRejected {
                entity: "employee",
                id: e.id.clone(),
            });
        }
        Ok(())
    }
}
