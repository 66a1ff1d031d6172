//! Input checks run before any write-back. A failed check leaves every
//! piece of state untouched.

use crate::{
    error::{DeskError, DeskResult},
    model::{Employee, NewEmployee, Status},
};

/// Trimmed value of a required text field.
pub fn require_field<'a>(field: &str, value: &'a str) -> DeskResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeskError::validation(field, "a value is required"));
    }
    Ok(trimmed)
}

/// Parses a headcount typed by the user: a non-negative whole number.
pub fn parse_staffing_input(raw: &str) -> DeskResult<u32> {
    let value = require_field("staffing", raw)?;
    let parsed: i64 = value
        .parse()
        .map_err(|_| DeskError::validation("staffing", format!("'{value}' is not a whole number")))?;
    if parsed < 0 {
        return Err(DeskError::validation("staffing", format!("{parsed} is negative")));
    }
    u32::try_from(parsed)
        .map_err(|_| DeskError::validation("staffing", format!("{parsed} is too large")))
}

/// Absence fields must agree with the status once an edit is merged: a
/// reason only while Ausente, an end date only for a prolonged absence.
pub fn validate_absence_state(employee: &Employee) -> DeskResult<()> {
    if employee.absence_reason.is_some() && employee.status != Status::Ausente {
        return Err(DeskError::validation(
            "absence_reason",
            format!("an absence reason needs status Ausente, got {}", employee.status.as_str()),
        ));
    }
    if employee.absence_end_date.is_some() && !employee.has_prolonged_absence() {
        return Err(DeskError::validation(
            "absence_end_date",
            "only a prolonged absence has an end date",
        ));
    }
    Ok(())
}

pub fn validate_new_employee(new: &NewEmployee) -> DeskResult<()> {
    require_field("name", &new.name)?;
    if let Some(office_id) = &new.office_id {
        require_field("office_id", office_id)?;
    }
    Ok(())
}
