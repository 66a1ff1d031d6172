//! Pasted-text parsers for bulk roster edits.
//!
//! Parsing is best-effort: malformed lines are dropped without a report.
//! Only lookup misses come back to the caller, as data.

use crate::{
    config::BulkDefaults,
    model::{Employee, NewEmployee},
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const RENAME_SEPARATOR: char = '>';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameUpdate {
    pub employee_id: EntityId,
    pub new_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameUpdatePlan {
    /// Input order. A name listed twice yields two updates for the same employee.
    pub updates: Vec<NameUpdate>,
    /// Unmatched left-hand sides, verbatim (trimmed), input order.
    pub not_found: Vec<String>,
}

impl NameUpdatePlan {
    /// One update per employee, keeping the last instruction for each. Same end
    /// state as applying `updates` in order, with fewer writes.
    pub fn collapsed(&self) -> Vec<NameUpdate> {
        let mut last_index: HashMap<&str, usize> = HashMap::new();
        for (i, u) in self.updates.iter().enumerate() {
            last_index.insert(u.employee_id.as_str(), i);
        }
        self.updates
            .iter()
            .enumerate()
            .filter(|(i, u)| last_index.get(u.employee_id.as_str()) == Some(i))
            .map(|(_, u)| u.clone())
            .collect()
    }
}

/// Parses `CurrentName > NewName` lines against the roster.
///
/// Names match case-insensitively after trimming; the first matching employee
/// wins. Lines without a separator or with a blank current name are skipped,
/// as are matched lines with a blank new name. An unmatched current name is
/// reported whatever its right-hand side.
pub fn parse_name_updates(text: &str, employees: &[Employee]) -> NameUpdatePlan {
    let mut plan = NameUpdatePlan::default();

    for line in text.lines() {
        let Some((current, new_name)) = line.split_once(RENAME_SEPARATOR) else {
            continue;
        };
        let current = current.trim();
        let new_name = new_name.trim();
        if current.is_empty() {
            continue;
        }

        let wanted = current.to_lowercase();
        match employees
            .iter()
            .find(|e| e.name.trim().to_lowercase() == wanted)
        {
            // A blank new name would wipe the employee's name.
            Some(_) if new_name.is_empty() => continue,
            Some(e) => plan.updates.push(NameUpdate {
                employee_id: e.id.clone(),
                new_name: new_name.to_string(),
            }),
            None => plan.not_found.push(current.to_string()),
        }
    }

    plan
}

/// One trimmed name per non-blank line.
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Create instructions for a pasted list of names, all in one office, with
/// role and level taken from `defaults`.
pub fn plan_bulk_add(text: &str, office_id: Option<&str>, defaults: &BulkDefaults) -> Vec<NewEmployee> {
    parse_name_list(text)
        .into_iter()
        .map(|name| NewEmployee {
            name,
            office_id: office_id.map(String::from),
            role: defaults.role.clone(),
            level: defaults.level.clone(),
        })
        .collect()
}
