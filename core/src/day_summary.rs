//! Builds the snapshot stored by "save day".

use crate::{
    classification::{classify_by_assignment_and_absence, Groups},
    model::{DaySnapshot, Employee, Office, OfficeSnapshot, Role},
    staffing::is_staffing_deficit,
    types::{EntityId, StaffingMap, DATE_FORMAT},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hand-written notes that replace the drafted ones for an office.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteOverride {
    #[serde(default)]
    pub daily_absence_note: Option<String>,
    #[serde(default)]
    pub prolonged_absence_note: Option<String>,
}

/// Snapshot of every office: the manually reported and target headcount for
/// each of `roles`, plus absence notes drafted from the roster unless
/// `overrides` supplies them.
pub fn build_day_snapshot(
    offices: &[Office],
    employees: &[Employee],
    roles: &[Role],
    overrides: &BTreeMap<EntityId, NoteOverride>,
) -> DaySnapshot {
    let view = classify_by_assignment_and_absence(employees, offices);
    let empty = Groups::default();

    offices
        .iter()
        .map(|office| {
            let groups = view.office(&office.id).unwrap_or(&empty);
            let over = overrides.get(&office.id);

            let daily_absence_note = over
                .and_then(|o| o.daily_absence_note.clone())
                .unwrap_or_else(|| draft_daily_absence_note(groups));
            let prolonged_absence_note = over
                .and_then(|o| o.prolonged_absence_note.clone())
                .unwrap_or_else(|| draft_prolonged_absence_note(groups));

            let snapshot = OfficeSnapshot {
                office_name: office.name.clone(),
                real_staffing: pick_roles(roles, |r| office.real_for(r)),
                theoretical_staffing: pick_roles(roles, |r| office.theoretical_for(r)),
                daily_absence_note,
                prolonged_absence_note,
            };
            (office.id.clone(), snapshot)
        })
        .collect()
}

fn pick_roles(roles: &[Role], count: impl Fn(&Role) -> u32) -> StaffingMap {
    roles.iter().map(|r| (r.clone(), count(r))).collect()
}

/// "Ana Soto, Luis Mora" in roster order; empty when nobody is missing.
pub fn draft_daily_absence_note(groups: &Groups) -> String {
    groups
        .daily_absence
        .iter()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// "Ana Soto (Vacaciones hasta 2024-01-05); Luis Mora (Licencia médica)".
pub fn draft_prolonged_absence_note(groups: &Groups) -> String {
    groups
        .prolonged_absence
        .iter()
        .map(|e| {
            let reason = e.absence_reason.map(|r| r.as_str()).unwrap_or_default();
            match e.absence_end_date {
                Some(end) => format!("{} ({reason} hasta {})", e.name, end.format(DATE_FORMAT)),
                None => format!("{} ({reason})", e.name),
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDeficit {
    pub office_id: EntityId,
    pub office_name: String,
    pub role: Role,
    pub real: u32,
    pub theoretical: u32,
}

/// Every (office, role) pair in a saved snapshot that was under target.
pub fn snapshot_deficits(snapshot: &DaySnapshot) -> Vec<SnapshotDeficit> {
    let mut deficits = Vec::new();
    for (office_id, office) in snapshot {
        for (role, &theoretical) in &office.theoretical_staffing {
            let real = office.real_staffing.get(role).copied().unwrap_or(0);
            if is_staffing_deficit(real, theoretical) {
                deficits.push(SnapshotDeficit {
                    office_id: office_id.clone(),
                    office_name: office.office_name.clone(),
                    role: role.clone(),
                    real,
                    theoretical,
                });
            }
        }
    }
    deficits
}
