//! Classification engine: partitions the roster for the attendance views.
//!
//! Everything here is pure: inputs are borrowed, outputs are fresh owned
//! collections, nothing is cached between calls.
//!
//! ORDERING RULE (every grouped view):
//!   1. role rank   Supervisión < Modulo < Tablet < Anfitrión < unknown
//!   2. level rank  Nivel 2 < Nivel intermedio < Nivel 1 < Nivel Básico < unknown
//!   3. name        case-sensitive, byte-wise
//!
//! Unknown values sort last; unresolvable offices exclude the employee.

use crate::{
    model::{Employee, Office, Status},
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

// ── By status ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusBuckets {
    pub presente: Vec<Employee>,
    pub atrasado: Vec<Employee>,
    pub ausente: Vec<Employee>,
}

impl StatusBuckets {
    pub fn get(&self, status: Status) -> &[Employee] {
        match status {
            Status::Presente => &self.presente,
            Status::Atrasado => &self.atrasado,
            Status::Ausente => &self.ausente,
        }
    }

    pub fn total(&self) -> usize {
        self.presente.len() + self.atrasado.len() + self.ausente.len()
    }
}

/// One bucket per status, input order preserved inside each bucket.
pub fn classify_by_status(employees: &[Employee]) -> StatusBuckets {
    let mut buckets = StatusBuckets::default();
    for e in employees {
        let bucket = match e.status {
            Status::Presente => &mut buckets.presente,
            Status::Atrasado => &mut buckets.atrasado,
            Status::Ausente => &mut buckets.ausente,
        };
        bucket.push(e.clone());
    }
    buckets
}

// ── By assignment and absence ──────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Groups {
    pub active: Vec<Employee>,
    pub prolonged_absence: Vec<Employee>,
    pub daily_absence: Vec<Employee>,
}

impl Groups {
    fn push(&mut self, employee: &Employee) {
        if employee.has_daily_absence() {
            self.daily_absence.push(employee.clone());
        } else if employee.has_prolonged_absence() {
            self.prolonged_absence.push(employee.clone());
        } else {
            self.active.push(employee.clone());
        }
    }

    fn sort(&mut self) {
        self.active.sort_by(compare_roster_order);
        self.prolonged_absence.sort_by(compare_roster_order);
        self.daily_absence.sort_by(compare_roster_order);
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.prolonged_absence.len() + self.daily_absence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentView {
    /// Every supplied office has an entry, empty or not.
    pub by_office: BTreeMap<EntityId, Groups>,
    pub administrative: Groups,
}

impl AssignmentView {
    pub fn office(&self, office_id: &str) -> Option<&Groups> {
        self.by_office.get(office_id)
    }
}

pub fn classify_by_assignment_and_absence(
    employees: &[Employee],
    offices: &[Office],
) -> AssignmentView {
    let mut view = AssignmentView {
        by_office: offices
            .iter()
            .map(|o| (o.id.clone(), Groups::default()))
            .collect(),
        administrative: Groups::default(),
    };

    let mut unassigned = 0usize;
    for e in employees {
        if e.is_administrative() {
            view.administrative.push(e);
            continue;
        }
        match e.office_id.as_ref().and_then(|id| view.by_office.get_mut(id)) {
            Some(groups) => groups.push(e),
            None => unassigned += 1,
        }
    }

    view.administrative.sort();
    for groups in view.by_office.values_mut() {
        groups.sort();
    }

    log::debug!(
        "classification: {} employees, {} offices, {unassigned} without a known office",
        employees.len(),
        offices.len()
    );
    view
}

/// Roster display order: role rank, then level rank, then name.
pub fn compare_roster_order(a: &Employee, b: &Employee) -> Ordering {
    a.role
        .rank()
        .cmp(&b.role.rank())
        .then_with(|| a.effective_level().rank().cmp(&b.effective_level().rank()))
        .then_with(|| a.name.cmp(&b.name))
}

// ── Prolonged absences ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProlongedAbsence {
    #[serde(flatten)]
    pub employee: Employee,
    pub office_name: String,
}

/// Absent employees on medical leave, vacation or "other" leave whose office
/// is in `offices`. Dated absences first (earliest end first), then undated
/// ones by name.
pub fn list_prolonged_absences(employees: &[Employee], offices: &[Office]) -> Vec<ProlongedAbsence> {
    let office_names: HashMap<&str, &str> = offices
        .iter()
        .map(|o| (o.id.as_str(), o.name.as_str()))
        .collect();

    let mut absences: Vec<ProlongedAbsence> = employees
        .iter()
        .filter(|e| e.status == Status::Ausente && e.has_prolonged_absence())
        .filter_map(|e| {
            let office_name = e.office_id.as_deref().and_then(|id| office_names.get(id))?;
            Some(ProlongedAbsence {
                employee: e.clone(),
                office_name: office_name.to_string(),
            })
        })
        .collect();

    absences.sort_by(|a, b| {
        match (a.employee.absence_end_date, b.employee.absence_end_date) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.employee.name.cmp(&b.employee.name),
        }
    });
    absences
}

/// Drops offices whose name contains any of `markers` (case-insensitive).
/// Mobile units are kept out of the prolonged-absence report this way.
pub fn exclude_marked_offices(offices: &[Office], markers: &[String]) -> Vec<Office> {
    let markers: Vec<String> = markers
        .iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect();
    offices
        .iter()
        .filter(|o| {
            let name = o.name.to_lowercase();
            !markers.iter().any(|m| name.contains(m.as_str()))
        })
        .cloned()
        .collect()
}
