//! Deterministic demo rosters for the runner and for tests.
//!
//! `generate()` is pure: same `DemoSpec`, same roster. `seed_store()` writes a
//! generated roster through the ordinary store interface.

use crate::{
    error::DeskResult,
    model::{AbsenceReason, Level, NewEmployee, Role, Status, WorkMode},
    name_generator::NameGenerator,
    rng::{DemoStream, RosterRng},
    store::RosterStore,
    types::StaffingMap,
    update::{EmployeeUpdate, OfficeUpdate},
};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSpec {
    pub seed: u64,
    pub branches: u32,
    pub mobile_units: u32,
    pub employees_per_office: u32,
}

impl Default for DemoSpec {
    fn default() -> Self {
        Self {
            seed: 42,
            branches: 4,
            mobile_units: 1,
            employees_per_office: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoOffice {
    pub name: String,
    pub theoretical_staffing: StaffingMap,
    pub real_staffing: StaffingMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoEmployee {
    pub name: String,
    pub office_index: usize,
    pub role: Role,
    pub level: Level,
    pub work_mode: WorkMode,
    pub status: Status,
    pub absence_reason: Option<AbsenceReason>,
    /// Days after "today"; only for prolonged absences.
    pub absence_days_left: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoRoster {
    pub offices: Vec<DemoOffice>,
    pub employees: Vec<DemoEmployee>,
}

pub fn generate(spec: &DemoSpec) -> DemoRoster {
    let mut office_rng = RosterRng::for_stream(spec.seed, DemoStream::Offices);
    let mut name_rng = RosterRng::for_stream(spec.seed, DemoStream::Names);
    let mut assign_rng = RosterRng::for_stream(spec.seed, DemoStream::Assignment);
    let mut attend_rng = RosterRng::for_stream(spec.seed, DemoStream::Attendance);

    let mut offices = Vec::new();
    let mut used_names = HashSet::new();
    for i in 0..spec.branches {
        let mut name = NameGenerator::generate_office_name(&mut office_rng, None);
        let mut attempts = 0;
        while used_names.contains(&name) && attempts < 20 {
            name = NameGenerator::generate_office_name(&mut office_rng, None);
            attempts += 1;
        }
        if used_names.contains(&name) {
            name = format!("{name} {}", i + 1);
        }
        used_names.insert(name.clone());
        offices.push(empty_office(name));
    }
    for n in 1..=spec.mobile_units {
        offices.push(empty_office(NameGenerator::generate_office_name(&mut office_rng, Some(n))));
    }

    let mut employees = Vec::new();
    for office_index in 0..offices.len() {
        for slot in 0..spec.employees_per_office {
            let role = if slot == 0 {
                Role::Supervision
            } else {
                random_role(&mut assign_rng)
            };
            let level = assign_rng
                .pick(&[Level::Nivel1, Level::Nivel2, Level::NivelIntermedio, Level::NivelBasico])
                .clone();
            let work_mode = if slot > 0 && assign_rng.chance(0.05) {
                WorkMode::Administrativo
            } else {
                WorkMode::Operaciones
            };
            let (status, absence_reason, absence_days_left) = random_attendance(&mut attend_rng);

            employees.push(DemoEmployee {
                name: NameGenerator::generate_full_name(&mut name_rng),
                office_index,
                role,
                level,
                work_mode,
                status,
                absence_reason,
                absence_days_left,
            });
        }
    }

    // Targets roughly match the roster; reported figures are what showed up.
    for (index, office) in offices.iter_mut().enumerate() {
        for e in employees
            .iter()
            .filter(|e| e.office_index == index && e.work_mode == WorkMode::Operaciones)
        {
            *office.theoretical_staffing.entry(e.role.clone()).or_insert(0) += 1;
            if e.status != Status::Ausente {
                *office.real_staffing.entry(e.role.clone()).or_insert(0) += 1;
            }
        }
        if office_rng.chance(0.3) {
            *office.theoretical_staffing.entry(Role::Modulo).or_insert(0) += 1;
        }
    }

    DemoRoster { offices, employees }
}

/// Writes `roster` into `store`. Prolonged absences end relative to `today`.
/// Returns (offices, employees) created.
pub fn seed_store<S: RosterStore>(store: &S, roster: &DemoRoster, today: NaiveDate) -> DeskResult<(usize, usize)> {
    let mut office_ids = Vec::with_capacity(roster.offices.len());
    for demo in &roster.offices {
        let office = store.create_office(&demo.name)?;
        store.update_office(
            &office.id,
            &OfficeUpdate {
                theoretical_staffing: demo.theoretical_staffing.clone(),
                real_staffing: demo.real_staffing.clone(),
            },
        )?;
        office_ids.push(office.id);
    }

    for demo in &roster.employees {
        let employee = store.create_employee(&NewEmployee {
            name: demo.name.clone(),
            office_id: Some(office_ids[demo.office_index].clone()),
            role: demo.role.clone(),
            level: demo.level.clone(),
        })?;
        let update = EmployeeUpdate {
            work_mode: Some(demo.work_mode),
            status: Some(demo.status),
            absence_reason: Some(demo.absence_reason),
            absence_end_date: Some(demo.absence_days_left.map(|d| today + Duration::days(d))),
            ..EmployeeUpdate::default()
        };
        store.update_employee(&employee.id, &update)?;
    }

    log::info!(
        "demo: seeded {} offices and {} employees",
        office_ids.len(),
        roster.employees.len()
    );
    Ok((office_ids.len(), roster.employees.len()))
}

fn empty_office(name: String) -> DemoOffice {
    DemoOffice {
        name,
        theoretical_staffing: StaffingMap::new(),
        real_staffing: StaffingMap::new(),
    }
}

fn random_role(rng: &mut RosterRng) -> Role {
    let roll = rng.next_f64();
    if roll < 0.6 {
        Role::Modulo
    } else if roll < 0.8 {
        Role::Tablet
    } else {
        Role::Anfitrion
    }
}

fn random_attendance(rng: &mut RosterRng) -> (Status, Option<AbsenceReason>, Option<i64>) {
    let roll = rng.next_f64();
    if roll < 0.80 {
        return (Status::Presente, None, None);
    }
    if roll < 0.87 {
        return (Status::Atrasado, None, None);
    }

    let reason = *rng.pick(&[
        AbsenceReason::Inasistencia,
        AbsenceReason::Inasistencia,
        AbsenceReason::LicenciaMedica,
        AbsenceReason::LicenciaMedica,
        AbsenceReason::Vacaciones,
        AbsenceReason::Otro,
    ]);
    let days_left = if reason.is_prolonged() && rng.chance(0.7) {
        Some(1 + rng.next_u64_below(20) as i64)
    } else {
        None
    };
    (Status::Ausente, Some(reason), days_left)
}
