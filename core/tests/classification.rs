//! Classification engine tests.
//!
//! Covers: status partitioning, office/administrative grouping, absence
//! sub-buckets, roster ordering, and the prolonged-absence report.

use chrono::NaiveDate;
use staffing_core::{
    classification::{
        classify_by_assignment_and_absence, classify_by_status, compare_roster_order,
        exclude_marked_offices, list_prolonged_absences,
    },
    model::{AbsenceReason, Employee, Level, Office, Role, Status, WorkMode},
};
use std::cmp::Ordering;

fn emp(id: &str, name: &str, office: Option<&str>, role: Role) -> Employee {
    Employee::new(id, name, office.map(String::from), role)
}

fn absent(mut e: Employee, reason: AbsenceReason, end: Option<&str>) -> Employee {
    e.status = Status::Ausente;
    e.absence_reason = Some(reason);
    e.absence_end_date = end.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap());
    e
}

fn offices() -> Vec<Office> {
    vec![Office::new("o1", "Of. Com. Providencia"), Office::new("o2", "Of. Com. Maipú")]
}

fn ids(list: &[Employee]) -> Vec<&str> {
    list.iter().map(|e| e.id.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// By status
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_employee_lands_in_exactly_one_status_bucket() {
    let mut late = emp("e2", "Luis", Some("o1"), Role::Tablet);
    late.status = Status::Atrasado;
    let roster = vec![
        emp("e1", "Ana", Some("o1"), Role::Modulo),
        late,
        absent(emp("e3", "Marta", Some("o2"), Role::Modulo), AbsenceReason::Vacaciones, None),
        emp("e4", "Pedro", None, Role::Anfitrion),
        absent(emp("e5", "Rosa", Some("zz"), Role::Tablet), AbsenceReason::Inasistencia, None),
    ];

    let buckets = classify_by_status(&roster);

    assert_eq!(buckets.total(), roster.len());
    let mut all: Vec<&str> = ids(&buckets.presente);
    all.extend(ids(&buckets.atrasado));
    all.extend(ids(&buckets.ausente));
    all.sort();
    assert_eq!(all, vec!["e1", "e2", "e3", "e4", "e5"]);

    assert_eq!(ids(buckets.get(Status::Presente)), vec!["e1", "e4"]);
    assert_eq!(ids(buckets.get(Status::Atrasado)), vec!["e2"]);
    assert_eq!(ids(buckets.get(Status::Ausente)), vec!["e3", "e5"]);
}

#[test]
fn status_buckets_keep_input_order() {
    let roster = vec![
        emp("e1", "Zoe", Some("o1"), Role::Anfitrion),
        emp("e2", "Ana", Some("o1"), Role::Supervision),
        emp("e3", "Mia", Some("o1"), Role::Modulo),
    ];

    let buckets = classify_by_status(&roster);

    assert_eq!(ids(&buckets.presente), vec!["e1", "e2", "e3"]);
}

#[test]
fn empty_roster_gives_empty_buckets() {
    let buckets = classify_by_status(&[]);
    assert_eq!(buckets.total(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// By assignment and absence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn administrative_staff_go_to_the_pool_regardless_of_office() {
    let mut admin = emp("e1", "Ana", Some("o1"), Role::Modulo);
    admin.work_mode = WorkMode::Administrativo;
    let roster = vec![admin, emp("e2", "Luis", Some("o1"), Role::Modulo)];

    let view = classify_by_assignment_and_absence(&roster, &offices());

    assert_eq!(ids(&view.administrative.active), vec!["e1"]);
    assert_eq!(ids(&view.office("o1").unwrap().active), vec!["e2"]);
}

#[test]
fn employees_with_unknown_office_are_silently_excluded() {
    let roster = vec![
        emp("e1", "Ana", Some("missing"), Role::Modulo),
        emp("e2", "Luis", None, Role::Modulo),
        emp("e3", "Rosa", Some("o2"), Role::Modulo),
    ];

    let view = classify_by_assignment_and_absence(&roster, &offices());

    let placed: usize = view.by_office.values().map(|g| g.len()).sum::<usize>() + view.administrative.len();
    assert_eq!(placed, 1, "only the employee with a known office is placed");
    assert_eq!(ids(&view.office("o2").unwrap().active), vec!["e3"]);
    assert!(view.office("missing").is_none());
}

#[test]
fn every_known_office_has_an_entry_even_when_empty() {
    let view = classify_by_assignment_and_absence(&[], &offices());

    assert_eq!(view.by_office.len(), 2);
    assert!(view.office("o1").unwrap().is_empty());
    assert!(view.administrative.is_empty());
}

#[test]
fn absences_split_into_daily_and_prolonged() {
    let roster = vec![
        emp("e1", "Ana", Some("o1"), Role::Modulo),
        absent(emp("e2", "Luis", Some("o1"), Role::Modulo), AbsenceReason::Inasistencia, None),
        absent(emp("e3", "Marta", Some("o1"), Role::Modulo), AbsenceReason::LicenciaMedica, None),
        absent(emp("e4", "Pedro", Some("o1"), Role::Modulo), AbsenceReason::Vacaciones, None),
        absent(emp("e5", "Rosa", Some("o1"), Role::Modulo), AbsenceReason::Otro, None),
    ];

    let view = classify_by_assignment_and_absence(&roster, &offices());
    let groups = view.office("o1").unwrap();

    assert_eq!(ids(&groups.active), vec!["e1"]);
    assert_eq!(ids(&groups.daily_absence), vec!["e2"]);
    assert_eq!(ids(&groups.prolonged_absence), vec!["e3", "e4", "e5"]);
}

#[test]
fn every_placed_employee_appears_exactly_once() {
    let mut admin_absent = absent(emp("e6", "Iris", Some("o2"), Role::Tablet), AbsenceReason::Vacaciones, None);
    admin_absent.work_mode = WorkMode::Administrativo;
    let roster = vec![
        emp("e1", "Ana", Some("o1"), Role::Modulo),
        absent(emp("e2", "Luis", Some("o1"), Role::Tablet), AbsenceReason::Inasistencia, None),
        absent(emp("e3", "Marta", Some("o2"), Role::Anfitrion), AbsenceReason::Otro, None),
        emp("e4", "Pedro", Some("o2"), Role::Supervision),
        emp("e5", "Rosa", Some("nowhere"), Role::Modulo),
        admin_absent,
    ];

    let view = classify_by_assignment_and_absence(&roster, &offices());

    let mut seen: Vec<&str> = Vec::new();
    for groups in view.by_office.values().chain(std::iter::once(&view.administrative)) {
        seen.extend(ids(&groups.active));
        seen.extend(ids(&groups.prolonged_absence));
        seen.extend(ids(&groups.daily_absence));
    }
    seen.sort();
    assert_eq!(seen, vec!["e1", "e2", "e3", "e4", "e6"], "e5 has no known office");
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn role_outranks_name() {
    let mut zoe = emp("e1", "Zoe", Some("o1"), Role::Anfitrion);
    zoe.level = Some(Level::Nivel1);
    let mut ana = emp("e2", "Ana", Some("o1"), Role::Modulo);
    ana.level = Some(Level::NivelBasico);

    let view = classify_by_assignment_and_absence(&[zoe, ana], &offices());

    assert_eq!(ids(&view.office("o1").unwrap().active), vec!["e2", "e1"]);
}

#[test]
fn roles_sort_supervision_modulo_tablet_anfitrion_then_unknown() {
    let roster = vec![
        emp("cajero", "A", Some("o1"), Role::from_label("Cajero")),
        emp("anfitrion", "A", Some("o1"), Role::Anfitrion),
        emp("tablet", "A", Some("o1"), Role::Tablet),
        emp("modulo", "A", Some("o1"), Role::Modulo),
        emp("supervision", "A", Some("o1"), Role::Supervision),
    ];

    let view = classify_by_assignment_and_absence(&roster, &offices());

    assert_eq!(
        ids(&view.office("o1").unwrap().active),
        vec!["supervision", "modulo", "tablet", "anfitrion", "cajero"]
    );
}

#[test]
fn levels_sort_within_a_role_with_missing_level_as_basico() {
    let with_level = |id: &str, name: &str, level: Option<Level>| {
        let mut e = emp(id, name, Some("o1"), Role::Modulo);
        e.level = level;
        e
    };
    let roster = vec![
        with_level("unknown", "A", Some(Level::from_label("Nivel 3"))),
        with_level("missing", "B", None),
        with_level("basico", "A", Some(Level::NivelBasico)),
        with_level("n1", "A", Some(Level::Nivel1)),
        with_level("intermedio", "A", Some(Level::NivelIntermedio)),
        with_level("n2", "A", Some(Level::Nivel2)),
    ];

    let view = classify_by_assignment_and_absence(&roster, &offices());

    assert_eq!(
        ids(&view.office("o1").unwrap().active),
        vec!["n2", "intermedio", "n1", "basico", "missing", "unknown"]
    );
}

#[test]
fn name_tiebreak_is_case_sensitive() {
    let a = emp("e1", "ana", Some("o1"), Role::Modulo);
    let b = emp("e2", "Beto", Some("o1"), Role::Modulo);

    // Upper-case letters sort before lower-case ones.
    assert_eq!(compare_roster_order(&a, &b), Ordering::Greater);
}

// ─────────────────────────────────────────────────────────────────────────────
// Prolonged absences
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn dated_absences_come_first_then_undated_by_name() {
    let roster = vec![
        absent(emp("e1", "Zoe", Some("o1"), Role::Modulo), AbsenceReason::Vacaciones, None),
        absent(emp("e2", "Ana", Some("o2"), Role::Modulo), AbsenceReason::Otro, None),
        absent(emp("e3", "Mia", Some("o1"), Role::Modulo), AbsenceReason::LicenciaMedica, Some("2024-02-10")),
        absent(emp("e4", "Luis", Some("o2"), Role::Tablet), AbsenceReason::Vacaciones, Some("2024-01-01")),
    ];

    let list = list_prolonged_absences(&roster, &offices());

    let order: Vec<&str> = list.iter().map(|a| a.employee.id.as_str()).collect();
    assert_eq!(order, vec!["e4", "e3", "e2", "e1"]);
    assert_eq!(list[0].office_name, "Of. Com. Maipú");
}

#[test]
fn prolonged_list_skips_present_daily_and_unresolvable() {
    let mut on_leave_but_back = emp("e1", "Ana", Some("o1"), Role::Modulo);
    on_leave_but_back.absence_reason = Some(AbsenceReason::Vacaciones);

    let roster = vec![
        on_leave_but_back,
        absent(emp("e2", "Luis", Some("o1"), Role::Modulo), AbsenceReason::Inasistencia, None),
        absent(emp("e3", "Rosa", Some("mobile"), Role::Modulo), AbsenceReason::Vacaciones, None),
        absent(emp("e4", "Marta", Some("o1"), Role::Modulo), AbsenceReason::LicenciaMedica, None),
    ];

    let list = list_prolonged_absences(&roster, &offices());

    assert_eq!(list.len(), 1);
    assert_eq!(list[0].employee.id, "e4");
}

#[test]
fn marked_offices_are_excluded_case_insensitively() {
    let mut all = offices();
    all.push(Office::new("m1", "Unidad Móvil 1"));

    let kept = exclude_marked_offices(&all, &["UNIDAD MÓVIL".to_string(), "  ".to_string()]);

    let names: Vec<&str> = kept.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(names, vec!["o1", "o2"]);
}
