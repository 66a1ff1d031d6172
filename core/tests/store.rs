//! Roster store tests against an in-memory database.

use chrono::NaiveDate;
use staffing_core::{
    error::DeskError,
    event::EventLogEntry,
    model::{AbsenceReason, DaySnapshot, Level, NewEmployee, OfficeSnapshot, Role, Status, WorkMode},
    store::{DeskStore, RosterStore},
    update::{EmployeeUpdate, OfficeUpdate, StaffingKind},
};

fn store() -> DeskStore {
    let store = DeskStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_employee(name: &str, office_id: Option<&str>) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        office_id: office_id.map(String::from),
        role: Role::Modulo,
        level: Level::NivelIntermedio,
    }
}

#[test]
fn migrations_can_run_twice() {
    let store = store();
    store.migrate().unwrap();
    assert_eq!(store.employee_count().unwrap(), 0);
}

#[test]
fn offices_keep_creation_order_and_staffing_maps() {
    let store = store();
    let a = store.create_office("  Of. Com. Providencia ").unwrap();
    let b = store.create_office("Of. Com. Maipú").unwrap();
    assert_eq!(a.name, "Of. Com. Providencia");

    store
        .update_office(&b.id, &OfficeUpdate::set(StaffingKind::Theoretical, Role::Anfitrion, 2))
        .unwrap();
    store
        .update_office(&b.id, &OfficeUpdate::set(StaffingKind::Real, Role::Anfitrion, 1))
        .unwrap();

    let offices = store.list_offices().unwrap();
    let ids: Vec<&str> = offices.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec![a.id.as_str(), b.id.as_str()]);

    let maipu = store.get_office(&b.id).unwrap().unwrap();
    assert_eq!(maipu.theoretical_for(&Role::Anfitrion), 2);
    assert_eq!(maipu.real_for(&Role::Anfitrion), 1);
    assert_eq!(maipu.real_for(&Role::Modulo), 0);
}

#[test]
fn unknown_office_update_is_rejected() {
    let store = store();
    let result = store.update_office("ghost", &OfficeUpdate::set(StaffingKind::Real, Role::Modulo, 1));
    assert!(matches!(result, Err(DeskError::WriteRejected { entity: "office", .. })));
    assert!(store.get_office("ghost").unwrap().is_none());
}

#[test]
fn new_employees_start_present_in_operations() {
    let store = store();
    let office = store.create_office("Of. Com. Providencia").unwrap();

    let ana = store.create_employee(&new_employee(" Ana Soto ", Some(&office.id))).unwrap();

    assert_eq!(ana.name, "Ana Soto");
    assert_eq!(ana.status, Status::Presente);
    assert_eq!(ana.work_mode, WorkMode::Operaciones);
    assert_eq!(ana.level, Some(Level::NivelIntermedio));
    assert_eq!(store.list_employees(None).unwrap(), vec![ana]);
}

#[test]
fn employee_with_unknown_office_cannot_be_created() {
    let store = store();
    let result = store.create_employee(&new_employee("Ana", Some("ghost")));
    assert!(matches!(result, Err(DeskError::Database(_))));
    assert_eq!(store.employee_count().unwrap(), 0);
}

#[test]
fn employee_list_filters_by_office() {
    let store = store();
    let o1 = store.create_office("A").unwrap();
    let o2 = store.create_office("B").unwrap();
    store.create_employee(&new_employee("Ana", Some(&o1.id))).unwrap();
    store.create_employee(&new_employee("Luis", Some(&o2.id))).unwrap();
    store.create_employee(&new_employee("Rosa", None)).unwrap();

    let in_b = store.list_employees(Some(&o2.id)).unwrap();
    assert_eq!(in_b.len(), 1);
    assert_eq!(in_b[0].name, "Luis");
    assert_eq!(store.list_employees(None).unwrap().len(), 3);
}

#[test]
fn partial_update_touches_only_named_fields() {
    let store = store();
    let office = store.create_office("A").unwrap();
    let ana = store.create_employee(&new_employee("Ana", Some(&office.id))).unwrap();

    store
        .update_employee(
            &ana.id,
            &EmployeeUpdate::absent(AbsenceReason::LicenciaMedica, Some(day("2024-05-01"))),
        )
        .unwrap();
    let on_leave = store.select_employee(&ana.id).unwrap().unwrap();
    assert_eq!(on_leave.name, "Ana");
    assert_eq!(on_leave.status, Status::Ausente);
    assert_eq!(on_leave.absence_reason, Some(AbsenceReason::LicenciaMedica));
    assert_eq!(on_leave.absence_end_date, Some(day("2024-05-01")));

    store.update_employee(&ana.id, &EmployeeUpdate::mark(Status::Presente)).unwrap();
    let back = store.select_employee(&ana.id).unwrap().unwrap();
    assert_eq!(back.status, Status::Presente);
    assert_eq!(back.absence_reason, None);
    assert_eq!(back.absence_end_date, None);
    assert_eq!(back.role, Role::Modulo);
}

#[test]
fn unknown_employee_update_is_rejected() {
    let store = store();
    let result = store.update_employee("ghost", &EmployeeUpdate::rename("Nadie"));
    assert!(matches!(result, Err(DeskError::WriteRejected { entity: "employee", .. })));
}

#[test]
fn unknown_labels_survive_a_round_trip() {
    let store = store();
    let ana = store
        .create_employee(&NewEmployee {
            name: "Ana".into(),
            office_id: None,
            role: Role::from_label("Cajero"),
            level: Level::from_label("Nivel 3"),
        })
        .unwrap();

    let stored = store.select_employee(&ana.id).unwrap().unwrap();
    assert_eq!(stored.role, Role::Other("Cajero".into()));
    assert_eq!(stored.level, Some(Level::Other("Nivel 3".into())));
}

#[test]
fn delete_is_all_or_nothing() {
    let store = store();
    let a = store.create_employee(&new_employee("A", None)).unwrap();
    let b = store.create_employee(&new_employee("B", None)).unwrap();

    let result = store.delete_employees(&[a.id.clone(), "ghost".to_string(), b.id.clone()]);
    assert!(matches!(result, Err(DeskError::WriteRejected { .. })));
    assert_eq!(store.employee_count().unwrap(), 2, "nothing may be deleted");

    store.delete_employees(&[a.id.clone(), b.id.clone()]).unwrap();
    assert_eq!(store.employee_count().unwrap(), 0);
}

#[test]
fn summaries_list_newest_first() {
    let store = store();
    let mut snapshot = DaySnapshot::new();
    snapshot.insert(
        "o1".into(),
        OfficeSnapshot {
            office_name: "Of. Com. Providencia".into(),
            real_staffing: [(Role::Modulo, 2)].into_iter().collect(),
            theoretical_staffing: [(Role::Modulo, 3)].into_iter().collect(),
            daily_absence_note: "Ana Soto".into(),
            prolonged_absence_note: String::new(),
        },
    );

    let older = store.save_daily_summary(day("2024-03-01"), &snapshot).unwrap();
    let newer = store.save_daily_summary(day("2024-03-04"), &snapshot).unwrap();
    let same_day = store.save_daily_summary(day("2024-03-04"), &DaySnapshot::new()).unwrap();

    let listed = store.list_daily_summaries().unwrap();
    let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![same_day.id.as_str(), newer.id.as_str(), older.id.as_str()]);
    assert_eq!(listed[2].summary, snapshot);
}

#[test]
fn deleting_an_unknown_summary_is_rejected() {
    let store = store();
    let saved = store.save_daily_summary(day("2024-03-01"), &DaySnapshot::new()).unwrap();

    assert!(store.delete_daily_summary("ghost").is_err());
    store.delete_daily_summary(&saved.id).unwrap();
    assert!(store.delete_daily_summary(&saved.id).is_err(), "a summary is deleted once");
}

#[test]
fn events_are_listed_in_append_order_and_by_date() {
    let store = store();
    for (date, kind) in [("2024-03-01", "a"), ("2024-03-02", "b"), ("2024-03-01", "c")] {
        store
            .append_event(&EventLogEntry {
                id: None,
                date: day(date),
                event_type: kind.to_string(),
                payload: "{}".to_string(),
            })
            .unwrap();
    }

    let all: Vec<String> = store.list_events().unwrap().into_iter().map(|e| e.event_type).collect();
    assert_eq!(all, vec!["a", "b", "c"]);

    let first_day = store.events_for_date(day("2024-03-01")).unwrap();
    assert_eq!(first_day.len(), 2);
    assert!(first_day.iter().all(|e| e.id.is_some()));
    assert_eq!(store.event_count().unwrap(), 3);
}

#[test]
fn reopened_connection_sees_the_same_roster() {
    let store = DeskStore::open("file:store_reopen?mode=memory&cache=shared").unwrap();
    store.migrate().unwrap();
    let office = store.create_office("Of. Com. Providencia").unwrap();

    let second = store.reopen().unwrap();

    assert_eq!(second.get_office(&office.id).unwrap(), Some(office));
}

#[test]
fn reopening_a_private_in_memory_store_starts_empty() {
    let store = store();
    store.create_office("Of. Com. Providencia").unwrap();

    let fresh = store.reopen().unwrap();
    fresh.migrate().unwrap();

    assert!(fresh.list_offices().unwrap().is_empty());
}
