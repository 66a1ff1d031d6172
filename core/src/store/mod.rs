//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The desk and the tools go through `RosterStore` (or `DeskStore` helpers in
//! tests) and never execute SQL directly.

use crate::{
    error::{DeskError, DeskResult},
    event::EventLogEntry,
    model::{DailySummary, DaySnapshot, Employee, NewEmployee, Office},
    types::{EntityId, DATE_FORMAT},
    update::{EmployeeUpdate, OfficeUpdate},
};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

mod employee;
mod office;
mod summary;

/// Data-access contract of the roster back end.
///
/// Every write targets one entity (or one explicit id list) and either fully
/// succeeds or returns an error with nothing changed.
pub trait RosterStore {
    fn list_offices(&self) -> DeskResult<Vec<Office>>;

    fn get_office(&self, office_id: &str) -> DeskResult<Option<Office>>;

    fn create_office(&self, name: &str) -> DeskResult<Office>;

    /// Fails with `WriteRejected` when the office does not exist.
    fn update_office(&self, office_id: &str, update: &OfficeUpdate) -> DeskResult<()>;

    /// All employees, or only those whose office is `office_filter`.
    fn list_employees(&self, office_filter: Option<&str>) -> DeskResult<Vec<Employee>>;

    fn create_employee(&self, new: &NewEmployee) -> DeskResult<Employee>;

    /// Fails with `WriteRejected` when the employee does not exist.
    fn update_employee(&self, employee_id: &str, update: &EmployeeUpdate) -> DeskResult<()>;

    /// All-or-nothing: one unknown id rejects the whole batch.
    fn delete_employees(&self, employee_ids: &[EntityId]) -> DeskResult<()>;

    /// Newest date first.
    fn list_daily_summaries(&self) -> DeskResult<Vec<DailySummary>>;

    fn save_daily_summary(&self, date: NaiveDate, snapshot: &DaySnapshot) -> DeskResult<DailySummary>;

    fn delete_daily_summary(&self, summary_id: &str) -> DeskResult<()>;

    fn append_event(&self, entry: &EventLogEntry) -> DeskResult<()>;
}

pub struct DeskStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl DeskStore {
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new, isolated in-memory database.
    pub fn reopen(&self) -> DeskResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_roster.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_daily_summary.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_event_log.sql"))?;
        log::debug!("store: migrations applied");
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn insert_event(&self, entry: &EventLogEntry) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (date, event_type, payload) VALUES (?1, ?2, ?3)",
            params![
                entry.date.format(DATE_FORMAT).to_string(),
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn list_events(&self) -> DeskResult<Vec<EventLogEntry>> {
        self.query_events("SELECT id, date, event_type, payload FROM event_log ORDER BY id ASC", [])
    }

    pub fn events_for_date(&self, date: NaiveDate) -> DeskResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, date, event_type, payload FROM event_log
             WHERE date = ?1 ORDER BY id ASC",
            params![date.format(DATE_FORMAT).to_string()],
        )
    }

    fn query_events<P: rusqlite::Params>(&self, sql: &str, p: P) -> DeskResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(p, |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, date, event_type, payload)| {
                Ok(EventLogEntry {
                    id: Some(id),
                    date: parse_date("event_log.date", &date)?,
                    event_type,
                    payload,
                })
            })
            .collect()
    }

    // ── Test helpers ───────────────────────────────────────────

    pub fn event_count(&self) -> DeskResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM event_log", [], |r| r.get(0))?)
    }

    pub fn employee_count(&self) -> DeskResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM employee", [], |r| r.get(0))?)
    }
}

impl RosterStore for DeskStore {
    fn list_offices(&self) -> DeskResult<Vec<Office>> {
        self.select_offices()
    }

    fn get_office(&self, office_id: &str) -> DeskResult<Option<Office>> {
        self.select_office(office_id)
    }

    fn create_office(&self, name: &str) -> DeskResult<Office> {
        self.insert_office(name)
    }

    fn update_office(&self, office_id: &str, update: &OfficeUpdate) -> DeskResult<()> {
        self.write_office_update(office_id, update)
    }

    fn list_employees(&self, office_filter: Option<&str>) -> DeskResult<Vec<Employee>> {
        self.select_employees(office_filter)
    }

    fn create_employee(&self, new: &NewEmployee) -> DeskResult<Employee> {
        self.insert_employee(new)
    }

    fn update_employee(&self, employee_id: &str, update: &EmployeeUpdate) -> DeskResult<()> {
        self.write_employee_update(employee_id, update)
    }

    fn delete_employees(&self, employee_ids: &[EntityId]) -> DeskResult<()> {
        self.remove_employees(employee_ids)
    }

    fn list_daily_summaries(&self) -> DeskResult<Vec<DailySummary>> {
        self.select_daily_summaries()
    }

    fn save_daily_summary(&self, date: NaiveDate, snapshot: &DaySnapshot) -> DeskResult<DailySummary> {
        self.insert_daily_summary(date, snapshot)
    }

    fn delete_daily_summary(&self, summary_id: &str) -> DeskResult<()> {
        self.remove_daily_summary(summary_id)
    }

    fn append_event(&self, entry: &EventLogEntry) -> DeskResult<()> {
        self.insert_event(entry)
    }
}

fn new_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}

fn parse_date(column: &'static str, value: &str) -> DeskResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DeskError::InvalidData {
        column,
        value: value.to_string(),
    })
}
