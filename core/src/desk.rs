//! The attendance desk, the caller side of the roster store.
//!
//! The desk keeps a local copy of the roster that the views are computed
//! from. Every edit follows the same three steps:
//!   1. validate (no state touched on failure)
//!   2. apply to the local copy, keeping the replaced state
//!   3. write back; on rejection restore the replaced state
//!
//! No retries. A rejected write is logged, recorded in the audit trail and
//! returned to the caller, who decides whether to try again.

use crate::{
    bulk_parser::{parse_name_updates, plan_bulk_add, NameUpdate},
    classification::{
        classify_by_assignment_and_absence, classify_by_status, exclude_marked_offices,
        list_prolonged_absences, AssignmentView, ProlongedAbsence, StatusBuckets,
    },
    config::DeskConfig,
    day_summary::{build_day_snapshot, NoteOverride},
    error::{DeskError, DeskResult},
    event::{DeskEvent, EventLogEntry},
    model::{DailySummary, Employee, NewEmployee, Office, Role, Status},
    slug::find_office_by_slug,
    staffing::{staffing_overview, OfficeStaffing},
    store::RosterStore,
    types::EntityId,
    update::{EmployeeUpdate, LocalRoster, OfficeUpdate, StaffingKind},
    validation::{parse_staffing_input, require_field, validate_absence_state, validate_new_employee},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One line of a bulk edit that reached the store and was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkRenameReport {
    pub applied: Vec<NameUpdate>,
    pub failed: Vec<BulkFailure>,
    pub not_found: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkAddReport {
    pub created: Vec<Employee>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloverReport {
    pub date: NaiveDate,
    pub reset: Vec<EntityId>,
    pub failed: Vec<BulkFailure>,
}

pub struct AttendanceDesk<S: RosterStore> {
    store: S,
    config: DeskConfig,
    roster: LocalRoster,
    today: NaiveDate,
}

impl<S: RosterStore> AttendanceDesk<S> {
    /// A desk with an empty local roster. Call `refresh()` to populate it.
    pub fn new(store: S, config: DeskConfig, today: NaiveDate) -> Self {
        Self {
            store,
            config,
            roster: LocalRoster::default(),
            today,
        }
    }

    /// Build a desk and load the roster from the store.
    pub fn load(store: S, config: DeskConfig, today: NaiveDate) -> DeskResult<Self> {
        let mut desk = Self::new(store, config, today);
        desk.refresh()?;
        Ok(desk)
    }

    /// Replace the local copy with the store's current state.
    pub fn refresh(&mut self) -> DeskResult<()> {
        let offices = self.store.list_offices()?;
        let employees = self.store.list_employees(None)?;
        log::info!(
            "desk: loaded {} offices and {} employees",
            offices.len(),
            employees.len()
        );
        self.roster = LocalRoster::new(offices, employees);
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn roster(&self) -> &LocalRoster {
        &self.roster
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    // ── Views ──────────────────────────────────────────────────

    /// Status buckets for one office's operations staff, or for everyone.
    pub fn status_view(&self, office_id: Option<&str>) -> StatusBuckets {
        match office_id {
            Some(id) => {
                let employees: Vec<Employee> = self
                    .roster
                    .employees()
                    .iter()
                    .filter(|e| !e.is_administrative() && e.office_id.as_deref() == Some(id))
                    .cloned()
                    .collect();
                classify_by_status(&employees)
            }
            None => classify_by_status(self.roster.employees()),
        }
    }

    pub fn assignment_view(&self) -> AssignmentView {
        classify_by_assignment_and_absence(self.roster.employees(), self.roster.offices())
    }

    /// Prolonged absences, leaving out offices matched by the configured
    /// exclusion markers.
    pub fn prolonged_absences(&self) -> Vec<ProlongedAbsence> {
        let offices = exclude_marked_offices(self.roster.offices(), &self.config.excluded_office_markers);
        list_prolonged_absences(self.roster.employees(), &offices)
    }

    pub fn staffing(&self) -> Vec<OfficeStaffing> {
        staffing_overview(
            self.roster.offices(),
            self.roster.employees(),
            &self.config.summary_roles,
        )
    }

    pub fn office_by_slug(&self, slug: &str) -> Option<&Office> {
        find_office_by_slug(self.roster.offices(), slug)
    }

    // ── Offices ────────────────────────────────────────────────

    pub fn create_office(&mut self, name: &str) -> DeskResult<Office> {
        let name = require_field("name", name)?;
        let office = self.store.create_office(name)?;
        log::info!("desk: office '{}' created ({})", office.name, office.id);
        self.record(DeskEvent::OfficeCreated {
            office_id: office.id.clone(),
            name: office.name.clone(),
        });
        self.roster.insert_office(office.clone());
        Ok(office)
    }

    /// Set one role's target or reported headcount from raw user input.
    pub fn set_staffing(
        &mut self,
        office_id: &str,
        kind: StaffingKind,
        role: Role,
        raw: &str,
    ) -> DeskResult<u32> {
        let count = parse_staffing_input(raw)?;
        let update = OfficeUpdate::set(kind, role.clone(), count);

        let previous = self
            .roster
            .apply_office_update(office_id, &update)
            .ok_or_else(|| DeskError::NotFound {
                entity: "office",
                id: office_id.to_string(),
            })?;

        if let Err(e) = self.store.update_office(office_id, &update) {
            self.roster.restore_office(previous);
            self.rolled_back("office", office_id, &e);
            return Err(e);
        }

        self.record(DeskEvent::OfficeStaffingUpdated {
            office_id: office_id.to_string(),
            roles: vec![role.as_str().to_string()],
        });
        Ok(count)
    }

    // ── Employees ──────────────────────────────────────────────

    /// Names are not required to be unique; a duplicate only logs a warning
    /// and bulk matching keeps first-match semantics.
    pub fn create_employee(&mut self, new: &NewEmployee) -> DeskResult<Employee> {
        validate_new_employee(new)?;
        if let Some(office_id) = &new.office_id {
            self.require_office(office_id)?;
        }
        if self.has_employee_named(&new.name) {
            log::warn!("desk: an employee named '{}' already exists", new.name.trim());
        }

        let employee = self.store.create_employee(new)?;
        self.record(DeskEvent::EmployeeCreated {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            office_id: employee.office_id.clone(),
        });
        self.roster.insert_employee(employee.clone());
        Ok(employee)
    }

    /// Validated, optimistic, single-employee write-back. The update is
    /// checked both on its own and merged into the current record.
    pub fn update_employee(&mut self, employee_id: &str, update: &EmployeeUpdate) -> DeskResult<()> {
        update.validate()?;
        if let Some(office_id) = &update.office_id {
            self.require_office(office_id)?;
        }

        let not_found = || DeskError::NotFound {
            entity: "employee",
            id: employee_id.to_string(),
        };
        let mut merged = self.roster.employee(employee_id).ok_or_else(not_found)?.clone();
        update.apply_to(&mut merged);
        validate_absence_state(&merged)?;

        let previous = self
            .roster
            .apply_employee_update(employee_id, update)
            .ok_or_else(not_found)?;

        if let Err(e) = self.store.update_employee(employee_id, update) {
            self.roster.restore_employee(previous);
            self.rolled_back("employee", employee_id, &e);
            return Err(e);
        }

        log::info!(
            "desk: employee {employee_id} updated ({})",
            update.changed_fields().join(", ")
        );
        self.record(DeskEvent::EmployeeUpdated {
            employee_id: employee_id.to_string(),
            fields: update.changed_fields().into_iter().map(String::from).collect(),
        });
        Ok(())
    }

    pub fn move_to_office(&mut self, employee_id: &str, office_id: &str) -> DeskResult<()> {
        self.update_employee(employee_id, &EmployeeUpdate::move_to_office(office_id))
    }

    pub fn move_to_admin_pool(&mut self, employee_id: &str) -> DeskResult<()> {
        self.update_employee(employee_id, &EmployeeUpdate::move_to_admin_pool())
    }

    /// Deletes the selection in one write-back. Repeated ids count once.
    pub fn delete_employees(&mut self, selection: &[EntityId]) -> DeskResult<()> {
        if selection.is_empty() {
            return Err(DeskError::validation("employee_ids", "nothing selected"));
        }
        let mut unique: Vec<EntityId> = Vec::with_capacity(selection.len());
        for id in selection {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }
        let employee_ids = unique.as_slice();
        if let Some(missing) = employee_ids.iter().find(|id| self.roster.employee(id).is_none()) {
            return Err(DeskError::NotFound {
                entity: "employee",
                id: missing.clone(),
            });
        }

        let removed = self.roster.remove_employees(employee_ids);
        if let Err(e) = self.store.delete_employees(employee_ids) {
            self.roster.restore_removed(removed);
            self.rolled_back("employee", &employee_ids.join(","), &e);
            return Err(e);
        }

        log::info!("desk: {} employees deleted", employee_ids.len());
        self.record(DeskEvent::EmployeesDeleted {
            employee_ids: employee_ids.to_vec(),
        });
        Ok(())
    }

    // ── Bulk edits ─────────────────────────────────────────────

    /// Applies `CurrentName > NewName` lines one by one, in input order.
    ///
    /// Every line is matched against the roster as it was before the first
    /// rename, so a name listed twice renames the same employee twice and the
    /// last line wins. A rejected write does not stop the remaining lines.
    pub fn apply_name_updates(&mut self, text: &str) -> BulkRenameReport {
        let plan = parse_name_updates(text, self.roster.employees());
        let mut report = BulkRenameReport {
            not_found: plan.not_found.clone(),
            ..BulkRenameReport::default()
        };

        for update in plan.updates {
            match self.update_employee(&update.employee_id, &EmployeeUpdate::rename(update.new_name.clone())) {
                Ok(()) => report.applied.push(update),
                Err(e) => report.failed.push(BulkFailure {
                    name: update.new_name,
                    error: e.to_string(),
                }),
            }
        }

        if !report.not_found.is_empty() {
            log::warn!("desk: bulk rename could not find {:?}", report.not_found);
        }
        self.record(DeskEvent::NamesUpdated {
            applied: report.applied.len(),
            failed: report.failed.len(),
            not_found: report.not_found.clone(),
        });
        report
    }

    /// Creates one employee per pasted name, with the configured role/level.
    pub fn bulk_add(&mut self, text: &str, office_id: Option<&str>) -> DeskResult<BulkAddReport> {
        if let Some(id) = office_id {
            self.require_office(id)?;
        }
        let plan = plan_bulk_add(text, office_id, &self.config.bulk_defaults);
        let mut report = BulkAddReport::default();

        for new in &plan {
            match self.create_employee(new) {
                Ok(employee) => report.created.push(employee),
                Err(e) => report.failed.push(BulkFailure {
                    name: new.name.clone(),
                    error: e.to_string(),
                }),
            }
        }

        log::info!(
            "desk: bulk add created {} of {} employees",
            report.created.len(),
            plan.len()
        );
        self.record(DeskEvent::EmployeesBulkAdded {
            office_id: office_id.map(String::from),
            created: report.created.len(),
        });
        Ok(report)
    }

    /// Moves the desk to `today` and resets yesterday's attendance:
    /// lateness and same-day absences return to Presente, and prolonged
    /// absences that ended before `today` are cleared. A rejected reset does
    /// not stop the others; it is listed in the report.
    pub fn start_new_day(&mut self, today: NaiveDate) -> RolloverReport {
        self.today = today;

        let to_reset: Vec<(EntityId, String)> = self
            .roster
            .employees()
            .iter()
            .filter(|e| needs_reset(e, today))
            .map(|e| (e.id.clone(), e.name.clone()))
            .collect();

        let reset = EmployeeUpdate::mark(Status::Presente);
        let mut report = RolloverReport {
            date: today,
            reset: Vec::new(),
            failed: Vec::new(),
        };
        for (id, name) in to_reset {
            match self.update_employee(&id, &reset) {
                Ok(()) => report.reset.push(id),
                Err(e) => report.failed.push(BulkFailure {
                    name,
                    error: e.to_string(),
                }),
            }
        }

        log::info!(
            "desk: new day {today}, {} employees reset, {} failed",
            report.reset.len(),
            report.failed.len()
        );
        self.record(DeskEvent::DayRolledOver {
            date: today,
            employees_reset: report.reset.len(),
            failed: report.failed.len(),
        });
        report
    }

    // ── Daily summaries ────────────────────────────────────────

    pub fn save_day(&mut self, overrides: &BTreeMap<EntityId, NoteOverride>) -> DeskResult<DailySummary> {
        if self.roster.offices().is_empty() {
            return Err(DeskError::validation("offices", "there are no offices to summarise"));
        }
        let snapshot = build_day_snapshot(
            self.roster.offices(),
            self.roster.employees(),
            &self.config.summary_roles,
            overrides,
        );
        let summary = self.store.save_daily_summary(self.today, &snapshot)?;

        log::info!("desk: day {} saved as {}", summary.date, summary.id);
        self.record(DeskEvent::DaySummarySaved {
            summary_id: summary.id.clone(),
            date: summary.date,
            offices: summary.summary.len(),
        });
        Ok(summary)
    }

    pub fn daily_summaries(&self) -> DeskResult<Vec<DailySummary>> {
        self.store.list_daily_summaries()
    }

    pub fn delete_daily_summary(&mut self, summary_id: &str) -> DeskResult<()> {
        self.store.delete_daily_summary(summary_id)?;
        self.record(DeskEvent::DaySummaryDeleted {
            summary_id: summary_id.to_string(),
        });
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────

    fn require_office(&self, office_id: &str) -> DeskResult<()> {
        if self.roster.office(office_id).is_none() {
            return Err(DeskError::NotFound {
                entity: "office",
                id: office_id.to_string(),
            });
        }
        Ok(())
    }

    fn has_employee_named(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.roster
            .employees()
            .iter()
            .any(|e| e.name.trim().to_lowercase() == wanted)
    }

    fn rolled_back(&self, entity: &str, entity_id: &str, error: &DeskError) {
        log::warn!("desk: write-back for {entity} {entity_id} rejected, local state restored: {error}");
        self.record(DeskEvent::WriteRolledBack {
            entity: entity.to_string(),
            entity_id: entity_id.to_string(),
            reason: error.to_string(),
        });
    }

    /// The audit trail never fails an edit that the store already accepted.
    fn record(&self, event: DeskEvent) {
        let payload = match serde_json::to_string(&event) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("desk: could not encode {} event: {e}", event.type_name());
                return;
            }
        };
        let entry = EventLogEntry {
            id: None,
            date: self.today,
            event_type: event.type_name().to_string(),
            payload,
        };
        if let Err(e) = self.store.append_event(&entry) {
            log::warn!("desk: could not record {} event: {e}", entry.event_type);
        }
    }
}

fn needs_reset(e: &Employee, today: NaiveDate) -> bool {
    if e.has_prolonged_absence() {
        return e.absence_end_date.is_some_and(|end| end < today);
    }
    e.status != Status::Presente || e.absence_reason.is_some()
}
