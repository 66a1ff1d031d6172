//! roster-runner: headless attendance desk.
//!
//! Usage:
//!   roster-runner --db roster.db --data-dir ./data
//!   roster-runner --demo-seed 7 --date 2024-03-01
//!   roster-runner --db roster.db --ipc-mode

use anyhow::Result;
use chrono::NaiveDate;
use staffing_core::{
    classification::AssignmentView,
    config::DeskConfig,
    day_summary::{snapshot_deficits, NoteOverride},
    demo::{self, DemoSpec},
    desk::AttendanceDesk,
    model::{NewEmployee, Role},
    staffing::OfficeStaffing,
    store::DeskStore,
    types::{EntityId, DATE_FORMAT},
    update::{EmployeeUpdate, StaffingKind},
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    ListOffices,
    OfficeBySlug {
        slug: String,
    },
    CreateOffice {
        name: String,
    },
    CreateEmployee {
        employee: NewEmployee,
    },
    UpdateEmployee {
        employee_id: EntityId,
        update: EmployeeUpdate,
    },
    MoveEmployee {
        employee_id: EntityId,
        /// Absent means the administrative pool.
        #[serde(default)]
        office_id: Option<EntityId>,
    },
    RenameBulk {
        text: String,
    },
    AddBulk {
        text: String,
        #[serde(default)]
        office_id: Option<EntityId>,
    },
    DeleteEmployees {
        employee_ids: Vec<EntityId>,
    },
    SetStaffing {
        office_id: EntityId,
        kind: StaffingKind,
        role: Role,
        value: String,
    },
    SaveDay {
        #[serde(default)]
        notes: BTreeMap<EntityId, NoteOverride>,
    },
    ListSummaries,
    DeleteSummary {
        summary_id: EntityId,
    },
    StartNewDay {
        date: NaiveDate,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    date: NaiveDate,
    offices: usize,
    employees: usize,
    assignments: AssignmentView,
    staffing: Vec<OfficeStaffing>,
    prolonged_absences: Vec<staffing_core::classification::ProlongedAbsence>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let demo_seed: Option<u64> = arg_value(&args, "--demo-seed").and_then(|s| s.parse().ok());
    let today = match arg_value(&args, "--date") {
        Some(d) => NaiveDate::parse_from_str(d, DATE_FORMAT)
            .map_err(|e| anyhow::anyhow!("--date must be YYYY-MM-DD: {e}"))?,
        None => chrono::Local::now().date_naive(),
    };

    if !ipc_mode {
        println!("Staff attendance desk: roster-runner");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  date:      {today}");
        println!();
    }

    let config = match DeskConfig::load(data_dir) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; using built-in configuration");
            DeskConfig::default_test()
        }
    };

    let store = DeskStore::open(db)?;
    store.migrate()?;

    if let Some(seed) = demo_seed {
        let roster = demo::generate(&DemoSpec {
            seed,
            ..DemoSpec::default()
        });
        demo::seed_store(&store, &roster, today)?;
    }

    let mut desk = AttendanceDesk::load(store, config, today)?;

    if ipc_mode {
        run_ipc_loop(&mut desk)?;
    } else {
        print_report(&desk)?;
    }

    Ok(())
}

fn run_ipc_loop(desk: &mut AttendanceDesk<DeskStore>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        // Desk errors are reported to the client; only I/O ends the loop.
        match handle_command(desk, cmd) {
            Ok(response) => writeln!(stdout, "{}", serde_json::to_string(&response)?)?,
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(desk: &mut AttendanceDesk<DeskStore>, cmd: IpcCommand) -> Result<serde_json::Value> {
    let response = match cmd {
        IpcCommand::GetState => serde_json::to_value(build_ui_state(desk))?,
        IpcCommand::ListOffices => serde_json::to_value(desk.roster().offices())?,
        IpcCommand::OfficeBySlug { slug } => serde_json::to_value(desk.office_by_slug(&slug))?,
        IpcCommand::CreateOffice { name } => serde_json::to_value(desk.create_office(&name)?)?,
        IpcCommand::CreateEmployee { employee } => {
            serde_json::to_value(desk.create_employee(&employee)?)?
        }
        IpcCommand::UpdateEmployee { employee_id, update } => {
            desk.update_employee(&employee_id, &update)?;
            serde_json::to_value(desk.roster().employee(&employee_id))?
        }
        IpcCommand::MoveEmployee { employee_id, office_id } => {
            match office_id {
                Some(office_id) => desk.move_to_office(&employee_id, &office_id)?,
                None => desk.move_to_admin_pool(&employee_id)?,
            }
            serde_json::to_value(desk.roster().employee(&employee_id))?
        }
        IpcCommand::RenameBulk { text } => serde_json::to_value(desk.apply_name_updates(&text))?,
        IpcCommand::AddBulk { text, office_id } => {
            serde_json::to_value(desk.bulk_add(&text, office_id.as_deref())?)?
        }
        IpcCommand::DeleteEmployees { employee_ids } => {
            desk.delete_employees(&employee_ids)?;
            serde_json::json!({ "deleted": employee_ids.len() })
        }
        IpcCommand::SetStaffing { office_id, kind, role, value } => {
            let count = desk.set_staffing(&office_id, kind, role, &value)?;
            serde_json::json!({ "office_id": office_id, "value": count })
        }
        IpcCommand::SaveDay { notes } => serde_json::to_value(desk.save_day(&notes)?)?,
        IpcCommand::ListSummaries => serde_json::to_value(desk.daily_summaries()?)?,
        IpcCommand::DeleteSummary { summary_id } => {
            desk.delete_daily_summary(&summary_id)?;
            serde_json::json!({ "deleted": summary_id })
        }
        IpcCommand::StartNewDay { date } => serde_json::to_value(desk.start_new_day(date))?,
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(response)
}

fn build_ui_state(desk: &AttendanceDesk<DeskStore>) -> UiState {
    UiState {
        date: desk.today(),
        offices: desk.roster().offices().len(),
        employees: desk.roster().employees().len(),
        assignments: desk.assignment_view(),
        staffing: desk.staffing(),
        prolonged_absences: desk.prolonged_absences(),
    }
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_report(desk: &AttendanceDesk<DeskStore>) -> Result<()> {
    let everyone = desk.status_view(None);
    let view = desk.assignment_view();

    println!("=== ATTENDANCE ===");
    println!("  offices:        {}", desk.roster().offices().len());
    println!("  employees:      {}", everyone.total());
    println!("  presente:       {}", everyone.presente.len());
    println!("  atrasado:       {}", everyone.atrasado.len());
    println!("  ausente:        {}", everyone.ausente.len());
    println!("  administrative: {}", view.administrative.len());

    println!();
    println!("=== STAFFING (live / reported / target) ===");
    for office in desk.staffing() {
        let flag = if office.has_deficit() { "  << deficit" } else { "" };
        println!("  {}{flag}", office.office_name);
        for row in &office.rows {
            if row.theoretical == 0 && row.reported == 0 && row.live == 0 {
                continue;
            }
            let mark = if row.deficit { "!" } else { " " };
            println!(
                "   {mark} {:<12} {:>3} / {:>3} / {:>3}",
                row.role.as_str(), row.live, row.reported, row.theoretical
            );
        }
    }

    println!();
    println!("=== PROLONGED ABSENCES ===");
    let absences = desk.prolonged_absences();
    if absences.is_empty() {
        println!("  (none)");
    }
    for a in absences {
        let reason = a.employee.absence_reason.map(|r| r.as_str()).unwrap_or_default();
        let until = a
            .employee
            .absence_end_date
            .map(|d| format!(" until {d}"))
            .unwrap_or_default();
        println!("  {} | {} ({reason}{until})", a.employee.name, a.office_name);
    }

    println!();
    println!("=== SAVED DAYS (last 5) ===");
    let summaries = desk.daily_summaries()?;
    if summaries.is_empty() {
        println!("  (no days saved yet)");
    }
    for s in summaries.iter().take(5) {
        let deficits = snapshot_deficits(&s.summary);
        println!(
            "  {} | offices: {} | role deficits: {}",
            s.date,
            s.summary.len(),
            deficits.len()
        );
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
