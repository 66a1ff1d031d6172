//! Roster records: offices, employees and saved daily summaries.
//!
//! Every enumeration round-trips through the exact display label used by the
//! dashboard ("Supervisión", "Licencia médica", ...). Those labels are what the
//! store persists and what the IPC layer exchanges.

use crate::{
    error::{DeskError, DeskResult},
    slug::slugify,
    types::{EntityId, StaffingMap},
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── Role ───────────────────────────────────────────────────────

/// Job role. Labels outside the known set are carried verbatim and always
/// sort after the known roles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Supervision,
    Modulo,
    Tablet,
    Anfitrion,
    /// Only listed in the daily summary staffing table.
    Filtro,
    Other(String),
}

impl Role {
    /// Roles an employee can be assigned from the roster screens.
    pub const ASSIGNABLE: [Role; 4] = [Role::Modulo, Role::Anfitrion, Role::Tablet, Role::Supervision];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Supervision => "Supervisión",
            Self::Modulo => "Modulo",
            Self::Tablet => "Tablet",
            Self::Anfitrion => "Anfitrión",
            Self::Filtro => "Filtro",
            Self::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Supervisión" => Self::Supervision,
            "Modulo" => Self::Modulo,
            "Tablet" => Self::Tablet,
            "Anfitrión" => Self::Anfitrion,
            "Filtro" => Self::Filtro,
            other => Self::Other(other.to_string()),
        }
    }

    /// Display rank: Supervisión < Modulo < Tablet < Anfitrión < anything else.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Supervision => 0,
            Self::Modulo => 1,
            Self::Tablet => 2,
            Self::Anfitrion => 3,
            Self::Filtro | Self::Other(_) => 4,
        }
    }
}

// ── Level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Nivel1,
    Nivel2,
    NivelIntermedio,
    NivelBasico,
    Other(String),
}

impl Level {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Nivel1 => "Nivel 1",
            Self::Nivel2 => "Nivel 2",
            Self::NivelIntermedio => "Nivel intermedio",
            Self::NivelBasico => "Nivel Básico",
            Self::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Nivel 1" => Self::Nivel1,
            "Nivel 2" => Self::Nivel2,
            "Nivel intermedio" => Self::NivelIntermedio,
            "Nivel Básico" => Self::NivelBasico,
            other => Self::Other(other.to_string()),
        }
    }

    /// Display rank: Nivel 2 < Nivel intermedio < Nivel 1 < Nivel Básico < anything else.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Nivel2 => 0,
            Self::NivelIntermedio => 1,
            Self::Nivel1 => 2,
            Self::NivelBasico => 3,
            Self::Other(_) => 4,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::NivelBasico
    }
}

macro_rules! label_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                Ok(Self::from_label(&label))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_serde!(Role);
label_serde!(Level);

// ── Closed enumerations ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkMode {
    #[default]
    Operaciones,
    Administrativo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Presente,
    Atrasado,
    Ausente,
}

impl Status {
    /// Present or late: the employee is accounted for today.
    pub fn is_accounted_for(&self) -> bool {
        matches!(self, Self::Presente | Self::Atrasado)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbsenceReason {
    Inasistencia,
    #[serde(rename = "Licencia médica")]
    LicenciaMedica,
    Vacaciones,
    Otro,
}

impl AbsenceReason {
    /// Medical leave, vacation and "other" span several days.
    pub fn is_prolonged(&self) -> bool {
        !matches!(self, Self::Inasistencia)
    }
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operaciones => "Operaciones",
            Self::Administrativo => "Administrativo",
        }
    }
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presente => "Presente",
            Self::Atrasado => "Atrasado",
            Self::Ausente => "Ausente",
        }
    }
}

impl AbsenceReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inasistencia => "Inasistencia",
            Self::LicenciaMedica => "Licencia médica",
            Self::Vacaciones => "Vacaciones",
            Self::Otro => "Otro",
        }
    }
}

impl FromStr for WorkMode {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        match s {
            "Operaciones" => Ok(Self::Operaciones),
            "Administrativo" => Ok(Self::Administrativo),
            other => Err(DeskError::InvalidData { column: "work_mode", value: other.to_string() }),
        }
    }
}

impl FromStr for Status {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        match s {
            "Presente" => Ok(Self::Presente),
            "Atrasado" => Ok(Self::Atrasado),
            "Ausente" => Ok(Self::Ausente),
            other => Err(DeskError::InvalidData { column: "status", value: other.to_string() }),
        }
    }
}

impl FromStr for AbsenceReason {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        match s {
            "Inasistencia" => Ok(Self::Inasistencia),
            "Licencia médica" => Ok(Self::LicenciaMedica),
            "Vacaciones" => Ok(Self::Vacaciones),
            "Otro" => Ok(Self::Otro),
            other => Err(DeskError::InvalidData { column: "absence_reason", value: other.to_string() }),
        }
    }
}

// ── Office ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub theoretical_staffing: StaffingMap,
    #[serde(default)]
    pub real_staffing: StaffingMap,
}

impl Office {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            theoretical_staffing: BTreeMap::new(),
            real_staffing: BTreeMap::new(),
        }
    }

    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    pub fn theoretical_for(&self, role: &Role) -> u32 {
        self.theoretical_staffing.get(role).copied().unwrap_or(0)
    }

    pub fn real_for(&self, role: &Role) -> u32 {
        self.real_staffing.get(role).copied().unwrap_or(0)
    }
}

// ── Employee ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub office_id: Option<EntityId>,
    pub role: Role,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub work_mode: WorkMode,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub absence_reason: Option<AbsenceReason>,
    #[serde(default)]
    pub absence_end_date: Option<NaiveDate>,
}

impl Employee {
    /// A present, operations employee with no recorded absence.
    pub fn new(
        id: impl Into<EntityId>,
        name: impl Into<String>,
        office_id: Option<EntityId>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            office_id,
            role,
            level: None,
            work_mode: WorkMode::Operaciones,
            status: Status::Presente,
            absence_reason: None,
            absence_end_date: None,
        }
    }

    /// Level used for ordering: a missing level counts as Nivel Básico.
    pub fn effective_level(&self) -> Level {
        self.level.clone().unwrap_or_default()
    }

    pub fn is_administrative(&self) -> bool {
        self.work_mode == WorkMode::Administrativo
    }

    pub fn has_prolonged_absence(&self) -> bool {
        self.absence_reason.is_some_and(|r| r.is_prolonged())
    }

    pub fn has_daily_absence(&self) -> bool {
        self.absence_reason == Some(AbsenceReason::Inasistencia)
    }
}

/// Create instruction for a new roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub office_id: Option<EntityId>,
    pub role: Role,
    pub level: Level,
}

// ── Daily summary ──────────────────────────────────────────────

/// One office as it looked when the day was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeSnapshot {
    pub office_name: String,
    pub real_staffing: StaffingMap,
    pub theoretical_staffing: StaffingMap,
    #[serde(default)]
    pub daily_absence_note: String,
    #[serde(default)]
    pub prolonged_absence_note: String,
}

/// Office id → snapshot.
pub type DaySnapshot = BTreeMap<EntityId, OfficeSnapshot>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub id: EntityId,
    pub date: NaiveDate,
    pub summary: DaySnapshot,
}
