//! Office queries.

use super::{new_id, DeskStore};
use crate::{
    error::{DeskError, DeskResult},
    model::Office,
    types::StaffingMap,
    update::OfficeUpdate,
};
use rusqlite::{params, OptionalExtension};

struct OfficeRow {
    office_id: String,
    name: String,
    theoretical_staffing: String,
    real_staffing: String,
}

impl OfficeRow {
    fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            office_id: r.get(0)?,
            name: r.get(1)?,
            theoretical_staffing: r.get(2)?,
            real_staffing: r.get(3)?,
        })
    }

    fn into_office(self) -> DeskResult<Office> {
        let theoretical_staffing: StaffingMap = serde_json::from_str(&self.theoretical_staffing)?;
        let real_staffing: StaffingMap = serde_json::from_str(&self.real_staffing)?;
        Ok(Office {
            id: self.office_id,
            name: self.name,
            theoretical_staffing,
            real_staffing,
        })
    }
}

impl DeskStore {
    pub fn select_offices(&self) -> DeskResult<Vec<Office>> {
        let mut stmt = self.conn.prepare(
            "SELECT office_id, name, theoretical_staffing, real_staffing
             FROM office ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map([], OfficeRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(OfficeRow::into_office).collect()
    }

    pub fn select_office(&self, office_id: &str) -> DeskResult<Option<Office>> {
        let row = self
            .conn
            .query_row(
                "SELECT office_id, name, theoretical_staffing, real_staffing
                 FROM office WHERE office_id = ?1",
                params![office_id],
                OfficeRow::from_row,
            )
            .optional()?;
        row.map(OfficeRow::into_office).transpose()
    }

    pub fn insert_office(&self, name: &str) -> DeskResult<Office> {
        let office = Office::new(new_id(), name.trim());
        self.conn.execute(
            "INSERT INTO office (office_id, name, theoretical_staffing, real_staffing)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                office.id,
                office.name,
                serde_json::to_string(&office.theoretical_staffing)?,
                serde_json::to_string(&office.real_staffing)?,
            ],
        )?;
        Ok(office)
    }

    pub fn write_office_update(&self, office_id: &str, update: &OfficeUpdate) -> DeskResult<()> {
        let mut office = self
            .select_office(office_id)?
            .ok_or_else(|| DeskError::WriteRejected {
                entity: "office",
                id: office_id.to_string(),
            })?;
        update.apply_to(&mut office);
        self.conn.execute(
            "UPDATE office SET theoretical_staffing = ?1, real_staffing = ?2
             WHERE office_id = ?3",
            params![
                serde_json::to_string(&office.theoretical_staffing)?,
                serde_json::to_string(&office.real_staffing)?,
                office_id,
            ],
        )?;
        Ok(())
    }
}
