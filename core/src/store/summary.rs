//! Daily summary queries. Summaries are written once and only ever deleted.

use super::{new_id, parse_date, DeskStore};
use crate::{
    error::{DeskError, DeskResult},
    model::{DailySummary, DaySnapshot},
    types::DATE_FORMAT,
};
use chrono::NaiveDate;
use rusqlite::params;

impl DeskStore {
    pub fn select_daily_summaries(&self) -> DeskResult<Vec<DailySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT summary_id, date, summary FROM daily_summary
             ORDER BY date DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, date, summary)| {
                Ok(DailySummary {
                    id,
                    date: parse_date("daily_summary.date", &date)?,
                    summary: serde_json::from_str(&summary)?,
                })
            })
            .collect()
    }

    pub fn insert_daily_summary(&self, date: NaiveDate, snapshot: &DaySnapshot) -> DeskResult<DailySummary> {
        let summary = DailySummary {
            id: new_id(),
            date,
            summary: snapshot.clone(),
        };
        self.conn.execute(
            "INSERT INTO daily_summary (summary_id, date, summary) VALUES (?1, ?2, ?3)",
            params![
                summary.id,
                date.format(DATE_FORMAT).to_string(),
                serde_json::to_string(&summary.summary)?,
            ],
        )?;
        Ok(summary)
    }

    pub fn remove_daily_summary(&self, summary_id: &str) -> DeskResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM daily_summary WHERE summary_id = ?1",
            params![summary_id],
        )?;
        if deleted == 0 {
            return Err(DeskError::WriteRejected {
                entity: "daily_summary",
                id: summary_id.to_string(),
            });
        }
        Ok(())
    }
}
