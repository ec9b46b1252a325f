use anyhow::{Context, Result};

use super::helpers::{value_to_f64, value_to_text};
use super::Database;
use crate::models::EventRow;

/// Every column of the `events` table, in storage order, as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Database {
    /// Dump `SELECT * FROM events` without interpreting any column.
    pub fn read_events_table(&self) -> Result<EventTable> {
        self.ensure_table("events")?;

        self.execute(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM events ORDER BY rowid")
                .context("failed to prepare events query")?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let width = columns.len();

            let mut rows = stmt.query([])?;
            let mut table_rows = Vec::new();
            while let Some(row) = rows.next()? {
                let mut cells = Vec::with_capacity(width);
                for idx in 0..width {
                    cells.push(value_to_text(row.get_ref(idx)?));
                }
                table_rows.push(cells);
            }

            Ok(EventTable {
                columns,
                rows: table_rows,
            })
        })
    }

    /// Load the columns the analytics pipeline reads, straight from the store.
    pub fn load_event_rows(&self) -> Result<Vec<EventRow>> {
        self.ensure_table("events")?;

        let rows = self.execute(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT sender_id, timestamp, type_name, intent_name, action_name, data
                     FROM events
                     ORDER BY rowid",
                )
                .context("failed to prepare events query")?;

            let mut rows = stmt.query([])?;
            let mut events = Vec::new();
            while let Some(row) = rows.next()? {
                events.push(EventRow {
                    sender_id: value_to_text(row.get_ref("sender_id")?).unwrap_or_default(),
                    timestamp: value_to_f64(row.get_ref("timestamp")?),
                    type_name: value_to_text(row.get_ref("type_name")?),
                    intent_name: value_to_text(row.get_ref("intent_name")?)
                        .filter(|s| !s.is_empty()),
                    action_name: value_to_text(row.get_ref("action_name")?)
                        .filter(|s| !s.is_empty()),
                    data: value_to_text(row.get_ref("data")?).filter(|s| !s.is_empty()),
                });
            }

            Ok(events)
        })?;

        log::info!("Loaded {} event rows from {}", rows.len(), self.path().display());
        Ok(rows)
    }
}
