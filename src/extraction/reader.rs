//! Decodes the exported events CSV into [`EventRow`]s.
//!
//! Columns are looked up by header name so column order and extra columns
//! (`id`, anything the store adds later) do not matter. `sender_id` and `data`
//! must be present; the rest are optional.

use anyhow::{bail, Context, Result};
use std::{fs::File, io::Read, path::Path};

use crate::models::EventRow;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

struct ColumnIndex {
    sender_id: usize,
    data: usize,
    timestamp: Option<usize>,
    type_name: Option<usize>,
    intent_name: Option<usize>,
    action_name: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let Some(sender_id) = find("sender_id") else {
            bail!("missing required column: sender_id");
        };
        let Some(data) = find("data") else {
            bail!("missing required column: data");
        };

        Ok(Self {
            sender_id,
            data,
            timestamp: find("timestamp"),
            type_name: find("type_name"),
            intent_name: find("intent_name"),
            action_name: find("action_name"),
        })
    }

    fn parse_row(&self, row: &csv::StringRecord) -> EventRow {
        let get_field = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        EventRow {
            sender_id: get_field(Some(self.sender_id)).unwrap_or_default(),
            timestamp: get_field(self.timestamp).and_then(|s| s.parse::<f64>().ok()),
            type_name: get_field(self.type_name),
            intent_name: get_field(self.intent_name),
            action_name: get_field(self.action_name),
            data: get_field(Some(self.data)),
        }
    }
}

/// Read every row from a CSV source. Framing errors abort the load.
pub fn read_event_rows<R: Read>(source: R) -> Result<Vec<EventRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        let row = columns.parse_row(&record);
        if row.sender_id.is_empty() {
            log_warn!("Row {} has no sender_id", idx + 1);
        }
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_event_rows(path: &Path) -> Result<Vec<EventRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let rows = read_event_rows(file)
        .with_context(|| format!("Failed to load events from {}", path.display()))?;

    log_info!("Loaded {} event rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"id,sender_id,type_name,timestamp,intent_name,action_name,data
1,alice,user,1700000000.25,greet,,"{""event"": ""user"", ""text"": ""hello""}"
2,alice,action,1700000001.0,,action_listen,"{""event"": ""action"", ""name"": ""action_listen""}"
3,bob,user,not-a-number,,,
"#;

    #[test]
    fn parses_columns_by_header_name() {
        let rows = read_event_rows(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].sender_id, "alice");
        assert_eq!(rows[0].timestamp, Some(1_700_000_000.25));
        assert_eq!(rows[0].type_name.as_deref(), Some("user"));
        assert_eq!(rows[0].intent_name.as_deref(), Some("greet"));
        assert_eq!(rows[0].action_name, None);
        assert_eq!(
            rows[0].data.as_deref(),
            Some(r#"{"event": "user", "text": "hello"}"#)
        );

        assert_eq!(rows[1].action_name.as_deref(), Some("action_listen"));
        assert_eq!(rows[1].intent_name, None);
    }

    #[test]
    fn empty_cells_become_none() {
        let rows = read_event_rows(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows[2].timestamp, None);
        assert_eq!(rows[2].data, None);
        assert_eq!(rows[2].intent_name, None);
    }

    #[test]
    fn optional_columns_may_be_missing() {
        let csv = "data,sender_id\n\"{}\",carol\n";
        let rows = read_event_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sender_id, "carol");
        assert_eq!(rows[0].timestamp, None);
        assert_eq!(rows[0].action_name, None);
    }

    #[test]
    fn missing_data_column_is_rejected() {
        let csv = "sender_id,timestamp\nalice,1.0\n";
        let err = read_event_rows(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("data"));
    }
}
