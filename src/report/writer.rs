//! CSV sinks for the summary tables and the raw events export.

use anyhow::{Context, Result};
use std::{fs::File, io::Write, path::Path};

use crate::db::EventTable;
use crate::metrics::{IntentPivot, LabelCount};

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("failed to create CSV file {}", path.display()))
}

/// `intent_name,count` rows, most frequent first.
pub fn write_intent_distribution<W: Write>(out: W, frequency: &[LabelCount]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["intent_name", "count"])?;
    for entry in frequency {
        let count = entry.count.to_string();
        writer.write_record([entry.label.as_str(), count.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// `sender_id,<intent>...` header followed by one count row per sender.
pub fn write_user_intent_pivot<W: Write>(out: W, pivot: &IntentPivot) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["sender_id".to_string()];
    header.extend(pivot.intents.iter().cloned());
    writer.write_record(&header)?;

    for row in &pivot.rows {
        let mut record = Vec::with_capacity(row.counts.len() + 1);
        record.push(row.sender_id.clone());
        record.extend(row.counts.iter().map(|c| c.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Full table dump; NULL cells are written as empty fields.
pub fn write_events_table<W: Write>(out: W, table: &EventTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_intent_distribution(path: &Path, frequency: &[LabelCount]) -> Result<()> {
    let file = create(path)?;
    write_intent_distribution(file, frequency)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn save_user_intent_pivot(path: &Path, pivot: &IntentPivot) -> Result<()> {
    let file = create(path)?;
    write_user_intent_pivot(file, pivot)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn save_events_table(path: &Path, table: &EventTable) -> Result<()> {
    let file = create(path)?;
    write_events_table(file, table).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::PivotRow;

    #[test]
    fn distribution_csv_layout() {
        let mut buf = Vec::new();
        let freq = vec![
            LabelCount {
                label: "greet".into(),
                count: 3,
            },
            LabelCount {
                label: "goodbye".into(),
                count: 1,
            },
        ];
        write_intent_distribution(&mut buf, &freq).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "intent_name,count\ngreet,3\ngoodbye,1\n"
        );
    }

    #[test]
    fn pivot_csv_layout() {
        let mut buf = Vec::new();
        let pivot = IntentPivot {
            intents: vec!["goodbye".into(), "greet".into()],
            rows: vec![
                PivotRow {
                    sender_id: "u1".into(),
                    counts: vec![0, 2],
                },
                PivotRow {
                    sender_id: "u2".into(),
                    counts: vec![1, 0],
                },
            ],
        };
        write_user_intent_pivot(&mut buf, &pivot).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "sender_id,goodbye,greet\nu1,0,2\nu2,1,0\n"
        );
    }

    #[test]
    fn events_export_quotes_json_and_blanks_nulls() {
        let mut buf = Vec::new();
        let table = EventTable {
            columns: vec!["sender_id".into(), "intent_name".into(), "data".into()],
            rows: vec![vec![
                Some("u1".into()),
                None,
                Some(r#"{"event":"user","text":"hi, there"}"#.into()),
            ]],
        };
        write_events_table(&mut buf, &table).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "sender_id,intent_name,data\nu1,,\"{\"\"event\"\":\"\"user\"\",\"\"text\"\":\"\"hi, there\"\"}\"\n"
        );
    }
}
