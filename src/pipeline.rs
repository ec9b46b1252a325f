//! Extractor → labeler wiring shared by every report.

use anyhow::Result;
use std::path::Path;

use crate::extraction::{extract_user_turns, load_event_rows};
use crate::labeling::label_turns;
use crate::models::{EventRow, LabeledTurn};

/// One run's worth of input: the raw rows plus the labeled user turns drawn from them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<EventRow>,
    turns: Vec<LabeledTurn>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<EventRow>) -> Self {
        let turns = label_turns(extract_user_turns(&rows));
        Self { rows, turns }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_rows(load_event_rows(path)?))
    }

    pub fn rows(&self) -> &[EventRow] {
        &self.rows
    }

    pub fn turns(&self) -> &[LabeledTurn] {
        &self.turns
    }
}
