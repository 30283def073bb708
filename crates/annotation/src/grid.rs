use datasets::{DatasetRecord, TaskKind};
use serde::Serialize;

use crate::{AnnotationError, Result};

pub const HUMAN_ANNOTATION: &str = "human_annotation";
pub const REMARKS: &str = "remarks";

/// The only columns an annotator may change.
pub const EDITABLE_COLUMNS: [&str; 2] = [HUMAN_ANNOTATION, REMARKS];

const EXTRACTION_ORDER: &[&str] = &[
    "id",
    "persona",
    "language",
    "intent",
    "conversation",
    "query",
    "response",
    "extraction",
    HUMAN_ANNOTATION,
    REMARKS,
];

const CHAT_ORDER: &[&str] = &[
    "id",
    "language",
    "intent",
    "conversation",
    "query",
    "response",
    HUMAN_ANNOTATION,
    REMARKS,
];

pub fn column_order(task: TaskKind) -> &'static [&'static str] {
    match task {
        TaskKind::Extraction => EXTRACTION_ORDER,
        TaskKind::Chat => CHAT_ORDER,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnConfig {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub help: Option<&'static str>,
    pub required: bool,
    pub read_only: bool,
}

impl ColumnConfig {
    pub fn for_column(name: &'static str) -> Self {
        let mut cfg = ColumnConfig {
            name,
            label: name,
            kind: ColumnKind::Text,
            help: None,
            required: false,
            read_only: !EDITABLE_COLUMNS.contains(&name),
        };

        match name {
            "input" => {
                cfg.label = "inputs";
                cfg.kind = ColumnKind::Json;
            }
            "output" => {
                cfg.label = "outputs";
                cfg.kind = ColumnKind::Json;
            }
            HUMAN_ANNOTATION => {
                cfg.label = "Your Annotation";
                cfg.help = Some("Enter your human annotation here");
                cfg.required = true;
            }
            REMARKS => {
                cfg.label = "Remarks";
                cfg.help = Some("Enter your remarks here");
            }
            _ => {}
        }
        cfg
    }
}

/// Editable rows of one task partition.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    task: TaskKind,
    rows: Vec<DatasetRecord>,
}

impl Grid {
    pub fn new(task: TaskKind, rows: Vec<DatasetRecord>) -> Self {
        Self { task, rows }
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn rows(&self) -> &[DatasetRecord] {
        &self.rows
    }

    pub fn columns(&self) -> Vec<ColumnConfig> {
        column_order(self.task)
            .iter()
            .copied()
            .map(ColumnConfig::for_column)
            .collect()
    }

    pub fn edit_cell(&mut self, row: usize, column: &str, value: String) -> Result<()> {
        let len = self.rows.len();
        let rec = self
            .rows
            .get_mut(row)
            .ok_or_else(|| AnnotationError::value(format!("row {row} out of range ({len} rows)")))?;

        match column {
            HUMAN_ANNOTATION => rec.human_annotation = value,
            REMARKS => rec.remarks = value,
            other if datasets::RECORD_FIELDS.contains(&other) => {
                return Err(AnnotationError::value(format!("column '{other}' is read-only")));
            }
            other => return Err(AnnotationError::value(format!("unknown column '{other}'"))),
        }
        Ok(())
    }

    /// Append a blank row; returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(DatasetRecord::blank(self.task));
        self.rows.len() - 1
    }

    pub fn delete_row(&mut self, row: usize) -> Result<DatasetRecord> {
        if row >= self.rows.len() {
            return Err(AnnotationError::value(format!(
                "row {row} out of range ({} rows)",
                self.rows.len()
            )));
        }
        Ok(self.rows.remove(row))
    }
}

/// Records split by task classification.
#[derive(Clone, Debug)]
pub struct Partitions {
    extraction: Grid,
    chat: Grid,
}

impl Partitions {
    pub fn split(records: Vec<DatasetRecord>) -> Self {
        let (chat, extraction): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| r.task == TaskKind::Chat);
        Self {
            extraction: Grid::new(TaskKind::Extraction, extraction),
            chat: Grid::new(TaskKind::Chat, chat),
        }
    }

    pub fn get(&self, task: TaskKind) -> &Grid {
        match task {
            TaskKind::Extraction => &self.extraction,
            TaskKind::Chat => &self.chat,
        }
    }

    pub fn get_mut(&mut self, task: TaskKind) -> &mut Grid {
        match task {
            TaskKind::Extraction => &mut self.extraction,
            TaskKind::Chat => &mut self.chat,
        }
    }
}
