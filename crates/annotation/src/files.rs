use std::path::Path;

use chrono::NaiveDateTime;
use datasets::{DatasetRecord, RECORD_FIELDS};

use crate::{AnnotationError, Result};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const CSV_MIME: &str = "text/csv";

/// `{dataset}_annotations_{YYYYMMDD_HHMMSS}.{ext}`, with the dataset name
/// reduced to ASCII letters, digits, `-` and `_`.
pub fn annotation_file_name(dataset_name: &str, at: NaiveDateTime, ext: &str) -> String {
    format!(
        "{}_annotations_{}.{ext}",
        file_stem(dataset_name),
        at.format(TIMESTAMP_FORMAT)
    )
}

fn file_stem(dataset_name: &str) -> String {
    dataset_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Record-oriented JSON array, 2-space indented.
pub fn render_json(rows: &[DatasetRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(rows).map_err(|e| AnnotationError::Encode(e.to_string()))
}

/// Header row plus one line per record; no index column.
pub fn render_csv(rows: &[DatasetRecord]) -> Result<Vec<u8>> {
    let encode = |e: csv::Error| AnnotationError::Encode(e.to_string());

    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    w.write_record(RECORD_FIELDS).map_err(encode)?;
    for r in rows {
        w.serialize(r).map_err(encode)?;
    }
    w.into_inner()
        .map_err(|e| AnnotationError::Encode(e.to_string()))
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| AnnotationError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
