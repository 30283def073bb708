//! In-memory annotation session driven by discrete [`Action`]s.
//!
//! Every action mutates the session record and yields a fresh [`View`] that a
//! rendering layer can draw. Failures never escape `dispatch`; they come back
//! as an error banner on the view.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use datasets::{DatasetRecord, DatasetSource, RecordCache, TaskKind};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    annotation_file_name, render_csv, render_json, write_file, AnnotationError, ColumnConfig,
    Partitions, Result, CSV_MIME,
};

pub const TITLE: &str = "LangSmith Dataset Annotation Tool";

pub type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetDatasetName { name: String },
    SelectTask { task: TaskKind },
    EditCell { row: usize, column: String, value: String },
    AddRow,
    DeleteRow { row: usize },
    Save,
    Export,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: BannerKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: BannerKind::Error, message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

/// Exported file offered for download.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Download {
    pub label: &'static str,
    pub file_name: String,
    pub mime: &'static str,
    #[serde(skip)]
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GridView {
    pub task: TaskKind,
    pub columns: Vec<ColumnConfig>,
    pub rows: Vec<DatasetRecord>,
}

#[derive(Clone, Debug, Serialize)]
pub struct View {
    pub title: &'static str,
    pub dataset_name: String,
    pub task_options: [TaskKind; 2],
    pub active_task: TaskKind,
    pub grid: Option<GridView>,
    pub banner: Option<Banner>,
    pub download: Option<Download>,
}

#[derive(Default)]
struct Outcome {
    banner: Option<Banner>,
    download: Option<Download>,
}

pub struct Session {
    source: Box<dyn DatasetSource>,
    cache: RecordCache,
    output_dir: PathBuf,
    clock: Clock,
    dataset_name: String,
    active_task: TaskKind,
    partitions: Option<Partitions>,
    last_download: Option<Download>,
}

impl Session {
    pub fn new(source: Box<dyn DatasetSource>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache: RecordCache::new(),
            output_dir: output_dir.into(),
            clock: Box::new(|| Local::now().naive_local()),
            dataset_name: String::new(),
            active_task: TaskKind::default(),
            partitions: None,
            last_download: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.partitions.is_some()
    }

    /// Most recent export, if its file name matches.
    pub fn download(&self, file_name: &str) -> Option<&Download> {
        self.last_download
            .as_ref()
            .filter(|d| d.file_name == file_name)
    }

    pub async fn dispatch(&mut self, action: Action) -> View {
        match self.apply(action).await {
            Ok(out) => self.render(out.banner, out.download),
            Err(e) => {
                warn!(error = %e, "annotation action failed");
                self.render(Some(Banner::error(e.to_string())), None)
            }
        }
    }

    pub fn view(&self) -> View {
        self.render(None, None)
    }

    async fn apply(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::SetDatasetName { name } => self.set_dataset_name(name).await,
            Action::SelectTask { task } => {
                self.loaded()?;
                if task != self.active_task {
                    info!("Showing task {task}");
                }
                self.active_task = task;
                Ok(Outcome::default())
            }
            Action::EditCell { row, column, value } => {
                let task = self.active_task;
                self.loaded_mut()?.get_mut(task).edit_cell(row, &column, value)?;
                Ok(Outcome::default())
            }
            Action::AddRow => {
                let task = self.active_task;
                self.loaded_mut()?.get_mut(task).add_row();
                Ok(Outcome::default())
            }
            Action::DeleteRow { row } => {
                let task = self.active_task;
                self.loaded_mut()?.get_mut(task).delete_row(row)?;
                Ok(Outcome::default())
            }
            Action::Save => self.save(),
            Action::Export => self.export(),
        }
    }

    async fn set_dataset_name(&mut self, name: String) -> Result<Outcome> {
        if name == self.dataset_name && self.partitions.is_some() {
            return Ok(Outcome::default());
        }

        self.dataset_name = name;
        self.partitions = None;
        self.last_download = None;

        if self.dataset_name.is_empty() {
            return Ok(Outcome::default());
        }

        let records = self
            .cache
            .fetch(self.source.as_ref(), &self.dataset_name)
            .await?;
        self.partitions = Some(Partitions::split(records));
        Ok(Outcome::default())
    }

    fn save(&self) -> Result<Outcome> {
        let rows = self.loaded()?.get(self.active_task).rows();
        let file_name = annotation_file_name(&self.dataset_name, (self.clock)(), "json");
        let path = self.output_dir.join(&file_name);

        write_file(&path, &render_json(rows)?)?;
        info!(path = %path.display(), rows = rows.len(), "annotations saved");

        Ok(Outcome {
            banner: Some(Banner::success(format!("Annotations saved to {file_name}!"))),
            download: None,
        })
    }

    fn export(&mut self) -> Result<Outcome> {
        let rows = self.loaded()?.get(self.active_task).rows();
        let file_name = annotation_file_name(&self.dataset_name, (self.clock)(), "csv");
        let path = self.output_dir.join(&file_name);

        let data = render_csv(rows)?;
        write_file(&path, &data)?;
        info!(path = %path.display(), rows = rows.len(), "annotations exported");

        let download = Download {
            label: "Download CSV",
            file_name: file_name.clone(),
            mime: CSV_MIME,
            data,
        };
        self.last_download = Some(download.clone());

        Ok(Outcome {
            banner: Some(Banner::success(format!("Annotations exported to {file_name}!"))),
            download: Some(download),
        })
    }

    fn loaded(&self) -> Result<&Partitions> {
        self.partitions
            .as_ref()
            .ok_or_else(|| AnnotationError::value("no dataset loaded"))
    }

    fn loaded_mut(&mut self) -> Result<&mut Partitions> {
        self.partitions
            .as_mut()
            .ok_or_else(|| AnnotationError::value("no dataset loaded"))
    }

    fn render(&self, banner: Option<Banner>, download: Option<Download>) -> View {
        let grid = self.partitions.as_ref().map(|p| {
            let g = p.get(self.active_task);
            GridView {
                task: g.task(),
                columns: g.columns(),
                rows: g.rows().to_vec(),
            }
        });

        View {
            title: TITLE,
            dataset_name: self.dataset_name.clone(),
            task_options: TaskKind::ALL,
            active_task: self.active_task,
            grid,
            banner,
            download,
        }
    }
}
