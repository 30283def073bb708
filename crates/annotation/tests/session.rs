//! Session behaviour end to end, against an in-memory dataset source.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use annotation::{Action, BannerKind, Session, View};
use async_trait::async_trait;
use chrono::NaiveDate;
use datasets::{DatasetError, DatasetRecord, DatasetSource, Example, TaskKind};
use serde_json::json;
use uuid::Uuid;

struct StaticSource {
    examples: Vec<Example>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn list_examples(&self, _name: &str) -> datasets::Result<Vec<Example>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.examples.clone())
    }
}

struct FailingSource;

#[async_trait]
impl DatasetSource for FailingSource {
    async fn list_examples(&self, _name: &str) -> datasets::Result<Vec<Example>> {
        Err(DatasetError::Network { message: "connection reset by peer".into() })
    }
}

fn example(outputs: serde_json::Value) -> Example {
    Example {
        id: Uuid::new_v4(),
        inputs: json!({"input_query": "where is my order?"}).as_object().cloned(),
        outputs: outputs.as_object().cloned(),
        metadata: None,
    }
}

fn demo_examples() -> Vec<Example> {
    vec![
        example(json!({"output_response": "hi"})),
        example(json!({"output_extraction": {"order": 1}})),
        example(json!({"output_extraction": {"order": 2}})),
    ]
}

fn session(dir: &std::path::Path) -> (Session, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = StaticSource { examples: demo_examples(), calls: calls.clone() };
    let at = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let s = Session::new(Box::new(source), dir).with_clock(Box::new(move || at));
    (s, calls)
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn rows(view: &View) -> &[DatasetRecord] {
    &view.grid.as_ref().expect("grid").rows
}

#[tokio::test]
async fn loading_partitions_by_task() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = session(dir.path());

    let view = s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;
    assert!(view.banner.is_none());
    assert_eq!(view.active_task, TaskKind::Extraction);
    assert_eq!(rows(&view).len(), 2);
    assert!(rows(&view).iter().all(|r| r.task == TaskKind::Extraction));

    let view = s.dispatch(Action::SelectTask { task: TaskKind::Chat }).await;
    let chat = rows(&view);
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].response, "hi");
    assert_eq!(chat[0].extraction, "None");
    assert_eq!(view.grid.as_ref().unwrap().columns.len(), 8);
}

#[tokio::test]
async fn empty_name_renders_nothing_and_does_not_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, calls) = session(dir.path());

    let view = s.dispatch(Action::SetDatasetName { name: String::new() }).await;
    assert!(view.grid.is_none());
    assert!(view.banner.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_loads_hit_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, calls) = session(dir.path());

    s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;
    s.dispatch(Action::SetDatasetName { name: "other".into() }).await;
    s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetch_failure_shows_error_and_no_grid() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = Session::new(Box::new(FailingSource), dir.path());

    let view = s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;
    let banner = view.banner.expect("error banner");
    assert_eq!(banner.kind, BannerKind::Error);
    assert!(banner.message.contains("connection reset by peer"));
    assert!(view.grid.is_none());
    assert!(!s.is_loaded());
}

#[tokio::test]
async fn edits_persist_per_task_and_keep_classification() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = session(dir.path());
    s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;

    s.dispatch(Action::EditCell { row: 1, column: "human_annotation".into(), value: "correct".into() })
        .await;
    let view = s
        .dispatch(Action::EditCell { row: 0, column: "task".into(), value: "chat".into() })
        .await;
    assert_eq!(view.banner.unwrap().message, "column 'task' is read-only");

    s.dispatch(Action::SelectTask { task: TaskKind::Chat }).await;
    let view = s.dispatch(Action::SelectTask { task: TaskKind::Extraction }).await;

    assert_eq!(rows(&view)[1].human_annotation, "correct");
    assert!(rows(&view).iter().all(|r| r.task == TaskKind::Extraction));
}

#[tokio::test]
async fn actions_before_load_are_value_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = session(dir.path());

    for action in [Action::Save, Action::Export, Action::AddRow, Action::SelectTask { task: TaskKind::Chat }] {
        let view = s.dispatch(action).await;
        assert_eq!(view.banner.unwrap().message, "no dataset loaded");
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn save_writes_active_grid_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = session(dir.path());
    s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;
    s.dispatch(Action::AddRow).await;

    let view = s.dispatch(Action::Save).await;
    assert_eq!(
        view.banner.unwrap().message,
        "Annotations saved to demo_annotations_20240101_000000.json!"
    );

    let path = dir.path().join("demo_annotations_20240101_000000.json");
    let saved: Vec<DatasetRecord> =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[2].id, "");
}

#[tokio::test]
async fn export_writes_csv_and_offers_download() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = session(dir.path());
    s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;
    s.dispatch(Action::SelectTask { task: TaskKind::Chat }).await;
    s.dispatch(Action::DeleteRow { row: 0 }).await;

    let view = s.dispatch(Action::Export).await;
    let banner = view.banner.unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, "Annotations exported to demo_annotations_20240101_000000.csv!");

    let download = view.download.expect("download offered");
    assert_eq!(download.file_name, "demo_annotations_20240101_000000.csv");
    assert_eq!(download.mime, "text/csv");

    let on_disk = std::fs::read(dir.path().join(&download.file_name)).unwrap();
    assert_eq!(on_disk, download.data);
    // header only: the single chat row was deleted
    assert_eq!(String::from_utf8(on_disk).unwrap().lines().count(), 1);

    assert!(s.download("demo_annotations_20240101_000000.csv").is_some());
    assert!(s.download("other.csv").is_none());
}

#[tokio::test]
async fn task_switch_is_logged_only_on_change() {
    let logs = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = session(dir.path());
    s.dispatch(Action::SetDatasetName { name: "demo".into() }).await;

    s.dispatch(Action::SelectTask { task: TaskKind::Chat }).await;
    s.dispatch(Action::SelectTask { task: TaskKind::Chat }).await;
    assert_eq!(logs.text().matches("Showing task chat").count(), 1);

    s.dispatch(Action::SelectTask { task: TaskKind::Extraction }).await;
    s.dispatch(Action::SelectTask { task: TaskKind::Extraction }).await;
    assert_eq!(logs.text().matches("Showing task extraction").count(), 1);
}

#[tokio::test]
async fn dataset_name_with_path_separators_saves_inside_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = session(dir.path());
    s.dispatch(Action::SetDatasetName { name: "../team/qa".into() }).await;

    let view = s.dispatch(Action::Save).await;
    assert_eq!(
        view.banner.unwrap().message,
        "Annotations saved to ___team_qa_annotations_20240101_000000.json!"
    );
    let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(saved, ["___team_qa_annotations_20240101_000000.json"]);
}
