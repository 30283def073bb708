use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Text used for any sub-field the remote example does not carry.
pub const PLACEHOLDER: &str = "None";

pub const INPUT_CONVERSATION: &str = "input_conversation";
pub const INPUT_QUERY: &str = "input_query";
pub const INPUT_INTENT: &str = "input_intent";
pub const INPUT_LANGUAGE: &str = "input_language";
pub const INPUT_PERSONA: &str = "input_persona";
pub const OUTPUT_RESPONSE: &str = "output_response";
pub const OUTPUT_EXTRACTION: &str = "output_extraction";

/// One example as returned by the dataset service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Example {
    pub id: Uuid,
    #[serde(default)]
    pub inputs: Option<JsonMap>,
    #[serde(default)]
    pub outputs: Option<JsonMap>,
    #[serde(default)]
    pub metadata: Option<JsonMap>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Extraction,
    Chat,
}

impl TaskKind {
    /// Selection order offered to the annotator; the first entry is the default.
    pub const ALL: [TaskKind; 2] = [TaskKind::Extraction, TaskKind::Chat];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Extraction => "extraction",
            TaskKind::Chat => "chat",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extraction" => Ok(TaskKind::Extraction),
            "chat" => Ok(TaskKind::Chat),
            other => Err(format!("unknown task type: {other}")),
        }
    }
}

/// Serialized names of [`DatasetRecord`] fields, in declaration order.
pub const RECORD_FIELDS: [&str; 14] = [
    "id",
    "input",
    "output",
    "metadata",
    "conversation",
    "query",
    "intent",
    "language",
    "persona",
    "response",
    "extraction",
    "task",
    "human_annotation",
    "remarks",
];

/// Flattened, annotatable view of one [`Example`].
///
/// Field order is the column order of saved and exported files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: String,
    pub input: String,
    pub output: String,
    pub metadata: String,
    pub conversation: String,
    pub query: String,
    pub intent: String,
    pub language: String,
    pub persona: String,
    pub response: String,
    pub extraction: String,
    pub task: TaskKind,
    pub human_annotation: String,
    pub remarks: String,
}

impl DatasetRecord {
    /// Empty row for the given task, as added by the annotator.
    pub fn blank(task: TaskKind) -> Self {
        Self {
            id: String::new(),
            input: String::new(),
            output: String::new(),
            metadata: String::new(),
            conversation: String::new(),
            query: String::new(),
            intent: String::new(),
            language: String::new(),
            persona: String::new(),
            response: String::new(),
            extraction: String::new(),
            task,
            human_annotation: String::new(),
            remarks: String::new(),
        }
    }
}
