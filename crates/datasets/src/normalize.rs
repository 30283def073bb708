use serde_json::Value;

use crate::{
    DatasetRecord, Example, JsonMap, TaskKind, INPUT_CONVERSATION, INPUT_INTENT, INPUT_LANGUAGE,
    INPUT_PERSONA, INPUT_QUERY, OUTPUT_EXTRACTION, OUTPUT_RESPONSE, PLACEHOLDER,
};

pub fn normalize(example: &Example) -> DatasetRecord {
    let empty = JsonMap::new();
    let inputs = example.inputs.as_ref().unwrap_or(&empty);
    let outputs = example.outputs.as_ref().unwrap_or(&empty);

    DatasetRecord {
        id: example.id.to_string(),
        input: render_payload(example.inputs.as_ref()),
        output: render_payload(example.outputs.as_ref()),
        metadata: render_payload(example.metadata.as_ref()),
        conversation: render_field(inputs, INPUT_CONVERSATION),
        query: render_field(inputs, INPUT_QUERY),
        intent: render_field(inputs, INPUT_INTENT),
        language: render_field(inputs, INPUT_LANGUAGE),
        persona: render_field(inputs, INPUT_PERSONA),
        response: render_field(outputs, OUTPUT_RESPONSE),
        extraction: render_field(outputs, OUTPUT_EXTRACTION),
        task: classify(outputs),
        human_annotation: String::new(),
        remarks: String::new(),
    }
}

/// `chat` when the example carries a response, `extraction` otherwise.
///
/// Examples with neither a response nor an extraction still land in
/// `extraction`.
pub fn classify(outputs: &JsonMap) -> TaskKind {
    match outputs.get(OUTPUT_RESPONSE) {
        Some(v) if is_truthy(v) => TaskKind::Chat,
        _ => TaskKind::Extraction,
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn render_field(map: &JsonMap, key: &str) -> String {
    match map.get(key) {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_payload(map: Option<&JsonMap>) -> String {
    match map {
        Some(m) => Value::Object(m.clone()).to_string(),
        None => PLACEHOLDER.to_string(),
    }
}
