use serde_json::Value;

/// A tool argument as the agent sends it: usually plain text, sometimes an
/// object such as `{"title": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolArgument {
    Text(String),
    Structured(Value),
}

impl ToolArgument {
    pub fn normalize(self) -> String {
        match self {
            ToolArgument::Text(text) => text,
            ToolArgument::Structured(value) => normalize_value(value),
        }
    }
}

impl From<&str> for ToolArgument {
    fn from(value: &str) -> Self {
        ToolArgument::Text(value.to_string())
    }
}

impl From<String> for ToolArgument {
    fn from(value: String) -> Self {
        ToolArgument::Text(value)
    }
}

impl From<Value> for ToolArgument {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => ToolArgument::Text(text),
            other => ToolArgument::Structured(other),
        }
    }
}

fn normalize_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        Value::Object(map) => {
            let title = match map.get("title") {
                Some(Value::String(title)) if !title.is_empty() => Some(title.clone()),
                Some(title) if is_truthy(title) => Some(title.to_string()),
                _ => None,
            };
            title.unwrap_or_else(|| Value::Object(map).to_string())
        }
        other => other.to_string(),
    }
}

// An empty title falls back to the whole object.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Bool(true) => true,
    }
}
