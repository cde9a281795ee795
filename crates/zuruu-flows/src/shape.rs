use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ts_rs::TS;

/// Untyped form input as it arrives from the UI: field name to JSON value,
/// usually all strings.
pub type RawInput = serde_json::Map<String, Value>;

/// Bounds for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// When set, `min` itself is out of range.
    #[serde(default)]
    pub exclusive_min: bool,
}

impl NumericRange {
    pub const ANY: NumericRange = NumericRange {
        min: None,
        max: None,
        exclusive_min: false,
    };

    /// Strictly greater than zero.
    pub const fn positive() -> Self {
        Self {
            min: Some(0.0),
            max: None,
            exclusive_min: true,
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            exclusive_min: false,
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            exclusive_min: false,
        }
    }

    /// Check `value`, returning the user-facing message when out of range.
    pub fn check(&self, value: f64) -> Result<(), String> {
        let below = match self.min {
            Some(min) if self.exclusive_min => value <= min,
            Some(min) => value < min,
            None => false,
        };
        let above = self.max.is_some_and(|max| value > max);

        if !below && !above {
            return Ok(());
        }

        Err(match (self.min, self.max) {
            (Some(min), None) if self.exclusive_min && min == 0.0 => "Must be positive".to_string(),
            (Some(min), None) if self.exclusive_min => format!("Must be greater than {min}"),
            (Some(min), None) => format!("Must be at least {min}"),
            (None, Some(max)) => format!("Must be at most {max}"),
            (Some(min), Some(max)) if self.exclusive_min => {
                format!("Must be greater than {min} and at most {max}")
            }
            (Some(min), Some(max)) => format!("Must be between {min} and {max}"),
            (None, None) => "Out of range".to_string(),
        })
    }
}

/// The declared type of an input field, with its constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum FieldKind {
    Text { max_len: Option<usize> },
    Number { range: NumericRange },
    Integer { range: NumericRange },
    Boolean,
    Enum { options: Vec<String> },
    /// A list of text entries. A single string is split on commas and
    /// newlines.
    List { min_items: usize },
    Object,
    /// Any non-empty JSON value, passed through untouched.
    Any,
}

/// One field of a flow's input shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text { max_len: None })
    }

    pub fn long_text(name: &str, label: &str, max_len: usize) -> Self {
        Self::new(name, label, FieldKind::Text { max_len: Some(max_len) })
    }

    pub fn number(name: &str, label: &str, range: NumericRange) -> Self {
        Self::new(name, label, FieldKind::Number { range })
    }

    pub fn integer(name: &str, label: &str, range: NumericRange) -> Self {
        Self::new(name, label, FieldKind::Integer { range })
    }

    pub fn boolean(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub fn choice(name: &str, label: &str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        Self::new(name, label, FieldKind::Enum { options })
    }

    pub fn list(name: &str, label: &str, min_items: usize) -> Self {
        Self::new(name, label, FieldKind::List { min_items })
    }

    pub fn object(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Object)
    }

    pub fn any(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Any)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Coerce one raw value. `Ok(None)` means the field was left empty.
    fn coerce(&self, raw: Option<&Value>) -> Result<Option<TypedValue>, String> {
        let Some(raw) = raw.filter(|v| !is_blank(v)) else {
            return Ok(None);
        };

        let typed = match &self.kind {
            FieldKind::Text { max_len } => {
                let text = match raw {
                    Value::String(s) => s.trim().to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return Err("Must be text".to_string()),
                };
                if let Some(max) = max_len
                    && text.chars().count() > *max
                {
                    return Err(format!("Must be at most {max} characters"));
                }
                TypedValue::Text(text)
            }
            FieldKind::Number { range } => {
                let n = match raw {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .filter(|n| n.is_finite())
                .ok_or_else(|| "Must be a number".to_string())?;
                range.check(n)?;
                TypedValue::Number(n)
            }
            FieldKind::Integer { range } => {
                let n = match raw {
                    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
                    Value::String(s) => {
                        let s = s.trim();
                        s.parse::<i64>()
                            .ok()
                            .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
                    }
                    _ => None,
                }
                .ok_or_else(|| "Must be a whole number".to_string())?;
                range.check(n as f64)?;
                TypedValue::Integer(n)
            }
            FieldKind::Boolean => {
                let b = match raw {
                    Value::Bool(b) => Some(*b),
                    Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                        "true" | "yes" | "on" | "1" => Some(true),
                        "false" | "no" | "off" | "0" => Some(false),
                        _ => None,
                    },
                    _ => None,
                }
                .ok_or_else(|| "Must be true or false".to_string())?;
                TypedValue::Bool(b)
            }
            FieldKind::Enum { options } => {
                let candidate = raw.as_str().map(str::trim).unwrap_or_default();
                let option = options
                    .iter()
                    .find(|o| o.eq_ignore_ascii_case(candidate))
                    .ok_or_else(|| format!("Must be one of: {}", options.join(", ")))?;
                TypedValue::Text(option.clone())
            }
            FieldKind::List { min_items } => {
                let items: Vec<String> = match raw {
                    Value::Array(items) => items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => Ok(s.trim().to_string()),
                            Value::Number(n) => Ok(n.to_string()),
                            _ => Err("Entries must be text".to_string()),
                        })
                        .collect::<Result<_, _>>()?,
                    Value::String(s) => s.split([',', '\n']).map(|p| p.trim().to_string()).collect(),
                    _ => return Err("Must be a list".to_string()),
                };
                let items: Vec<String> = items.into_iter().filter(|i| !i.is_empty()).collect();
                if items.len() < *min_items {
                    return Err(format!("Provide at least {min_items} entries"));
                }
                TypedValue::List(items)
            }
            FieldKind::Object => match raw {
                Value::Object(map) => TypedValue::Object(map.clone()),
                Value::String(s) => match serde_json::from_str::<Value>(s) {
                    Ok(Value::Object(map)) => TypedValue::Object(map),
                    _ => return Err("Must be an object".to_string()),
                },
                _ => return Err("Must be an object".to_string()),
            },
            FieldKind::Any => TypedValue::Json(raw.clone()),
        };

        Ok(Some(typed))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// The declared input shape of a flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InputShape {
    pub fields: Vec<FieldSpec>,
}

impl InputShape {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate and coerce `raw` for the flow `flow_id`.
    ///
    /// Pure: the same input always yields the same result. Every offending
    /// field is reported, in shape order. Fields not in the shape are
    /// dropped.
    pub fn validate(&self, flow_id: &str, raw: &RawInput) -> Result<ValidatedInput, FieldErrors> {
        let mut fields = BTreeMap::new();
        let mut errors = Vec::new();

        for spec in &self.fields {
            match spec.coerce(raw.get(&spec.name)) {
                Ok(Some(value)) => {
                    fields.insert(spec.name.clone(), value);
                }
                Ok(None) if spec.required => errors.push(FieldError {
                    field: spec.name.clone(),
                    message: "This field is required".to_string(),
                }),
                Ok(None) => {}
                Err(message) => errors.push(FieldError {
                    field: spec.name.clone(),
                    message,
                }),
            }
        }

        if errors.is_empty() {
            Ok(ValidatedInput {
                flow_id: flow_id.to_string(),
                fields,
            })
        } else {
            Err(FieldErrors(errors))
        }
    }
}

/// `5.0` counts as the whole number 5, from JSON or from form text alike.
fn whole_number(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
}

/// A coerced input value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Object(serde_json::Map<String, Value>),
    Json(Value),
}

impl TypedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            TypedValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Input that has passed a flow's shape. Only [`InputShape::validate`] can
/// build one, so nothing unvalidated reaches the invoker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedInput {
    flow_id: String,
    fields: BTreeMap<String, TypedValue>,
}

impl ValidatedInput {
    /// The flow whose shape this input was validated against.
    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields.get(name)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_text)
    }

    pub fn fields(&self) -> &BTreeMap<String, TypedValue> {
        &self.fields
    }

    /// The fields as a JSON object, used as template context.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.fields).unwrap_or(Value::Object(Default::default()))
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field that failed validation for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn for_field(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        write!(f, "invalid input for: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// The declared type of an output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OutputKind {
    Text,
    List,
    Number,
    Boolean,
    Object,
    Any,
}

impl OutputKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            OutputKind::Text => value.is_string() || value.is_number(),
            OutputKind::List => value.is_array(),
            OutputKind::Number => value.is_number(),
            OutputKind::Boolean => value.is_boolean(),
            OutputKind::Object => value.is_object(),
            OutputKind::Any => true,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            OutputKind::Text => "string",
            OutputKind::List => "array",
            OutputKind::Number => "number",
            OutputKind::Boolean => "boolean",
            OutputKind::Object => "object",
            OutputKind::Any => "any JSON value",
        }
    }
}

/// One declared field of a flow's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OutputField {
    pub name: String,
    pub label: String,
    pub kind: OutputKind,
}

impl OutputField {
    pub fn new(name: &str, label: &str, kind: OutputKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

/// A reply that does not fit the declared output fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputMismatch {
    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("field '{field}' should be {expected}")]
    WrongKind { field: String, expected: &'static str },
}

/// Keep the declared fields of `reply`, checking the kind of each present,
/// non-null one. Undeclared fields are dropped; absent ones are fine.
pub fn conform_output(
    declared: &[OutputField],
    reply: &Value,
) -> Result<BTreeMap<String, Value>, OutputMismatch> {
    let object = reply.as_object().ok_or(OutputMismatch::NotAnObject)?;

    let mut fields = BTreeMap::new();
    for field in declared {
        let Some(value) = object.get(&field.name).filter(|v| !v.is_null()) else {
            continue;
        };
        if !field.kind.matches(value) {
            return Err(OutputMismatch::WrongKind {
                field: field.name.clone(),
                expected: field.kind.describe(),
            });
        }
        fields.insert(field.name.clone(), value.clone());
    }
    Ok(fields)
}

/// Describe the expected reply for a system prompt.
pub fn output_instruction(declared: &[OutputField]) -> String {
    let mut out = String::from(
        "Respond with a single JSON object and nothing else. Use these keys, \
         omitting any you cannot fill:\n",
    );
    for field in declared {
        out.push_str(&format!(
            "- \"{}\" ({}): {}\n",
            field.name,
            field.kind.describe(),
            field.label
        ));
    }
    out
}
