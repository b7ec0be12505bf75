//! Autorun tasks: scheduled compensation days and timetable/schedule overrides
//!
//! A task applies to the scopes listed in its `scope` field. Task content is
//! kind-specific JSON:
//!
//! ```text
//! Compensation  { date, useDate }       work on `date` following `useDate`'s timetable
//! Timetable     { date, timetableId }   use another timetable on `date`
//! Schedule      { date, schedule }      per-scope course schedule for `date`
//! All           { date, schedule }      global course schedule for `date`
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ScopeError;
use crate::scope::normalize;
use crate::source::envelope_items;

/// Kind of autorun task, serialised as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AutorunType {
    Compensation,
    Timetable,
    Schedule,
    All,
}

impl AutorunType {
    pub const ALL_TYPES: [AutorunType; 4] = [Self::Compensation, Self::Timetable, Self::Schedule, Self::All];

    pub fn code(self) -> u8 {
        match self {
            Self::Compensation => 0,
            Self::Timetable => 1,
            Self::Schedule => 2,
            Self::All => 3,
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Compensation => "调休",
            Self::Timetable => "作息表调整",
            Self::Schedule => "课程表调整",
            Self::All => "全部调整",
        }
    }
}

impl TryFrom<u8> for AutorunType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL_TYPES
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| format!("Unknown autorun type: {}", code))
    }
}

impl From<AutorunType> for u8 {
    fn from(t: AutorunType) -> Self {
        t.code()
    }
}

impl std::fmt::Display for AutorunType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lifecycle status, controlled by the backend
///
/// Statuses outside the known three are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    Active,
    Expired,
    Other(String),
}

impl TaskStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "待生效",
            Self::Active => "生效中",
            Self::Expired => "已过期",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "待生效" => Self::Pending,
            "生效中" => Self::Active,
            "已过期" => Self::Expired,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.label().to_string()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Known timetables as (id, label)
pub const TIMETABLES: [(&str, &str); 3] = [("default", "默认作息表"), ("exam", "考试周作息表"), ("summer", "暑期作息表")];

/// Label of a timetable id, or the id itself when unknown
pub fn timetable_label(id: &str) -> &str {
    TIMETABLES
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, label)| *label)
        .unwrap_or(id)
}

/// An autorun task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutorunTask {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AutorunType,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default = "empty_content")]
    pub content: Value,
    #[serde(default)]
    pub priority: f64,
    #[serde(default)]
    pub status: TaskStatus,
}

fn empty_content() -> Value {
    Value::Object(Default::default())
}

impl AutorunTask {
    /// Build a task from a loosely shaped backend record
    ///
    /// The id comes from `hashid`, falling back to `id`; `scope` may be a list
    /// or a single string; a non-numeric `priority` becomes 0; a missing or
    /// empty `status` is pending.
    pub fn from_backend(record: &Value) -> Result<Self, ScopeError> {
        debug!("AutorunTask::from_backend: called");
        let id = ["hashid", "id"]
            .iter()
            .filter_map(|key| record.get(*key))
            .find_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| ScopeError::InvalidResponse("autorun record has no id".to_string()))?;

        let code = record
            .get("type")
            .and_then(Value::as_u64)
            .and_then(|c| u8::try_from(c).ok())
            .ok_or_else(|| ScopeError::InvalidResponse(format!("autorun record {} has no valid type", id)))?;
        let kind = AutorunType::try_from(code).map_err(ScopeError::InvalidResponse)?;

        let scope = match record.get("scope") {
            Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        };

        let content = match record.get("content") {
            Some(v @ Value::Object(_)) => v.clone(),
            _ => empty_content(),
        };

        let priority = match record.get("priority") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
            _ => 0.0,
        };

        let status = match record.get("status") {
            Some(Value::String(s)) if !s.is_empty() => TaskStatus::from(s.clone()),
            _ => TaskStatus::default(),
        };
        if let TaskStatus::Other(raw) = &status {
            warn!(%id, status = %raw, "AutorunTask::from_backend: unknown status");
        }

        Ok(Self {
            id,
            kind,
            scope,
            content,
            priority,
            status,
        })
    }

    /// The task's scope with duplicates and covered entries removed
    pub fn normalized_scope(&self) -> Vec<String> {
        normalize(&self.scope)
    }

    fn content_str(&self, key: &str) -> &str {
        self.content.get(key).and_then(Value::as_str).unwrap_or("?")
    }
}

/// Parse the tasks in a `{ "data": [...] }` envelope or bare array
///
/// Records without an id or a known type are skipped with a warning.
pub fn tasks_from_payload(payload: Value) -> Vec<AutorunTask> {
    envelope_items(payload)
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match AutorunTask::from_backend(record) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(index, error = %e, "tasks_from_payload: skipping record");
                None
            }
        })
        .collect()
}

/// One-line description of a task's content for listings
pub fn summarize_content(task: &AutorunTask) -> String {
    let date = task.content_str("date");
    match task.kind {
        AutorunType::Compensation => format!("{} 上 {} 的课", date, task.content_str("useDate")),
        AutorunType::Timetable => format!("{} 使用作息表：{}", date, timetable_label(task.content_str("timetableId"))),
        AutorunType::Schedule => format!("为 {} 设置课程表（班级/范围见生效域）", date),
        AutorunType::All => format!("全局为 {} 设置课程表", date),
    }
}
