//! Task DTOs, the write payload, and list filters.
//!
//! # Design
//! `Task` is the read model: every field decodes with a default so partial
//! server objects still parse. `TaskPayload` is the write model derived from
//! a `Task`. Zero-valued fields are dropped at serialization time through
//! `skip_serializing_if`, so the omission rules live next to the fields they
//! govern instead of in a hand-assembled JSON string.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// A task as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Task {
    pub id: String,
    pub content: String,
    pub project_id: String,
    pub order: i64,
    pub priority: i64,
    pub label_ids: Vec<i64>,
    pub completed: bool,
    pub comment_count: u32,
    pub indent: u32,
    pub due: Option<Due>,
}

impl Task {
    /// A fresh task carrying only its content, ready for `create`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Derive the create/update payload for this task.
    pub fn payload(&self, due_lang: &str) -> Result<TaskPayload> {
        TaskPayload::from_task(self, due_lang)
    }
}

/// A due-date descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Due {
    /// Human readable form, e.g. "every monday".
    pub string: String,
    /// ISO date, e.g. "2024-05-01".
    pub date: String,
    pub datetime: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
}

/// Body sent on create and update.
///
/// Only `content` is unconditional. Every other key is present only when
/// its value differs from the zero value. `due_lang` accompanies any due
/// field and is absent otherwise.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskPayload {
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub order: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<i64>,
    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub due_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_datetime: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_lang: Option<String>,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl TaskPayload {
    /// Build the payload, rejecting tasks with empty content.
    pub fn from_task(task: &Task, due_lang: &str) -> Result<Self> {
        if task.content.is_empty() {
            return Err(ApiError::EmptyContent);
        }

        let (due_string, due_datetime) = match &task.due {
            Some(due) => (due.string.clone(), due.datetime),
            None => (String::new(), None),
        };
        let due_lang = if due_string.is_empty() && due_datetime.is_none() {
            None
        } else {
            Some(due_lang.to_string())
        };

        Ok(Self {
            content: task.content.clone(),
            project_id: task.project_id.clone(),
            order: task.order,
            label_ids: task.label_ids.clone(),
            priority: task.priority,
            due_string,
            due_datetime,
            due_lang,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Query-string filter for `list`.
///
/// Keeps insertion order. Setting an existing key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParam {
    params: Vec<(String, String)>,
}

impl QueryParam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }

    /// Chaining form of `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParam {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut qp = QueryParam::new();
        for (k, v) in iter {
            qp.insert(k, v);
        }
        qp
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(
                f,
                "{sep}{}={}",
                urlencoding::encode(k),
                urlencoding::encode(v)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn payload_json(task: &Task) -> Value {
        serde_json::from_str(&task.payload("en").unwrap().to_json().unwrap()).unwrap()
    }

    #[test]
    fn payload_with_only_content_has_single_key() {
        let body = payload_json(&Task::new("Buy milk"));
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(body["content"], "Buy milk");
    }

    #[test]
    fn payload_omits_zero_values_and_read_only_fields() {
        let task = Task {
            id: "99".to_string(),
            content: "Write report".to_string(),
            completed: true,
            comment_count: 3,
            indent: 2,
            due: Some(Due::default()),
            ..Task::default()
        };
        let body = payload_json(&task);
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["content"]);
    }

    #[test]
    fn payload_includes_set_fields() {
        let task = Task {
            content: "Plan trip".to_string(),
            project_id: "2203306141".to_string(),
            order: 4,
            priority: 3,
            label_ids: vec![7, 8],
            due: Some(Due {
                string: "next friday".to_string(),
                ..Due::default()
            }),
            ..Task::default()
        };
        let body = payload_json(&task);
        assert_eq!(body["content"], "Plan trip");
        assert_eq!(body["project_id"], "2203306141");
        assert_eq!(body["order"], 4);
        assert_eq!(body["priority"], 3);
        assert_eq!(body["label_ids"], serde_json::json!([7, 8]));
        assert_eq!(body["due_string"], "next friday");
        assert_eq!(body["due_lang"], "en");
        assert!(body.get("due_datetime").is_none());
    }

    #[test]
    fn payload_encodes_due_datetime_as_rfc3339() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let task = Task {
            content: "Call dentist".to_string(),
            due: Some(Due {
                datetime: Some(when),
                ..Due::default()
            }),
            ..Task::default()
        };
        let body = payload_json(&task);
        let sent: DateTime<Utc> = body["due_datetime"].as_str().unwrap().parse().unwrap();
        assert_eq!(sent, when);
        assert_eq!(body["due_lang"], "en");
        assert!(body.get("due_string").is_none());
    }

    #[test]
    fn payload_uses_configured_due_lang() {
        let task = Task {
            content: "Reunião".to_string(),
            due: Some(Due {
                string: "amanhã".to_string(),
                ..Due::default()
            }),
            ..Task::default()
        };
        let payload = task.payload("pt").unwrap();
        assert_eq!(payload.due_lang.as_deref(), Some("pt"));
    }

    #[test]
    fn payload_rejects_empty_content() {
        let task = Task {
            project_id: "1".to_string(),
            ..Task::default()
        };
        assert!(matches!(task.payload("en"), Err(ApiError::EmptyContent)));
    }

    #[test]
    fn task_decodes_full_object() {
        let raw = r#"{
            "id": "2995104339",
            "content": "Buy Milk",
            "project_id": "2203306141",
            "order": 1,
            "priority": 4,
            "label_ids": [2156154810],
            "completed": false,
            "comment_count": 10,
            "indent": 1,
            "due": {
                "string": "tomorrow at 12",
                "date": "2016-09-01",
                "datetime": "2016-09-01T12:00:00Z",
                "timezone": "Europe/Moscow"
            }
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(
            task,
            Task {
                id: "2995104339".to_string(),
                content: "Buy Milk".to_string(),
                project_id: "2203306141".to_string(),
                order: 1,
                priority: 4,
                label_ids: vec![2156154810],
                completed: false,
                comment_count: 10,
                indent: 1,
                due: Some(Due {
                    string: "tomorrow at 12".to_string(),
                    date: "2016-09-01".to_string(),
                    datetime: Some(Utc.with_ymd_and_hms(2016, 9, 1, 12, 0, 0).unwrap()),
                    timezone: Some("Europe/Moscow".to_string()),
                }),
            }
        );
    }

    #[test]
    fn task_decodes_sparse_object() {
        let task: Task = serde_json::from_str(r#"{"id":"1","content":"x","due":null}"#).unwrap();
        assert_eq!(task.id, "1");
        assert!(task.label_ids.is_empty());
        assert!(task.due.is_none());
    }

    #[test]
    fn task_rejects_malformed_body() {
        assert!(serde_json::from_str::<Task>("{\"id\":").is_err());
        assert!(serde_json::from_str::<Task>(r#"{"order":"first"}"#).is_err());
    }

    #[test]
    fn query_param_empty_renders_nothing() {
        assert_eq!(QueryParam::new().to_string(), "");
    }

    #[test]
    fn query_param_single_entry() {
        let qp: QueryParam = [("a", "1")].into_iter().collect();
        assert_eq!(qp.to_string(), "?a=1");
    }

    #[test]
    fn query_param_two_entries_joined() {
        let qp = QueryParam::new().with("project_id", "22").with("label_id", "7");
        let rendered = qp.to_string();
        assert!(rendered.starts_with('?'));
        let pairs: Vec<&str> = rendered[1..].split('&').collect();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&"project_id=22"));
        assert!(pairs.contains(&"label_id=7"));
    }

    #[test]
    fn query_param_replaces_existing_key() {
        let qp = QueryParam::new().with("a", "1").with("b", "2").with("a", "3");
        assert_eq!(qp.len(), 2);
        assert_eq!(qp.get("a"), Some("3"));
        assert_eq!(qp.to_string(), "?a=3&b=2");
    }

    #[test]
    fn query_param_encodes_values() {
        let qp = QueryParam::new().with("filter", "today | overdue");
        assert_eq!(qp.to_string(), "?filter=today%20%7C%20overdue");
    }
}
