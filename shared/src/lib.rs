use serde::{Deserialize, Serialize};

/// Outbound shape of a task as returned by the API.
///
/// The due date travels as text; the server renders and re-parses it with a
/// single ISO-8601 format so clients can hand the string straight back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: String,
    pub estimated_time: f32,
    pub is_complete: Option<bool>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: f32,
    pub due_date: String,
    pub is_complete: Option<bool>,
}

/// Body of `PUT /tasks/{id}`.
///
/// Every field is optional: only the fields present in the request overwrite
/// the stored task, everything else is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<f32>,
    pub due_date: Option<String>,
    pub is_complete: Option<bool>,
}
