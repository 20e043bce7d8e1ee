//! Pure conversions between the persisted task record and the wire shapes.

use chrono::{Local, NaiveDateTime};
use todolist_shared::{CreateTaskRequest, TaskInfo, UpdateTaskRequest};

use crate::store::TaskRecord;

// One format for both directions, so a rendered due date re-parses to the
// same instant. The fraction is optional on input and omitted when zero.
const WIRE_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse_wire_datetime(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, WIRE_DATETIME)
}

pub fn format_wire_datetime(value: NaiveDateTime) -> String {
    value.format(WIRE_DATETIME).to_string()
}

/// Renders a stored record as the outbound transfer shape.
pub fn task_info(task: &TaskRecord) -> TaskInfo {
    TaskInfo {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        due_date: format_wire_datetime(task.due_date),
        estimated_time: task.estimated_time,
        is_complete: task.is_complete,
    }
}

/// Builds a fresh record from a creation request.
///
/// `start_time` is always the current moment; the request carries no say in
/// it. `end_time` stays unset until a caller decides the task is finished.
pub fn new_task_record(body: &CreateTaskRequest) -> Result<TaskRecord, chrono::ParseError> {
    Ok(TaskRecord {
        id: 0,
        title: body.title.clone(),
        description: body.description.clone(),
        estimated_time: body.estimated_time,
        due_date: parse_wire_datetime(&body.due_date)?,
        is_complete: body.is_complete,
        start_time: Local::now().naive_local(),
        end_time: None,
    })
}

/// Merges an update request into a stored record, field by field. Fields
/// absent from the request leave the stored values untouched.
pub fn apply_update(
    task: &mut TaskRecord,
    body: &UpdateTaskRequest,
) -> Result<(), chrono::ParseError> {
    if let Some(title) = &body.title {
        task.title = Some(title.clone());
    }
    if let Some(description) = &body.description {
        task.description = Some(description.clone());
    }
    if let Some(due_date) = &body.due_date {
        task.due_date = parse_wire_datetime(due_date)?;
    }
    if let Some(estimated_time) = body.estimated_time {
        task.estimated_time = estimated_time;
    }
    if let Some(is_complete) = body.is_complete {
        task.is_complete = Some(is_complete);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateTaskRequest {
        CreateTaskRequest {
            title: Some("Buy milk".to_string()),
            description: Some("2%".to_string()),
            estimated_time: 0.5,
            due_date: "2025-01-01T00:00:00".to_string(),
            is_complete: Some(false),
        }
    }

    #[test]
    fn new_task_record_copies_fields_and_stamps_start_time() {
        let before = Local::now().naive_local();
        let task = new_task_record(&create_request()).unwrap();
        let after = Local::now().naive_local();

        assert_eq!(task.title.as_deref(), Some("Buy milk"));
        assert_eq!(task.description.as_deref(), Some("2%"));
        assert_eq!(task.estimated_time, 0.5);
        assert_eq!(task.is_complete, Some(false));
        assert_eq!(format_wire_datetime(task.due_date), "2025-01-01T00:00:00");
        assert!(task.start_time >= before && task.start_time <= after);
        assert_eq!(task.end_time, None);
    }

    #[test]
    fn new_task_record_rejects_malformed_due_date() {
        let mut body = create_request();
        body.due_date = "next tuesday".to_string();
        assert!(new_task_record(&body).is_err());
    }

    #[test]
    fn due_date_survives_the_wire_round_trip() {
        let task = new_task_record(&create_request()).unwrap();
        let info = task_info(&task);
        assert_eq!(parse_wire_datetime(&info.due_date).unwrap(), task.due_date);
    }

    #[test]
    fn apply_update_touches_only_present_fields() {
        let mut task = new_task_record(&create_request()).unwrap();
        let update = UpdateTaskRequest {
            is_complete: Some(true),
            ..Default::default()
        };

        apply_update(&mut task, &update).unwrap();
        assert_eq!(task.is_complete, Some(true));
        assert_eq!(task.title.as_deref(), Some("Buy milk"));
        assert_eq!(task.description.as_deref(), Some("2%"));
        assert_eq!(task.estimated_time, 0.5);
    }

    #[test]
    fn apply_update_with_no_fields_is_a_no_op() {
        let mut task = new_task_record(&create_request()).unwrap();
        let unchanged = task.clone();

        apply_update(&mut task, &UpdateTaskRequest::default()).unwrap();
        assert_eq!(task, unchanged);
    }

    #[test]
    fn task_info_carries_the_record_fields() {
        let mut task = new_task_record(&create_request()).unwrap();
        task.id = 9;

        let info = task_info(&task);
        assert_eq!(info.id, 9);
        assert_eq!(info.title.as_deref(), Some("Buy milk"));
        assert_eq!(info.estimated_time, 0.5);
        assert_eq!(info.is_complete, Some(false));
    }
}
