//! Wire representation of tasks and the validation that guards the service.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Task, TaskCreate, TaskUpdate};
use crate::errors::AppError;

/// Wire shapes that validate themselves and convert to a transfer type.
pub trait ValidatedRequest {
    type Transfer;

    fn into_transfer(self) -> Result<Self::Transfer, AppError>;
}

/// Request DTO for creating a new task.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct TaskCreateRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    /// RFC 3339 timestamp, e.g. `2024-09-05T15:04:05+05:00`.
    #[serde(deserialize_with = "null_as_empty")]
    pub due_date: String,
}

/// Request DTO for replacing a task.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct TaskUpdateRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    /// RFC 3339 timestamp, e.g. `2024-09-05T15:04:05+05:00`.
    #[serde(deserialize_with = "null_as_empty")]
    pub due_date: String,
}

/// Response DTO for returning task details.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters accepted by the list endpoint. Not applied to the query yet.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// A JSON `null` reads as an empty string so validation reports it like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 with an upper-case `T` separator and `Z` suffix only.
fn parse_rfc3339(raw: &str) -> Option<DateTime<FixedOffset>> {
    if raw.as_bytes().get(10) != Some(&b'T') || raw.ends_with('z') {
        return None;
    }
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Checks every field and reports all violations in one message.
fn validate_fields(
    title: &str,
    description: &str,
    due_date: &str,
) -> Result<DateTime<FixedOffset>, AppError> {
    let mut violations = String::new();

    if title.is_empty() {
        violations.push_str("Title is required;");
    }
    if description.is_empty() {
        violations.push_str("Description is required;");
    }
    let parsed = parse_rfc3339(due_date);
    if parsed.is_none() {
        violations.push_str("DueDate is required and must be in RFC3339 format;");
    }

    match parsed {
        Some(due) if violations.is_empty() => Ok(due),
        _ => Err(AppError::Validation(violations)),
    }
}

impl ValidatedRequest for TaskCreateRequest {
    type Transfer = TaskCreate;

    fn into_transfer(self) -> Result<TaskCreate, AppError> {
        let due_date = validate_fields(&self.title, &self.description, &self.due_date)?;
        Ok(TaskCreate {
            title: self.title,
            description: self.description,
            due_date,
        })
    }
}

impl ValidatedRequest for TaskUpdateRequest {
    type Transfer = TaskUpdate;

    fn into_transfer(self) -> Result<TaskUpdate, AppError> {
        let due_date = validate_fields(&self.title, &self.description, &self.due_date)?;
        Ok(TaskUpdate {
            title: self.title,
            description: self.description,
            due_date,
        })
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            due_date: task.due_date.to_rfc3339_opts(SecondsFormat::Secs, true),
            created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: task.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_req(title: &str, description: &str, due_date: &str) -> TaskCreateRequest {
        TaskCreateRequest {
            title: title.to_string(),
            description: description.to_string(),
            due_date: due_date.to_string(),
        }
    }

    #[test]
    fn test_all_violations_accumulate_in_order() {
        let err = create_req("", "", "2024-09-05T15:74:05+05:00")
            .into_transfer()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Title is required;Description is required;DueDate is required and must be in RFC3339 format;"
        );
    }

    #[test]
    fn test_single_violation() {
        let err = TaskUpdateRequest {
            title: "t".into(),
            description: "".into(),
            due_date: "2024-09-05T15:04:05Z".into(),
        }
        .into_transfer()
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(msg) if msg == "Description is required;"));
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let req: TaskCreateRequest = serde_json::from_str(r#"{"title":"only"}"#).unwrap();
        let err = req.into_transfer().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Description is required;DueDate is required and must be in RFC3339 format;"
        );
    }

    #[test]
    fn test_null_fields_validate_like_missing() {
        let req: TaskCreateRequest =
            serde_json::from_str(r#"{"title":null,"description":"","due_date":""}"#).unwrap();
        let err = req.into_transfer().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Title is required;Description is required;DueDate is required and must be in RFC3339 format;"
        );
    }

    #[test]
    fn test_due_date_requires_t_separator() {
        for due_date in [
            "2024-09-05 15:04:05+05:00",
            "2024-09-05t15:04:05+05:00",
            "2024-09-05T15:04:05z",
        ] {
            let err = create_req("t", "d", due_date).into_transfer().unwrap_err();
            assert_eq!(
                err.to_string(),
                "DueDate is required and must be in RFC3339 format;",
                "{} should be rejected",
                due_date
            );
        }

        assert!(
            create_req("t", "d", "2024-09-05T15:04:05.123Z")
                .into_transfer()
                .is_ok()
        );
    }

    #[test]
    fn test_valid_request_keeps_offset() {
        let create = create_req("First Task", "First description", "2024-09-05T15:04:05+05:00")
            .into_transfer()
            .unwrap();

        assert_eq!(create.title, "First Task");
        assert_eq!(create.due_date.offset().local_minus_utc(), 5 * 3600);
        assert_eq!(
            create.due_date.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 9, 5, 10, 4, 5).unwrap()
        );
    }

    #[test]
    fn test_response_round_trips_due_date() {
        let due = DateTime::parse_from_rfc3339("2024-09-05T15:04:05+05:00").unwrap();
        let stamp = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let response = TaskResponse::from(Task {
            id: 7,
            title: "First Task".into(),
            description: "First description".into(),
            due_date: due,
            created_at: stamp,
            updated_at: stamp,
        });

        assert_eq!(response.due_date, "2024-09-05T15:04:05+05:00");
        assert_eq!(response.created_at, "2024-09-01T08:00:00Z");

        let reparsed = DateTime::parse_from_rfc3339(&response.due_date).unwrap();
        assert_eq!(reparsed, due);
        assert_eq!(reparsed.offset(), due.offset());
    }
}
