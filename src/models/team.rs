use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub organisation_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamCreate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Partial update. `description` distinguishes "absent" (leave as is) from an
/// explicit null (clear the field), hence the nested Option.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Join row as selected for a team's member listing.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub team_id: i64,
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub assigned_at: DateTime<Utc>,
}

/// Member employee embedded in team responses.
#[derive(Debug, Clone, Serialize)]
pub struct MemberRef {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub assigned_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for MemberRef {
    fn from(row: TeamMemberRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            assigned_at: row.assigned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamWithMembers {
    #[serde(flatten)]
    pub team: Team,
    pub employees: Vec<MemberRef>,
    pub employee_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignRequest {
    #[serde(rename = "employeeId")]
    pub employee_id: Option<i64>,
    #[serde(rename = "employeeIds")]
    pub employee_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnassignRequest {
    #[serde(rename = "employeeId")]
    pub employee_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_description_deserializes_as_none() {
        let update: TeamUpdate = serde_json::from_str(r#"{"name": "Platform"}"#).unwrap();
        assert_eq!(update.description, None);
    }

    #[test]
    fn null_description_deserializes_as_explicit_clear() {
        let update: TeamUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(update.description, Some(None));
    }

    #[test]
    fn present_description_deserializes_as_value() {
        let update: TeamUpdate =
            serde_json::from_str(r#"{"description": "Owns the pipeline"}"#).unwrap();
        assert_eq!(
            update.description,
            Some(Some("Owns the pipeline".to_string()))
        );
    }

    #[test]
    fn assign_request_accepts_single_or_plural_ids() {
        let single: AssignRequest = serde_json::from_str(r#"{"employeeId": 3}"#).unwrap();
        assert_eq!(single.employee_id, Some(3));

        let plural: AssignRequest = serde_json::from_str(r#"{"employeeIds": [1, 2]}"#).unwrap();
        assert_eq!(plural.employee_ids, Some(vec![1, 2]));
    }
}
