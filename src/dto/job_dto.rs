use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::job::{Job, JobFields, JobStatus};
use crate::services::job_query::JobFilter;
use crate::utils::validation::{normalize_list, trimmed};

/// Body of `POST /jobs/` and `PUT /jobs/{id}`. Missing fields deserialize as
/// empty so they surface as validation messages rather than parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct JobPayload {
    pub job_title: String,
    pub department: String,
    /// An array of skills, or one comma-separated string.
    #[serde(deserialize_with = "skills_from_list_or_text")]
    pub skills: Vec<String>,
    pub experience: String,
    pub salary: String,
    pub location: String,
    /// Only honoured on update: Open, Closed or On Hold.
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsInput {
    List(Vec<String>),
    Text(String),
}

/// `"Go, SQL"` becomes `["Go", " SQL"]`; trimming and dropping blanks happens
/// in `normalized_fields`.
fn skills_from_list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SkillsInput::deserialize(deserializer)? {
        SkillsInput::List(items) => items,
        SkillsInput::Text(text) => text.split(',').map(str::to_string).collect(),
    })
}

impl JobPayload {
    /// Trims every text field and drops blank skills.
    pub fn normalized_fields(&self) -> JobFields {
        JobFields {
            job_title: trimmed(&self.job_title),
            department: trimmed(&self.department),
            skills: normalize_list(&self.skills),
            experience: trimmed(&self.experience),
            salary: trimmed(&self.salary),
            location: trimmed(&self.location),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub job_title: String,
    pub department: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub salary: String,
    pub location: String,
    #[schema(value_type = String, example = "Open")]
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            job_title: value.job_title,
            department: value.department,
            skills: value.skills,
            experience: value.experience,
            salary: value.salary,
            location: value.location,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct JobListQuery {
    /// Case-insensitive match on title or skills.
    pub search: Option<String>,
    /// Exact department name.
    pub department: Option<String>,
}

impl From<JobListQuery> for JobFilter {
    fn from(value: JobListQuery) -> Self {
        JobFilter::new(value.search, value.department)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_drops_blank_skills() {
        let payload = JobPayload {
            job_title: "  Backend Engineer ".into(),
            department: "Engineering".into(),
            skills: vec![" Go".into(), " ".into(), "SQL ".into()],
            experience: "2-4 years".into(),
            salary: "$70k-$90k".into(),
            location: " Remote".into(),
            status: None,
        };
        let fields = payload.normalized_fields();
        assert_eq!(fields.job_title, "Backend Engineer");
        assert_eq!(fields.skills, vec!["Go", "SQL"]);
        assert_eq!(fields.location, "Remote");
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let payload: JobPayload = serde_json::from_str(r#"{"job_title": "QA"}"#).unwrap();
        assert_eq!(payload.job_title, "QA");
        assert!(payload.skills.is_empty());
        assert!(payload.department.is_empty());
        assert!(payload.status.is_none());
    }

    #[test]
    fn skills_accept_comma_separated_text() {
        let payload: JobPayload =
            serde_json::from_str(r#"{"job_title": "QA", "skills": "Go, SQL,, "}"#).unwrap();
        assert_eq!(payload.normalized_fields().skills, vec!["Go", "SQL"]);

        let payload: JobPayload =
            serde_json::from_str(r#"{"skills": ["Go", " SQL"]}"#).unwrap();
        assert_eq!(payload.normalized_fields().skills, vec!["Go", "SQL"]);
    }

    #[test]
    fn skills_of_other_types_are_rejected() {
        assert!(serde_json::from_str::<JobPayload>(r#"{"skills": 42}"#).is_err());
    }
}
