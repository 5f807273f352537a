use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{nullable, opt, param, Entity, PartialUpdate};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, SqlResult};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_status() -> String {
    "active".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    pub description: Option<String>,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub repository_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub demo_url: Option<Option<String>>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub status: Option<String>,
}

impl From<ProjectFilter> for FilterData {
    fn from(f: ProjectFilter) -> Self {
        FilterData::new().with("name", f.name).with("status", f.status)
    }
}

impl Validate for ProjectCreate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("name", &self.name, 1, Some(200))
            .optional_length("repository_url", self.repository_url.as_deref(), 0, Some(255))
            .optional_length("demo_url", self.demo_url.as_deref(), 0, Some(255))
            .length("status", &self.status, 1, Some(50))
            .finish()
    }
}

impl Validate for ProjectUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .optional_length("name", self.name.as_deref(), 1, Some(200))
            .optional_length("repository_url", self.repository_url.as_ref().and_then(Option::as_deref), 0, Some(255))
            .optional_length("demo_url", self.demo_url.as_ref().and_then(Option::as_deref), 0, Some(255))
            .optional_length("status", self.status.as_deref(), 1, Some(50))
            .finish()
    }
}

// created_at/updated_at are assigned by the server, never bound from the body
impl Entity for ProjectCreate {
    type Row = Project;
    const LABEL: &'static str = "Project";

    fn table_name() -> &'static str {
        "projects"
    }

    fn field_mappings() -> FieldMappings {
        &[
            ("name", "name"),
            ("description", "description"),
            ("repository_url", "repository_url"),
            ("demo_url", "demo_url"),
            ("status", "status"),
        ]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO projects (name, description, repository_url, demo_url, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            vec![
                param(&self.name),
                param(&self.description),
                param(&self.repository_url),
                param(&self.demo_url),
                param(&self.status),
            ],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE projects SET name = ?, description = ?, repository_url = ?, demo_url = ?, status = ?, \
             updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            vec![
                param(&self.name),
                param(&self.description),
                param(&self.repository_url),
                param(&self.demo_url),
                param(&self.status),
                param(&id),
            ],
        )
    }
}

impl PartialUpdate for ProjectUpdate {
    type Target = ProjectCreate;

    fn changes(&self) -> Vec<(&'static str, Option<serde_json::Value>)> {
        vec![
            ("name", opt(&self.name)),
            ("description", opt(&self.description)),
            ("repository_url", opt(&self.repository_url)),
            ("demo_url", opt(&self.demo_url)),
            ("status", opt(&self.status)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_defaults_to_active() {
        let project: ProjectCreate = serde_json::from_value(json!({ "name": "portfolio" })).unwrap();
        assert_eq!(project.status, "active");
    }

    #[test]
    fn timestamps_are_server_assigned() {
        let project: ProjectCreate = serde_json::from_value(json!({ "name": "portfolio" })).unwrap();
        let sql = project.insert_query();
        assert!(sql.query.contains("CURRENT_TIMESTAMP, CURRENT_TIMESTAMP"));
        assert_eq!(sql.params.len(), 5);
        assert!(project.update_query(3).query.contains("updated_at = CURRENT_TIMESTAMP"));
    }
}
