use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{nullable, opt, param, Entity, PartialUpdate};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, SqlResult};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfessionalExperience {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalExperienceCreate {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfessionalExperienceUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    pub is_current: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfessionalExperienceFilter {
    pub title: Option<String>,
    pub is_current: Option<bool>,
}

impl From<ProfessionalExperienceFilter> for FilterData {
    fn from(f: ProfessionalExperienceFilter) -> Self {
        FilterData::new().with("title", f.title).with("is_current", f.is_current)
    }
}

impl Validate for ProfessionalExperienceCreate {
    fn validate(&self) -> Result<(), ApiError> {
        let ends_after_start = self.end_date.map_or(true, |end| end >= self.start_date);
        FieldErrors::new()
            .length("title", &self.title, 1, Some(150))
            .check("end_date", ends_after_start, "must not be before start_date")
            .finish()
    }
}

impl Validate for ProfessionalExperienceUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        let ends_after_start = match (self.start_date, self.end_date) {
            (Some(start), Some(Some(end))) => end >= start,
            _ => true,
        };
        FieldErrors::new()
            .optional_length("title", self.title.as_deref(), 1, Some(150))
            .check("end_date", ends_after_start, "must not be before start_date")
            .finish()
    }
}

impl Entity for ProfessionalExperienceCreate {
    type Row = ProfessionalExperience;
    const LABEL: &'static str = "Professional experience";

    fn table_name() -> &'static str {
        "professional_experiences"
    }

    fn field_mappings() -> FieldMappings {
        &[
            ("title", "title"),
            ("description", "description"),
            ("start_date", "start_date"),
            ("end_date", "end_date"),
            ("is_current", "is_current"),
        ]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO professional_experiences (title, description, start_date, end_date, is_current) \
             VALUES (?, ?, ?, ?, ?)",
            vec![
                param(&self.title),
                param(&self.description),
                param(&self.start_date),
                param(&self.end_date),
                param(&self.is_current),
            ],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE professional_experiences \
             SET title = ?, description = ?, start_date = ?, end_date = ?, is_current = ? WHERE id = ?",
            vec![
                param(&self.title),
                param(&self.description),
                param(&self.start_date),
                param(&self.end_date),
                param(&self.is_current),
                param(&id),
            ],
        )
    }
}

impl PartialUpdate for ProfessionalExperienceUpdate {
    type Target = ProfessionalExperienceCreate;

    fn changes(&self) -> Vec<(&'static str, Option<serde_json::Value>)> {
        vec![
            ("title", opt(&self.title)),
            ("description", opt(&self.description)),
            ("start_date", opt(&self.start_date)),
            ("end_date", opt(&self.end_date)),
            ("is_current", opt(&self.is_current)),
        ]
    }
}
