use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{nullable, opt, param, sparse_update, Entity, PartialUpdate};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, FilterError, SqlResult};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub tags: Option<String>,
    pub published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogCreate {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    /// Comma separated
    pub tags: Option<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Option<Option<String>>,
    pub published: Option<bool>,
}

/// Search parameters for `GET /blogs/search`
#[derive(Debug, Default, Deserialize)]
pub struct BlogSearch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub tags: Option<String>,
    pub published: Option<bool>,
}

impl From<BlogSearch> for FilterData {
    fn from(f: BlogSearch) -> Self {
        FilterData::new()
            .with("title", f.title)
            .with("author", f.author)
            .with("tags", f.tags)
            .with("published", f.published)
    }
}

#[derive(Debug, Deserialize)]
pub struct PublishQuery {
    pub publish: bool,
}

impl Validate for BlogCreate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("title", &self.title, 1, Some(200))
            .length("content", &self.content, 1, None)
            .optional_length("author", self.author.as_deref(), 0, Some(100))
            .finish()
    }
}

impl Validate for BlogUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .optional_length("title", self.title.as_deref(), 1, Some(200))
            .optional_length("content", self.content.as_deref(), 1, None)
            .optional_length("author", self.author.as_ref().and_then(Option::as_deref), 0, Some(100))
            .finish()
    }
}

impl Entity for BlogCreate {
    type Row = Blog;
    const LABEL: &'static str = "Blog";

    fn table_name() -> &'static str {
        "blogs"
    }

    fn field_mappings() -> FieldMappings {
        &[
            ("title", "title"),
            ("content", "content"),
            ("author", "author"),
            ("tags", "tags"),
            ("published", "published"),
        ]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO blogs (title, content, author, tags, published, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            vec![
                param(&self.title),
                param(&self.content),
                param(&self.author),
                param(&self.tags),
                param(&self.published),
            ],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE blogs SET title = ?, content = ?, author = ?, tags = ?, published = ?, \
             updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            vec![
                param(&self.title),
                param(&self.content),
                param(&self.author),
                param(&self.tags),
                param(&self.published),
                param(&id),
            ],
        )
    }
}

impl PartialUpdate for BlogUpdate {
    type Target = BlogCreate;

    fn changes(&self) -> Vec<(&'static str, Option<serde_json::Value>)> {
        vec![
            ("title", opt(&self.title)),
            ("content", opt(&self.content)),
            ("author", opt(&self.author)),
            ("tags", opt(&self.tags)),
            ("published", opt(&self.published)),
        ]
    }
}

/// `UPDATE blogs SET published = ? WHERE id = ?`
pub fn publish_query(id: i64, publish: bool) -> Result<SqlResult, FilterError> {
    sparse_update("blogs", id, vec![("published", Some(publish.into()))])
}
