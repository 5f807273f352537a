// Many-to-many join tables. They have no sparse update body: a link is
// replaced as a whole or deleted.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{param, Entity};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, SqlResult};
use crate::validation::{FieldErrors, Validate};

macro_rules! link_entity {
    (
        $row:ident, $create:ident, $filter:ident,
        table = $table:literal, label = $label:literal,
        $left:ident, $right:ident
    ) => {
        #[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
        pub struct $row {
            pub id: i64,
            pub $left: i64,
            pub $right: i64,
        }

        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $create {
            pub $left: i64,
            pub $right: i64,
        }

        #[derive(Debug, Default, Deserialize)]
        pub struct $filter {
            pub $left: Option<i64>,
            pub $right: Option<i64>,
        }

        impl From<$filter> for FilterData {
            fn from(f: $filter) -> Self {
                FilterData::new()
                    .with(stringify!($left), f.$left)
                    .with(stringify!($right), f.$right)
            }
        }

        impl Validate for $create {
            fn validate(&self) -> Result<(), ApiError> {
                FieldErrors::new()
                    .positive(stringify!($left), self.$left)
                    .positive(stringify!($right), self.$right)
                    .finish()
            }
        }

        impl Entity for $create {
            type Row = $row;
            const LABEL: &'static str = $label;

            fn table_name() -> &'static str {
                $table
            }

            fn field_mappings() -> FieldMappings {
                &[
                    (stringify!($left), stringify!($left)),
                    (stringify!($right), stringify!($right)),
                ]
            }

            fn insert_query(&self) -> SqlResult {
                SqlResult::new(
                    concat!(
                        "INSERT INTO ", $table, " (", stringify!($left), ", ", stringify!($right),
                        ") VALUES (?, ?)"
                    ),
                    vec![param(&self.$left), param(&self.$right)],
                )
            }

            fn update_query(&self, id: i64) -> SqlResult {
                SqlResult::new(
                    concat!(
                        "UPDATE ", $table, " SET ", stringify!($left), " = ?, ", stringify!($right),
                        " = ? WHERE id = ?"
                    ),
                    vec![param(&self.$left), param(&self.$right), param(&id)],
                )
            }
        }
    };
}

link_entity!(
    CompanyExperience, CompanyExperienceCreate, CompanyExperienceFilter,
    table = "company_experiences", label = "Company-experience relationship",
    company_id, experience_id
);

link_entity!(
    TechnologyExperience, TechnologyExperienceCreate, TechnologyExperienceFilter,
    table = "technology_experiences", label = "Technology-experience relationship",
    technology_id, experience_id
);

link_entity!(
    TechnologyProject, TechnologyProjectCreate, TechnologyProjectFilter,
    table = "technology_projects", label = "Technology-project relationship",
    technology_id, project_id
);
