//! Row shapes read from the O*NET-derived tables.
//!
//! Numeric columns are cast to `float8` / `int4` in the queries, so these
//! structs do not care how the bulk loader typed them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `occupation_data`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OccupationRow {
    pub onetsoc_code: String,
    pub title: String,
    pub description: String,
}

/// `job_nace_mappings`: the three strongest competencies of one occupation,
/// rank 1 first.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompetencyMappingRow {
    pub onetsoc_code: String,
    pub competency_1: String,
    pub competency_1_score: f64,
    pub competency_2: String,
    pub competency_2_score: f64,
    pub competency_3: String,
    pub competency_3_score: f64,
}

impl CompetencyMappingRow {
    /// `(name, score)` pairs in rank order.
    pub fn ranked(&self) -> [(&str, f64); 3] {
        [
            (self.competency_1.as_str(), self.competency_1_score),
            (self.competency_2.as_str(), self.competency_2_score),
            (self.competency_3.as_str(), self.competency_3_score),
        ]
    }
}

/// A mapping row joined with its occupation's title and description.
/// The join is a LEFT JOIN, so both may be missing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MappedOccupationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub mapping: CompetencyMappingRow,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// `job_competency_scores`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompetencyScoreRow {
    pub onetsoc_code: String,
    pub competency: String,
    pub score: f64,
}

/// `job_zones` joined with `job_zone_reference`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobZoneRow {
    pub job_zone: i32,
    pub name: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub job_training: Option<String>,
    pub examples: Option<String>,
    pub svp_range: Option<String>,
}

/// A `skills`, `knowledge` or `work_activities` row with its
/// `content_model_reference` name and description.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttributeRow {
    pub onetsoc_code: String,
    pub element_id: String,
    pub scale_id: Option<String>,
    pub data_value: f64,
    pub element_name: Option<String>,
    pub description: Option<String>,
}

/// `education_training_experience` row; also carries the `ete_categories`
/// label for its category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attribute: AttributeRow,
    pub category: Option<i32>,
    pub category_description: Option<String>,
}
