//! Read-only access to the competency / occupation tables.
//!
//! `MatchEngine` holds an `Arc<dyn CompetencyStore>`; `PgCompetencyStore` is the
//! production backend. Every query is an independent read, wrapped in the
//! configured retry policy.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{with_retry, RetryPolicy};
use crate::errors::AppError;
use crate::models::occupation::{
    AttributeRow, CompetencyMappingRow, CompetencyScoreRow, EducationRow, JobZoneRow,
    MappedOccupationRow, OccupationRow,
};

/// Occupation-scoped attribute tables that share the
/// `(onetsoc_code, element_id, scale_id, data_value)` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTable {
    Skills,
    Knowledge,
    WorkActivities,
}

impl AttributeTable {
    pub const fn table_name(self) -> &'static str {
        match self {
            AttributeTable::Skills => "skills",
            AttributeTable::Knowledge => "knowledge",
            AttributeTable::WorkActivities => "work_activities",
        }
    }
}

#[async_trait]
pub trait CompetencyStore: Send + Sync {
    /// Mapping rows whose competency_1, _2 or _3 is in `competencies`, joined
    /// with occupation title/description, ordered by `competency_1_score` desc.
    async fn find_mappings_by_competencies(
        &self,
        competencies: &[String],
        limit: Option<i64>,
    ) -> Result<Vec<MappedOccupationRow>, AppError>;

    async fn find_occupation(&self, code: &str) -> Result<Option<OccupationRow>, AppError>;

    async fn find_job_zone(&self, code: &str) -> Result<Option<JobZoneRow>, AppError>;

    async fn find_mapping(&self, code: &str) -> Result<Option<CompetencyMappingRow>, AppError>;

    /// All competency scores of one occupation, highest first.
    async fn competency_scores(&self, code: &str) -> Result<Vec<CompetencyScoreRow>, AppError>;

    /// Top `limit` rows of an attribute table by `data_value` desc.
    async fn top_attributes(
        &self,
        table: AttributeTable,
        code: &str,
        limit: i64,
    ) -> Result<Vec<AttributeRow>, AppError>;

    /// Top `limit` education/training/experience rows by `data_value` desc.
    async fn top_education(&self, code: &str, limit: i64) -> Result<Vec<EducationRow>, AppError>;

    async fn count_mappings(&self) -> Result<i64, AppError>;

    async fn count_occupations(&self) -> Result<i64, AppError>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgCompetencyStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PgCompetencyStore {
    pub fn new(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

const MAPPING_COLUMNS: &str = r#"
    m.onetsoc_code,
    m.competency_1, m.competency_1_score::float8 AS competency_1_score,
    m.competency_2, m.competency_2_score::float8 AS competency_2_score,
    m.competency_3, m.competency_3_score::float8 AS competency_3_score
"#;

#[async_trait]
impl CompetencyStore for PgCompetencyStore {
    async fn find_mappings_by_competencies(
        &self,
        competencies: &[String],
        limit: Option<i64>,
    ) -> Result<Vec<MappedOccupationRow>, AppError> {
        // LIMIT NULL means no limit in Postgres.
        let sql = format!(
            r#"
            SELECT {MAPPING_COLUMNS}, o.title, o.description
            FROM job_nace_mappings m
            LEFT JOIN occupation_data o ON o.onetsoc_code = m.onetsoc_code
            WHERE m.competency_1 = ANY($1)
               OR m.competency_2 = ANY($1)
               OR m.competency_3 = ANY($1)
            ORDER BY m.competency_1_score DESC, m.onetsoc_code ASC
            LIMIT $2
            "#
        );
        with_retry(self.retry, "find_mappings_by_competencies", || async {
            Ok(sqlx::query_as::<_, MappedOccupationRow>(&sql)
                .bind(competencies)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?)
        })
        .await
    }

    async fn find_occupation(&self, code: &str) -> Result<Option<OccupationRow>, AppError> {
        with_retry(self.retry, "find_occupation", || async {
            Ok(sqlx::query_as::<_, OccupationRow>(
                "SELECT onetsoc_code, title, description FROM occupation_data WHERE onetsoc_code = $1",
            )
            .bind(code)
            .fetch_optional(&self.pool)
            .await?)
        })
        .await
    }

    async fn find_job_zone(&self, code: &str) -> Result<Option<JobZoneRow>, AppError> {
        with_retry(self.retry, "find_job_zone", || async {
            Ok(sqlx::query_as::<_, JobZoneRow>(
                r#"
                SELECT jz.job_zone::int4 AS job_zone,
                       r.name, r.experience, r.education, r.job_training, r.examples, r.svp_range
                FROM job_zones jz
                LEFT JOIN job_zone_reference r ON r.job_zone = jz.job_zone
                WHERE jz.onetsoc_code = $1
                LIMIT 1
                "#,
            )
            .bind(code)
            .fetch_optional(&self.pool)
            .await?)
        })
        .await
    }

    async fn find_mapping(&self, code: &str) -> Result<Option<CompetencyMappingRow>, AppError> {
        let sql =
            format!("SELECT {MAPPING_COLUMNS} FROM job_nace_mappings m WHERE m.onetsoc_code = $1 LIMIT 1");
        with_retry(self.retry, "find_mapping", || async {
            Ok(sqlx::query_as::<_, CompetencyMappingRow>(&sql)
                .bind(code)
                .fetch_optional(&self.pool)
                .await?)
        })
        .await
    }

    async fn competency_scores(&self, code: &str) -> Result<Vec<CompetencyScoreRow>, AppError> {
        with_retry(self.retry, "competency_scores", || async {
            Ok(sqlx::query_as::<_, CompetencyScoreRow>(
                r#"
                SELECT onetsoc_code, competency, score::float8 AS score
                FROM job_competency_scores
                WHERE onetsoc_code = $1
                ORDER BY score DESC
                "#,
            )
            .bind(code)
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    async fn top_attributes(
        &self,
        table: AttributeTable,
        code: &str,
        limit: i64,
    ) -> Result<Vec<AttributeRow>, AppError> {
        // Table names come from a closed enum, never from input.
        let sql = format!(
            r#"
            SELECT a.onetsoc_code, a.element_id, a.scale_id,
                   a.data_value::float8 AS data_value,
                   c.element_name, c.description
            FROM {table} a
            LEFT JOIN content_model_reference c ON c.element_id = a.element_id
            WHERE a.onetsoc_code = $1
            ORDER BY a.data_value DESC
            LIMIT $2
            "#,
            table = table.table_name()
        );
        with_retry(self.retry, table.table_name(), || async {
            Ok(sqlx::query_as::<_, AttributeRow>(&sql)
                .bind(code)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?)
        })
        .await
    }

    async fn top_education(&self, code: &str, limit: i64) -> Result<Vec<EducationRow>, AppError> {
        with_retry(self.retry, "education_training_experience", || async {
            Ok(sqlx::query_as::<_, EducationRow>(
                r#"
                SELECT e.onetsoc_code, e.element_id, e.scale_id,
                       e.data_value::float8 AS data_value,
                       c.element_name, c.description,
                       e.category::int4 AS category,
                       ec.category_description
                FROM education_training_experience e
                LEFT JOIN content_model_reference c ON c.element_id = e.element_id
                LEFT JOIN ete_categories ec
                       ON ec.element_id = e.element_id
                      AND ec.scale_id = e.scale_id
                      AND ec.category = e.category
                WHERE e.onetsoc_code = $1
                ORDER BY e.data_value DESC
                LIMIT $2
                "#,
            )
            .bind(code)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    async fn count_mappings(&self) -> Result<i64, AppError> {
        with_retry(self.retry, "count_mappings", || async {
            Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_nace_mappings")
                .fetch_one(&self.pool)
                .await?)
        })
        .await
    }

    async fn count_occupations(&self) -> Result<i64, AppError> {
        with_retry(self.retry, "count_occupations", || async {
            Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM occupation_data")
                .fetch_one(&self.pool)
                .await?)
        })
        .await
    }
}
