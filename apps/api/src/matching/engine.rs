//! Match Engine: the five operations behind the competency explorer.
//!
//! Each operation has a `try_*` form that reports store failures as `AppError`,
//! and a fail-soft form for UI callers that logs the failure and returns an
//! empty list, `None` or `false` instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::errors::AppError;
use crate::matching::scoring::{rank_by_score, score_rows, JobMatch};
use crate::matching::store::{AttributeTable, CompetencyStore};
use crate::matching::taxonomy::{competency_names, Competency};
use crate::models::occupation::{
    AttributeRow, CompetencyMappingRow, CompetencyScoreRow, EducationRow, JobZoneRow,
};

/// Rows kept per attribute table in a detailed profile.
pub const DETAIL_ATTRIBUTE_LIMIT: i64 = 10;

/// Where `limit` is applied in `match_jobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitMode {
    /// Score every intersecting occupation, sort by match score, then truncate.
    #[default]
    PostRanking,
    /// Legacy: push `LIMIT` into the store query (ordered by the first-ranked
    /// competency score) and keep store order. Results are not sorted by
    /// match score.
    PreRanking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCompetency {
    pub competency_name: String,
    pub match_strength: f64,
}

/// Job zone block of a detailed profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobZoneInfo {
    pub job_zone: i32,
    pub name: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub job_training: Option<String>,
    pub examples: Option<String>,
    pub svp_range: Option<String>,
}

impl From<JobZoneRow> for JobZoneInfo {
    fn from(row: JobZoneRow) -> Self {
        Self {
            job_zone: row.job_zone,
            name: row.name,
            experience: row.experience,
            education: row.education,
            job_training: row.job_training,
            examples: row.examples,
            svp_range: row.svp_range,
        }
    }
}

/// Everything known about one occupation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedJobInfo {
    pub onetsoc_code: String,
    pub title: String,
    pub description: String,
    pub job_zone: Option<JobZoneInfo>,
    pub top_competencies: Vec<TopCompetency>,
    pub skills: Vec<AttributeRow>,
    pub knowledge: Vec<AttributeRow>,
    pub work_activities: Vec<AttributeRow>,
    pub education_training: Vec<EducationRow>,
    pub all_competency_scores: Vec<CompetencyScoreRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingStats {
    pub total_mappings: i64,
    pub total_jobs: i64,
    pub coverage_percentage: u32,
}

impl MappingStats {
    pub fn new(total_mappings: i64, total_jobs: i64) -> Self {
        let coverage_percentage = if total_jobs > 0 {
            ((total_mappings as f64 / total_jobs as f64) * 100.0)
                .max(0.0)
                .round() as u32
        } else {
            0
        };
        Self {
            total_mappings,
            total_jobs,
            coverage_percentage,
        }
    }
}

/// Formats a mapping row as rank-ordered `{competency_name, match_strength}` entries.
pub fn top_competencies(mapping: &CompetencyMappingRow) -> Vec<TopCompetency> {
    mapping
        .ranked()
        .iter()
        .map(|(name, score)| TopCompetency {
            competency_name: name.to_string(),
            match_strength: *score,
        })
        .collect()
}

/// Trims, drops blanks, sorts and deduplicates a caller's selection so the
/// result is independent of input order and repetition.
pub fn normalize_selection<S: AsRef<str>>(selected: &[S]) -> Vec<String> {
    let mut names: Vec<String> = selected
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Stateless façade over a `CompetencyStore`.
#[derive(Clone)]
pub struct MatchEngine {
    store: Arc<dyn CompetencyStore>,
    limit_mode: LimitMode,
}

impl MatchEngine {
    pub fn new(store: Arc<dyn CompetencyStore>, limit_mode: LimitMode) -> Self {
        Self { store, limit_mode }
    }

    pub fn limit_mode(&self) -> LimitMode {
        self.limit_mode
    }

    // ── match_jobs ──────────────────────────────────────────────────────────

    /// Occupations whose top-3 competencies intersect `selected`, with a 0–100
    /// positional match score. A `limit` of `None` or `Some(0)` means unlimited.
    pub async fn try_match_jobs<S: AsRef<str>>(
        &self,
        selected: &[S],
        limit: Option<usize>,
    ) -> Result<Vec<JobMatch>, AppError> {
        let selection = normalize_selection(selected);
        if selection.is_empty() {
            debug!("match_jobs called with an empty selection");
            return Ok(Vec::new());
        }
        for name in &selection {
            if Competency::from_name(name).is_none() {
                debug!("Selection contains '{name}', which is outside the competency taxonomy");
            }
        }

        let limit = limit.filter(|&n| n > 0);
        let query_limit = match self.limit_mode {
            LimitMode::PreRanking => limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX)),
            LimitMode::PostRanking => None,
        };

        let rows = self
            .store
            .find_mappings_by_competencies(&selection, query_limit)
            .await?;
        let fetched = rows.len();
        let mut matches = score_rows(rows, &selection);

        if self.limit_mode == LimitMode::PostRanking {
            rank_by_score(&mut matches);
            if let Some(n) = limit {
                matches.truncate(n);
            }
        }

        info!(
            "Matched {} occupations ({} fetched) for [{}]",
            matches.len(),
            fetched,
            selection.join(", ")
        );
        Ok(matches)
    }

    pub async fn match_jobs<S: AsRef<str>>(&self, selected: &[S], limit: Option<usize>) -> Vec<JobMatch> {
        self.try_match_jobs(selected, limit)
            .await
            .unwrap_or_else(|e| {
                error!("Error fetching jobs by competencies: {e}");
                Vec::new()
            })
    }

    // ── detailed_job_info ───────────────────────────────────────────────────

    /// Full profile of one occupation. `Ok(None)` when the code is unknown.
    /// Secondary lookups are fetched concurrently; each one that fails is
    /// logged and left empty.
    pub async fn try_detailed_job_info(&self, code: &str) -> Result<Option<DetailedJobInfo>, AppError> {
        let Some(occupation) = self.store.find_occupation(code).await? else {
            debug!("Occupation {code} not found");
            return Ok(None);
        };

        let store = self.store.as_ref();
        let (job_zone, mapping, scores, skills, knowledge, work_activities, education) = tokio::join!(
            store.find_job_zone(code),
            store.find_mapping(code),
            store.competency_scores(code),
            store.top_attributes(AttributeTable::Skills, code, DETAIL_ATTRIBUTE_LIMIT),
            store.top_attributes(AttributeTable::Knowledge, code, DETAIL_ATTRIBUTE_LIMIT),
            store.top_attributes(AttributeTable::WorkActivities, code, DETAIL_ATTRIBUTE_LIMIT),
            store.top_education(code, DETAIL_ATTRIBUTE_LIMIT),
        );

        let job_zone = or_default(job_zone, "job zone", code);
        let mapping = or_default(mapping, "competency mapping", code);

        Ok(Some(DetailedJobInfo {
            onetsoc_code: occupation.onetsoc_code,
            title: occupation.title,
            description: occupation.description,
            job_zone: job_zone.map(JobZoneInfo::from),
            top_competencies: mapping.as_ref().map(top_competencies).unwrap_or_default(),
            skills: or_default(skills, "skills", code),
            knowledge: or_default(knowledge, "knowledge", code),
            work_activities: or_default(work_activities, "work activities", code),
            education_training: or_default(education, "education and training", code),
            all_competency_scores: or_default(scores, "competency scores", code),
        }))
    }

    pub async fn detailed_job_info(&self, code: &str) -> Option<DetailedJobInfo> {
        self.try_detailed_job_info(code).await.unwrap_or_else(|e| {
            error!("Error fetching occupation data for {code}: {e}");
            None
        })
    }

    // ── taxonomy ────────────────────────────────────────────────────────────

    pub fn all_competencies(&self) -> Vec<&'static str> {
        competency_names()
    }

    // ── mapping health ──────────────────────────────────────────────────────

    pub async fn try_mappings_exist(&self) -> Result<bool, AppError> {
        Ok(self.store.count_mappings().await? > 0)
    }

    /// False when the mapping table is empty or cannot be read.
    pub async fn mappings_exist(&self) -> bool {
        self.try_mappings_exist().await.unwrap_or_else(|e| {
            error!("Error checking competency mappings: {e}");
            false
        })
    }

    pub async fn try_mapping_stats(&self) -> Result<MappingStats, AppError> {
        let (total_mappings, total_jobs) =
            tokio::try_join!(self.store.count_mappings(), self.store.count_occupations())?;
        Ok(MappingStats::new(total_mappings, total_jobs))
    }

    /// `None` when either count cannot be read.
    pub async fn mapping_stats(&self) -> Option<MappingStats> {
        match self.try_mapping_stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                error!("Error fetching mapping stats: {e}");
                None
            }
        }
    }
}

fn or_default<T: Default>(result: Result<T, AppError>, what: &str, code: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!("Failed to fetch {what} for {code}: {e}");
        T::default()
    })
}
